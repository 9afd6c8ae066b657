use proc_macro::TokenStream as TokenStream1;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{self, Data, DeriveInput, Fields, Ident};

/// Derives `OptionSet` for a struct whose named fields are `Option<f64>` expectations.
///
/// Every field maps to the `OptionKind` variant with the same name in upper camel case, e.g.
/// `accept_insurance` maps to `OptionKind::AcceptInsurance`. `options()` lists the fields that
/// hold a value in field declaration order, so the declaration order is also the order in which
/// options with equal returns are ranked.
///
/// A `Default` implementation with every field set to `None` is generated as well.
#[proc_macro_derive(OptionSet)]
pub fn option_set_derive(input: TokenStream1) -> TokenStream1 {
    let ast: DeriveInput = match syn::parse(input) {
        Ok(ast) => ast,
        Err(err) => return err.to_compile_error().into(),
    };
    match expand_option_set(&ast) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_option_set(ast: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &ast.ident;
    let data_struct = match &ast.data {
        Data::Struct(x) => x,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "OptionSet can only be derived for structs",
            ))
        }
    };
    let named_fields = match &data_struct.fields {
        Fields::Named(x) => x,
        _ => {
            return Err(syn::Error::new_spanned(
                struct_name,
                "OptionSet needs named fields",
            ))
        }
    };

    let field_names: Vec<&Ident> = named_fields
        .named
        .iter()
        .filter_map(|field| field.ident.as_ref())
        .collect();
    let kinds: Vec<Ident> = field_names.iter().map(|name| option_kind_of(name)).collect();

    Ok(quote! {
        impl crate::OptionSet for #struct_name {
            fn options(&self) -> ::std::vec::Vec<crate::PlayOption> {
                let mut options = ::std::vec::Vec::new();
                #(
                    if let ::std::option::Option::Some(roi) = self.#field_names {
                        options.push(crate::PlayOption::new(crate::OptionKind::#kinds, roi));
                    }
                )*
                options
            }
        }

        impl ::std::default::Default for #struct_name {
            fn default() -> Self {
                Self {
                    #( #field_names: ::std::option::Option::None, )*
                }
            }
        }
    })
}

fn option_kind_of(field_name: &Ident) -> Ident {
    let camel_case: String = field_name
        .to_string()
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect();
    Ident::new(&camel_case, field_name.span())
}
