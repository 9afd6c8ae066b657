use blackjack_roi::card::ALL_RANKS;
use blackjack_roi::{AdvantageReport, OptionKind, PlayOption, Rank, ReportHandler, StrategyChart};

/// Prints one chart per dealer up card as the report comes in.
#[derive(Debug, Default)]
pub struct ConsolePrinter;

fn option_symbol(kind: OptionKind) -> &'static str {
    match kind {
        OptionKind::Surrender => "R",
        OptionKind::Stand => "S",
        OptionKind::Hit => "H",
        OptionKind::Split => "P",
        OptionKind::Double => "D",
        OptionKind::AcceptEvenMoney => "E",
        OptionKind::AcceptInsurance
        | OptionKind::RefuseInsurance
        | OptionKind::RefuseEvenMoney => "?",
    }
}

impl ReportHandler for ConsolePrinter {
    fn on_dealer_up_card(&mut self, dealer_up_card: Rank, chart: &StrategyChart) {
        println!("Dealer shows {dealer_up_card}");
        print!("   ");
        for second in ALL_RANKS {
            print!("{second:>4}");
        }
        println!();
        for first in ALL_RANKS {
            print!("{first:>3}");
            for second in ALL_RANKS {
                let cell = match chart.get(dealer_up_card, first, second) {
                    Some(recommendation) if recommendation.take_insurance => {
                        format!("I{}", option_symbol(recommendation.best.kind()))
                    }
                    Some(recommendation) => String::from(option_symbol(recommendation.best.kind())),
                    None => String::from("."),
                };
                print!("{cell:>4}");
            }
            println!();
        }
        println!();
    }

    fn on_report(&mut self, report: &AdvantageReport) {
        println!("R surrender, S stand, H hit, P split, D double, E even money, I insurance");
        println!("Player advantage: {:+.4}%", report.advantage * 100.0);
    }
}

pub fn print_options(title: &str, options: &[PlayOption]) {
    if options.is_empty() {
        return;
    }
    println!("{title}");
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {:<20}{:+.6}", i + 1, option.kind().to_string(), option.roi());
    }
}
