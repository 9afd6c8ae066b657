use blackjack_roi::{EngineError, Rule, RuleSettings, Shoe};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unknown policy: {0}")]
    Policy(#[from] serde::de::value::Error),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub rule: ConfigRule,
    #[serde(default)]
    pub shoe: ConfigShoe,
}

/// The table rules as written in the config file. Policies are given by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRule {
    pub dealer_hits_soft17: bool,
    pub dealer_wins_ties: bool,
    pub dealer_peeks: bool,
    pub surrender_policy: String,

    pub split_equality: String,
    pub times_two_to_king_splittable: u8,
    pub times_aces_splittable: u8,
    pub hit_split_aces: bool,

    pub doublable_card_counts: Vec<u8>,
    pub doublable_scores: Vec<u8>,
    pub double_after_split: bool,
    pub double_after_ace_split: bool,

    pub payout_blackjack: f64,
    pub payout_split_blackjack: f64,
    pub five_card_charlie: bool,
    pub five_card_21: bool,
    pub payout_five_card_21: f64,

    pub offers_insurance: bool,
    pub offers_even_money: bool,
}

impl Default for ConfigRule {
    fn default() -> Self {
        let settings = RuleSettings::default();
        ConfigRule {
            dealer_hits_soft17: settings.dealer_hits_soft17,
            dealer_wins_ties: settings.dealer_wins_ties,
            dealer_peeks: settings.dealer_peeks,
            surrender_policy: settings.surrender_policy.to_string(),
            split_equality: settings.split_equality.to_string(),
            times_two_to_king_splittable: settings.times_two_to_king_splittable,
            times_aces_splittable: settings.times_aces_splittable,
            hit_split_aces: settings.hit_split_aces,
            doublable_card_counts: settings.doublable_card_counts,
            doublable_scores: settings.doublable_scores,
            double_after_split: settings.double_after_split,
            double_after_ace_split: settings.double_after_ace_split,
            payout_blackjack: settings.payout_blackjack,
            payout_split_blackjack: settings.payout_split_blackjack,
            five_card_charlie: settings.five_card_charlie,
            five_card_21: settings.five_card_21,
            payout_five_card_21: settings.payout_five_card_21,
            offers_insurance: settings.offers_insurance,
            offers_even_money: settings.offers_even_money,
        }
    }
}

impl TryInto<Rule> for ConfigRule {
    type Error = ConfigError;

    fn try_into(self) -> Result<Rule, Self::Error> {
        let settings = RuleSettings {
            dealer_hits_soft17: self.dealer_hits_soft17,
            dealer_wins_ties: self.dealer_wins_ties,
            dealer_peeks: self.dealer_peeks,
            surrender_policy: self.surrender_policy.parse()?,
            split_equality: self.split_equality.parse()?,
            times_two_to_king_splittable: self.times_two_to_king_splittable,
            times_aces_splittable: self.times_aces_splittable,
            hit_split_aces: self.hit_split_aces,
            doublable_card_counts: self.doublable_card_counts,
            doublable_scores: self.doublable_scores,
            double_after_split: self.double_after_split,
            double_after_ace_split: self.double_after_ace_split,
            payout_blackjack: self.payout_blackjack,
            payout_split_blackjack: self.payout_split_blackjack,
            five_card_charlie: self.five_card_charlie,
            five_card_21: self.five_card_21,
            payout_five_card_21: self.payout_five_card_21,
            offers_insurance: self.offers_insurance,
            offers_even_money: self.offers_even_money,
        };

        Ok(Rule::new(settings)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigShoe {
    pub number_of_decks: u8,
}

impl Default for ConfigShoe {
    fn default() -> Self {
        ConfigShoe { number_of_decks: 6 }
    }
}

impl ConfigShoe {
    /// A full shoe.
    pub fn build(&self) -> Result<Shoe, ConfigError> {
        Ok(Shoe::with_number_of_decks(self.number_of_decks)?)
    }
}

/// Reads the content of a given config file and parses it to a Config.
pub fn parse_config_from_file(filename: &str) -> Result<Config, ConfigError> {
    let file_content = fs::read_to_string(filename).map_err(|source| ConfigError::Io {
        path: String::from(filename),
        source,
    })?;
    parse_config(&file_content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(serde_yaml::from_str(content)?)
}
