use crate::card::{ALL_RANKS, NUMBER_OF_RANKS};
use crate::hand::{MAX_PLAYER_CARDS, MAX_SPLIT_LEVEL};
use crate::roi::{DRAW, LOSS, WIN};
use crate::{EngineError, HandState, PeekState, Rank};
use serde_enum_str::{Deserialize_enum_str, Serialize_enum_str};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum SurrenderPolicy {
    NoSurrender,
    /// Only after the dealer has checked for blackjack.
    Late,
    /// Before the dealer checks for blackjack.
    Early,
}

/// When two cards count as a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_enum_str, Deserialize_enum_str)]
pub enum SplitEquality {
    /// Same blackjack value, so any two ten-valued cards pair up.
    ByValue,
    /// Same rank.
    ByRank,
}

/// The table rules, as plain data. `Rule::new` validates them and derives the lookup tables.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSettings {
    pub dealer_hits_soft17: bool,
    pub dealer_wins_ties: bool,
    /// The dealer takes a hole card and checks it under an ace or a ten.
    pub dealer_peeks: bool,
    pub surrender_policy: SurrenderPolicy,

    pub split_equality: SplitEquality,
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
    /// Return per unit bet of a five-card 21 when `five_card_21` is on.
    pub payout_five_card_21: f64,

    pub offers_insurance: bool,
    pub offers_even_money: bool,
}

impl Default for RuleSettings {
    fn default() -> Self {
        RuleSettings {
            dealer_hits_soft17: false,
            dealer_wins_ties: false,
            dealer_peeks: false,
            surrender_policy: SurrenderPolicy::NoSurrender,
            split_equality: SplitEquality::ByValue,
            times_two_to_king_splittable: 2,
            times_aces_splittable: 4,
            hit_split_aces: true,
            doublable_card_counts: vec![2],
            doublable_scores: vec![9, 10, 11],
            double_after_split: false,
            double_after_ace_split: true,
            payout_blackjack: 1.5,
            payout_split_blackjack: 1.0,
            five_card_charlie: false,
            five_card_21: false,
            payout_five_card_21: 2.0,
            offers_insurance: true,
            offers_even_money: true,
        }
    }
}

const DOUBLE_SCORES: usize = 22;
const SPLIT_LEVELS: usize = MAX_SPLIT_LEVEL as usize + 1;

/// `[card count][score][prior split was aces][split level]`
type DoubleTable = [[[[bool; SPLIT_LEVELS]; 2]; DOUBLE_SCORES]; MAX_PLAYER_CARDS + 1];

/// Validated table rules together with the eligibility tables derived from them.
#[derive(Debug, Clone)]
pub struct Rule {
    settings: RuleSettings,
    doublable: Box<DoubleTable>,
    pairs: [[bool; NUMBER_OF_RANKS]; NUMBER_OF_RANKS],
}

impl Default for Rule {
    fn default() -> Self {
        Rule::build(RuleSettings::default())
    }
}

impl Rule {
    pub fn new(settings: RuleSettings) -> Result<Self, EngineError> {
        for (name, times) in [
            ("times_two_to_king_splittable", settings.times_two_to_king_splittable),
            ("times_aces_splittable", settings.times_aces_splittable),
        ] {
            if times > MAX_SPLIT_LEVEL {
                return Err(EngineError::InvalidRule(format!(
                    "{name} is {times}, at most {MAX_SPLIT_LEVEL} splits are supported"
                )));
            }
        }
        if let Some(count) = settings
            .doublable_card_counts
            .iter()
            .find(|&&count| count < 2 || count as usize > MAX_PLAYER_CARDS)
        {
            return Err(EngineError::InvalidRule(format!(
                "cannot double on a hand of {count} cards"
            )));
        }
        if let Some(score) = settings.doublable_scores.iter().find(|&&score| score > 21) {
            return Err(EngineError::InvalidRule(format!(
                "cannot double on a score of {score}"
            )));
        }
        for (name, payout) in [
            ("payout_blackjack", settings.payout_blackjack),
            ("payout_split_blackjack", settings.payout_split_blackjack),
            ("payout_five_card_21", settings.payout_five_card_21),
        ] {
            if !payout.is_finite() || payout < 0.0 {
                return Err(EngineError::InvalidRule(format!(
                    "{name} must be a non-negative number, got {payout}"
                )));
            }
        }
        Ok(Rule::build(settings))
    }

    fn build(settings: RuleSettings) -> Self {
        let mut doublable = Box::new([[[[false; SPLIT_LEVELS]; 2]; DOUBLE_SCORES]; MAX_PLAYER_CARDS + 1]);
        for &count in &settings.doublable_card_counts {
            for &score in &settings.doublable_scores {
                for prior_ace in 0..2 {
                    for split_level in 0..SPLIT_LEVELS {
                        doublable[count as usize][score as usize][prior_ace][split_level] =
                            split_level == 0
                                || (prior_ace == 0 && settings.double_after_split)
                                || (prior_ace == 1 && settings.double_after_ace_split);
                    }
                }
            }
        }

        let mut pairs = [[false; NUMBER_OF_RANKS]; NUMBER_OF_RANKS];
        for (i, row) in pairs.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = match settings.split_equality {
                    SplitEquality::ByRank => i == j,
                    SplitEquality::ByValue => {
                        ALL_RANKS[i].value() == ALL_RANKS[j].value()
                    }
                };
            }
        }

        Rule {
            settings,
            doublable,
            pairs,
        }
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    /// Whether the dealer stops drawing on `dealer`.
    pub fn dealer_stands(&self, dealer: &HandState) -> bool {
        let score = dealer.score();
        score > 17 || (score == 17 && (!self.settings.dealer_hits_soft17 || !dealer.is_soft()))
    }

    /// Return of a push, which is a loss when the dealer wins ties.
    pub fn tie_value(&self) -> f64 {
        if self.settings.dealer_wins_ties {
            LOSS
        } else {
            DRAW
        }
    }

    /// Return of a finished, unbusted player hand against a finished, unbusted dealer hand.
    pub fn compare(&self, player_score: u16, dealer_score: u16) -> f64 {
        if player_score > dealer_score {
            WIN
        } else if player_score < dealer_score {
            LOSS
        } else {
            self.tie_value()
        }
    }

    pub fn can_hit(&self, hand: &HandState) -> bool {
        if hand.score() >= 21 {
            return false;
        }
        if self.settings.five_card_charlie && hand.card_count() >= 5 {
            return false;
        }
        // Split aces get their second card regardless.
        !(hand.is_split_aces() && !self.settings.hit_split_aces && hand.card_count() >= 2)
    }

    pub fn can_double(&self, hand: &HandState) -> bool {
        let cards = hand.card_count() as usize;
        let score = hand.score() as usize;
        if cards > MAX_PLAYER_CARDS || score >= DOUBLE_SCORES {
            return false;
        }
        let prior_ace = hand.is_split_aces() as usize;
        self.doublable[cards][score][prior_ace][hand.split_level() as usize]
    }

    pub fn can_split(&self, hand: &HandState) -> bool {
        let Some((first, second)) = hand.pair() else {
            return false;
        };
        let limit = if first.is_ace() {
            self.settings.times_aces_splittable
        } else {
            self.settings.times_two_to_king_splittable
        };
        self.pairs[first.index()][second.index()] && hand.split_level() < limit
    }

    /// Whether surrender is on offer for `hand` right now.
    pub fn can_surrender(&self, hand: &HandState, dealer_up_card: Rank, peek: PeekState) -> bool {
        if hand.card_count() != 2 || hand.split_level() != 0 || hand.is_natural() {
            return false;
        }
        match self.settings.surrender_policy {
            SurrenderPolicy::NoSurrender => false,
            SurrenderPolicy::Early => true,
            SurrenderPolicy::Late => {
                peek.is_confirmed()
                    || !self.settings.dealer_peeks
                    || !(dealer_up_card.is_ace() || dealer_up_card.is_ten_value())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(ranks: &[Rank]) -> HandState {
        HandState::from_ranks(ranks)
    }

    #[test]
    fn test_default_rule_is_valid() {
        let settings = RuleSettings::default();
        let rule = Rule::new(settings.clone()).unwrap();
        assert_eq!(rule.settings(), &settings);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let settings = RuleSettings {
            times_aces_splittable: 5,
            ..Default::default()
        };
        assert!(matches!(Rule::new(settings), Err(EngineError::InvalidRule(_))));

        let settings = RuleSettings {
            doublable_scores: vec![9, 22],
            ..Default::default()
        };
        assert!(Rule::new(settings).is_err());

        let settings = RuleSettings {
            payout_blackjack: f64::NAN,
            ..Default::default()
        };
        assert!(Rule::new(settings).is_err());
    }

    #[test]
    fn test_dealer_soft17() {
        let soft17 = hand(&[Rank::Ace, Rank::Six]);
        let hard17 = hand(&[Rank::Ten, Rank::Seven]);
        let stands = Rule::default();
        assert!(stands.dealer_stands(&soft17));
        assert!(stands.dealer_stands(&hard17));

        let hits = Rule::new(RuleSettings {
            dealer_hits_soft17: true,
            ..Default::default()
        })
        .unwrap();
        assert!(!hits.dealer_stands(&soft17));
        assert!(hits.dealer_stands(&hard17));
        assert!(!hits.dealer_stands(&hand(&[Rank::Ten, Rank::Six])));
    }

    #[test]
    fn test_ties() {
        let rule = Rule::default();
        assert_eq!(rule.compare(18, 18), DRAW);
        assert_eq!(rule.compare(19, 18), WIN);
        assert_eq!(rule.compare(17, 18), LOSS);

        let rule = Rule::new(RuleSettings {
            dealer_wins_ties: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(rule.compare(18, 18), LOSS);
    }

    #[test]
    fn test_double_eligibility() {
        let rule = Rule::default();
        assert!(rule.can_double(&hand(&[Rank::Six, Rank::Five])));
        assert!(!rule.can_double(&hand(&[Rank::Six, Rank::Six])));
        assert!(!rule.can_double(&hand(&[Rank::Two, Rank::Three, Rank::Six])));

        let after_split = hand(&[Rank::Six, Rank::Five]).with_split_level(1).unwrap();
        assert!(!rule.can_double(&after_split));
        let after_ace_split = hand(&[Rank::Ace, Rank::Ace, Rank::Eight])
            .with_split_level(1)
            .unwrap();
        assert!(!rule.can_double(&after_ace_split));
        let after_ace_split = hand(&[Rank::Ace, Rank::Nine]).with_split_level(1).unwrap();
        assert!(!rule.can_double(&after_ace_split));

        let rule = Rule::new(RuleSettings {
            doublable_scores: (0..=21).collect(),
            double_after_split: true,
            double_after_ace_split: false,
            ..Default::default()
        })
        .unwrap();
        assert!(rule.can_double(&after_split));
        assert!(!rule.can_double(&after_ace_split));
    }

    #[test]
    fn test_split_eligibility() {
        let rule = Rule::default();
        assert!(rule.can_split(&hand(&[Rank::Eight, Rank::Eight])));
        assert!(rule.can_split(&hand(&[Rank::Ten, Rank::Queen])));
        assert!(!rule.can_split(&hand(&[Rank::Eight, Rank::Nine])));
        assert!(!rule.can_split(&hand(&[Rank::Eight])));

        let twice = hand(&[Rank::Eight, Rank::Eight]).with_split_level(2).unwrap();
        assert!(!rule.can_split(&twice));
        let aces = hand(&[Rank::Ace, Rank::Ace]).with_split_level(3).unwrap();
        assert!(rule.can_split(&aces));

        let by_rank = Rule::new(RuleSettings {
            split_equality: SplitEquality::ByRank,
            ..Default::default()
        })
        .unwrap();
        assert!(!by_rank.can_split(&hand(&[Rank::Ten, Rank::Queen])));
        assert!(by_rank.can_split(&hand(&[Rank::Queen, Rank::Queen])));
    }

    #[test]
    fn test_hitting_split_aces() {
        let split_aces = hand(&[Rank::Ace, Rank::Five]).with_split_level(1).unwrap();
        assert!(Rule::default().can_hit(&split_aces));

        let rule = Rule::new(RuleSettings {
            hit_split_aces: false,
            ..Default::default()
        })
        .unwrap();
        assert!(!rule.can_hit(&split_aces));
        assert!(rule.can_hit(&hand(&[Rank::Ace]).with_split_level(1).unwrap()));
        assert!(!rule.can_hit(&hand(&[Rank::Ten, Rank::Ace, Rank::Ten])));
    }

    #[test]
    fn test_surrender_timing() {
        let sixteen = hand(&[Rank::Ten, Rank::Six]);
        assert!(!Rule::default().can_surrender(&sixteen, Rank::Ten, PeekState::Unknown));

        let late = Rule::new(RuleSettings {
            surrender_policy: SurrenderPolicy::Late,
            dealer_peeks: true,
            ..Default::default()
        })
        .unwrap();
        assert!(!late.can_surrender(&sixteen, Rank::Ten, PeekState::Unknown));
        assert!(late.can_surrender(
            &sixteen,
            Rank::Ten,
            PeekState::ConfirmedNoBlackjackViaTen
        ));
        assert!(late.can_surrender(&sixteen, Rank::Nine, PeekState::Unknown));
        assert!(!late.can_surrender(
            &hand(&[Rank::Ten, Rank::Three, Rank::Three]),
            Rank::Nine,
            PeekState::Unknown
        ));

        let early = Rule::new(RuleSettings {
            surrender_policy: SurrenderPolicy::Early,
            ..Default::default()
        })
        .unwrap();
        assert!(early.can_surrender(&sixteen, Rank::Ace, PeekState::Unknown));
        assert!(!early.can_surrender(&hand(&[Rank::Ace, Rank::King]), Rank::Ace, PeekState::Unknown));
    }

    #[test]
    fn test_policies_parse_from_strings() {
        assert_eq!("Late".parse::<SurrenderPolicy>().unwrap(), SurrenderPolicy::Late);
        assert_eq!("ByRank".parse::<SplitEquality>().unwrap(), SplitEquality::ByRank);
        assert!("Sometimes".parse::<SurrenderPolicy>().is_err());
    }
}
