mod dealer_turn;
mod player_turn;
mod terminal;

use crate::roi::{ProbabilityCheck, SURRENDER};
use crate::{
    DealerShoe, EngineError, HandState, OptionKind, PeekState, Rank, Rule, Shoe,
    TranspositionTables,
};

/// Exact expected returns for one player hand against one dealer up card.
///
/// The engine owns a working copy of the shoe and of both hands. Every recursive branch
/// removes a card, recurses and puts the card back, so the state after any evaluation is the
/// state before it. Values are memoized by hand fingerprint in tables tied to the current
/// shoe, dealer up card and peek state. Every real change to those goes through a method that
/// clears the tables.
#[derive(Debug, Clone)]
pub struct ExpectationEngine<'a> {
    rule: &'a Rule,
    shoe: Shoe,
    player: HandState,
    dealer: HandState,
    dealer_up_card: Rank,
    peek: PeekState,
    tables: TranspositionTables,
    /// The dealer's view of `shoe`, taken at the start of each stand evaluation.
    dealer_shoe: DealerShoe,
    check: ProbabilityCheck,
    memoize: bool,
}

impl<'a> ExpectationEngine<'a> {
    /// `shoe` holds every card not yet seen, which includes the dealer's hole card.
    pub fn new(
        rule: &'a Rule,
        shoe: Shoe,
        player: HandState,
        dealer_up_card: Rank,
        peek: PeekState,
    ) -> Result<Self, EngineError> {
        if !peek.is_consistent_with(dealer_up_card) {
            return Err(EngineError::InvalidState(format!(
                "{peek:?} is impossible with a {dealer_up_card} up"
            )));
        }
        Ok(ExpectationEngine {
            rule,
            dealer_shoe: shoe.dealer_view(),
            shoe,
            player,
            dealer: HandState::dealer(dealer_up_card),
            dealer_up_card,
            peek,
            tables: TranspositionTables::new(),
            check: ProbabilityCheck::default(),
            memoize: true,
        })
    }

    pub fn with_probability_check(mut self, check: ProbabilityCheck) -> Self {
        self.check = check;
        self
    }

    /// Evaluates every state from scratch. Only useful to cross-check the memo tables.
    pub fn without_memoization(mut self) -> Self {
        self.memoize = false;
        self.tables.clear();
        self
    }

    pub fn rule(&self) -> &'a Rule {
        self.rule
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn player(&self) -> &HandState {
        &self.player
    }

    pub fn dealer(&self) -> &HandState {
        &self.dealer
    }

    pub fn dealer_up_card(&self) -> Rank {
        self.dealer_up_card
    }

    pub fn peek(&self) -> PeekState {
        self.peek
    }

    pub fn tables(&self) -> &TranspositionTables {
        &self.tables
    }

    /// Deals a real card from the shoe to the player.
    pub fn deal_to_player(&mut self, rank: Rank) -> Result<(), EngineError> {
        self.shoe.deal(rank)?;
        self.player.insert(rank);
        self.invalidate();
        Ok(())
    }

    /// Replaces the player's hand. The shoe is left alone.
    pub fn set_player(&mut self, player: HandState) {
        self.player = player;
        self.invalidate();
    }

    /// Records that the dealer checked the hole card and has no blackjack.
    pub fn confirm_no_blackjack(&mut self) -> Result<(), EngineError> {
        self.peek = PeekState::confirm(self.dealer_up_card)?;
        self.invalidate();
        Ok(())
    }

    pub fn invalidate(&mut self) {
        log::debug!("clearing {} memoized states", self.tables.len());
        self.tables.clear();
    }

    /// Deals `rank` to the player for the duration of `evaluate`.
    pub(crate) fn speculate_player<T, F>(&mut self, rank: Rank, evaluate: F) -> Result<T, EngineError>
    where
        F: FnOnce(&mut Self) -> Result<T, EngineError>,
    {
        self.shoe.remove_one(rank)?;
        self.player.insert(rank);
        let result = evaluate(self);
        self.player.remove_last(rank);
        self.shoe.restore_one(rank);
        result
    }

    /// Deals `rank` to the dealer for the duration of `evaluate`.
    fn speculate_dealer<F>(&mut self, rank: Rank, evaluate: F) -> Result<f64, EngineError>
    where
        F: FnOnce(&mut Self) -> Result<f64, EngineError>,
    {
        self.dealer_shoe.remove_one(rank)?;
        self.dealer.insert(rank);
        let result = evaluate(self);
        self.dealer.remove_last(rank);
        self.dealer_shoe.restore_one(rank);
        result
    }

    pub fn stand_roi(&mut self) -> Result<f64, EngineError> {
        self.stand_value()
    }

    /// Takes exactly one more card, then plays on optimally.
    pub fn hit_roi(&mut self) -> Result<f64, EngineError> {
        if !self.rule.can_hit(&self.player) {
            return Err(EngineError::IllegalOption(OptionKind::Hit));
        }
        self.hit_value()
    }

    pub fn split_roi(&mut self) -> Result<f64, EngineError> {
        if !self.rule.can_split(&self.player) {
            return Err(EngineError::IllegalOption(OptionKind::Split));
        }
        self.split_value()
    }

    pub fn double_roi(&mut self) -> Result<f64, EngineError> {
        if !self.rule.can_double(&self.player) {
            return Err(EngineError::IllegalOption(OptionKind::Double));
        }
        self.double_value()
    }

    pub fn surrender_roi(&self) -> f64 {
        SURRENDER
    }

    /// Return per unit of insurance staked: it pays 2:1 when the hole card is ten-valued.
    pub fn insurance_roi(&self) -> f64 {
        3.0 * self.shoe.probability_ten_value() - 1.0
    }

    pub fn accept_even_money_roi(&self) -> f64 {
        crate::roi::WIN
    }

    pub fn refuse_even_money_roi(&self) -> Result<f64, EngineError> {
        self.blackjack_value(self.rule.settings().payout_blackjack)
    }

    /// Best value of the current hand over every option still open to it.
    pub fn continuation_roi(&mut self) -> Result<f64, EngineError> {
        self.player_turn_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::ALL_RANKS;
    use crate::RuleSettings;
    use rand::Rng;

    fn engine<'a>(rule: &'a Rule, shoe: &Shoe, player: &[Rank], up: Rank) -> ExpectationEngine<'a> {
        ExpectationEngine::new(
            rule,
            shoe.clone(),
            HandState::from_ranks(player),
            up,
            PeekState::Unknown,
        )
        .unwrap()
    }

    /// One deck minus the dealt cards.
    fn shoe_without(dealt: &[Rank]) -> Shoe {
        let mut shoe = Shoe::with_number_of_decks(1).unwrap();
        for &rank in dealt {
            shoe.deal(rank).unwrap();
        }
        shoe
    }

    /// A short shoe, so that full evaluations without memo tables stay quick.
    fn small_shoe() -> Shoe {
        let mut counts = [0; 13];
        counts[Rank::Two.index()] = 2;
        counts[Rank::Five.index()] = 2;
        counts[Rank::Six.index()] = 1;
        counts[Rank::Eight.index()] = 2;
        counts[Rank::Nine.index()] = 1;
        counts[Rank::Ten.index()] = 2;
        counts[Rank::King.index()] = 2;
        counts[Rank::Ace.index()] = 2;
        Shoe::from_counts(52, counts).unwrap()
    }

    fn all_option_values(engine: &mut ExpectationEngine) -> Vec<f64> {
        let mut values = vec![engine.stand_roi().unwrap()];
        if engine.rule().can_hit(engine.player()) {
            values.push(engine.hit_roi().unwrap());
        }
        if engine.rule().can_split(engine.player()) {
            values.push(engine.split_roi().unwrap());
        }
        if engine.rule().can_double(engine.player()) {
            values.push(engine.double_roi().unwrap());
        }
        values
    }

    #[test]
    fn test_peek_state_must_match_up_card() {
        let rule = Rule::default();
        let shoe = shoe_without(&[]);
        let result = ExpectationEngine::new(
            &rule,
            shoe,
            HandState::new(),
            Rank::Seven,
            PeekState::ConfirmedNoBlackjackViaAce,
        );
        assert!(matches!(result, Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn test_natural_against_seven_pays_in_full() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Ace, Rank::King, Rank::Seven]);
        let mut engine = engine(&rule, &shoe, &[Rank::Ace, Rank::King], Rank::Seven);
        assert_eq!(engine.stand_roi().unwrap(), 1.5);
    }

    #[test]
    fn test_natural_against_ace_may_push() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Ace, Rank::King, Rank::Ace]);
        let mut engine = engine(&rule, &shoe, &[Rank::Ace, Rank::King], Rank::Ace);
        let p_ten = 15.0 / 49.0;
        let expected = (1.0 - p_ten) * 1.5;
        assert!((engine.stand_roi().unwrap() - expected).abs() < 1e-12);
        assert!((engine.refuse_even_money_roi().unwrap() - expected).abs() < 1e-12);
        assert_eq!(engine.accept_even_money_roi(), 1.0);

        engine.confirm_no_blackjack().unwrap();
        assert_eq!(engine.stand_roi().unwrap(), 1.5);
    }

    #[test]
    fn test_insurance_roi() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Two, Rank::Three, Rank::Ace]);
        assert_eq!(shoe.total(), 49);
        assert_eq!(shoe.ten_value_count(), 16);
        let engine = engine(&rule, &shoe, &[Rank::Two, Rank::Three], Rank::Ace);
        assert_eq!(engine.insurance_roi(), 3.0 * (16.0 / 49.0) - 1.0);
        assert_eq!(engine.surrender_roi(), -0.5);
    }

    #[test]
    fn test_standing_on_nineteen_beats_hitting() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Ten, Rank::Nine, Rank::Six]);
        let mut engine = engine(&rule, &shoe, &[Rank::Ten, Rank::Nine], Rank::Six);
        let stand = engine.stand_roi().unwrap();
        assert!(stand > 0.0 && stand < 1.0);

        let hit = engine.hit_roi().unwrap();
        assert!(stand > hit);
    }

    #[test]
    fn test_illegal_options_are_rejected() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Ten, Rank::Nine, Rank::Six]);
        let mut engine = engine(&rule, &shoe, &[Rank::Ten, Rank::Nine], Rank::Six);
        assert_eq!(
            engine.split_roi(),
            Err(EngineError::IllegalOption(OptionKind::Split))
        );
        assert_eq!(
            engine.double_roi(),
            Err(EngineError::IllegalOption(OptionKind::Double))
        );
    }

    #[test]
    fn test_evaluation_leaves_state_untouched() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Eight, Rank::Eight, Rank::Ten]);
        let mut engine = engine(&rule, &shoe, &[Rank::Eight, Rank::Eight], Rank::Ten);
        let player = engine.player().clone();
        let dealer = engine.dealer().clone();
        all_option_values(&mut engine);
        assert_eq!(engine.shoe(), &shoe);
        assert_eq!(engine.player(), &player);
        assert_eq!(engine.dealer(), &dealer);
        assert!(!engine.tables().is_empty());
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Five, Rank::Six, Rank::Nine]);
        let first = all_option_values(&mut engine(&rule, &shoe, &[Rank::Five, Rank::Six], Rank::Nine));
        let second = all_option_values(&mut engine(&rule, &shoe, &[Rank::Five, Rank::Six], Rank::Nine));
        assert_eq!(first, second);
    }

    #[test]
    fn test_memo_tables_do_not_change_values() {
        let rule = Rule::new(RuleSettings {
            double_after_split: true,
            doublable_scores: (4..=21).collect(),
            ..Default::default()
        })
        .unwrap();
        let shoe = small_shoe();
        for (player, up, peeked) in [
            ([Rank::Eight, Rank::Eight], Rank::Ten, false),
            ([Rank::Five, Rank::Six], Rank::Ace, false),
            ([Rank::Ace, Rank::Ace], Rank::Two, false),
            ([Rank::Two, Rank::Ten], Rank::Five, false),
            ([Rank::Eight, Rank::Eight], Rank::Ten, true),
            ([Rank::King, Rank::Ten], Rank::King, true),
            ([Rank::Five, Rank::Six], Rank::Ace, true),
            ([Rank::Nine, Rank::Two], Rank::Ace, true),
        ] {
            let mut shoe = shoe.clone();
            for rank in player.iter().chain([&up]) {
                shoe.deal(*rank).unwrap();
            }
            let mut memoized_engine = engine(&rule, &shoe, &player, up);
            let mut plain = engine(&rule, &shoe, &player, up).without_memoization();
            if peeked {
                memoized_engine.confirm_no_blackjack().unwrap();
                plain.confirm_no_blackjack().unwrap();
            }
            let memoized = all_option_values(&mut memoized_engine);
            let recomputed = all_option_values(&mut plain);
            assert!(plain.tables().is_empty());
            assert_eq!(memoized.len(), recomputed.len());
            for (a, b) in memoized.iter().zip(&recomputed) {
                assert!((a - b).abs() < 1e-12, "{memoized:?} != {recomputed:?}");
            }
        }
    }

    #[test]
    fn test_split_is_twice_the_single_hand() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Nine, Rank::Nine, Rank::Five]);
        let mut engine = engine(&rule, &shoe, &[Rank::Nine, Rank::Nine], Rank::Five);
        let split = engine.split_roi().unwrap();

        let single = HandState::from_ranks(&[Rank::Nine]).with_split_level(1).unwrap();
        let mut single_engine =
            ExpectationEngine::new(&rule, shoe.clone(), single, Rank::Five, PeekState::Unknown)
                .unwrap();
        let continuation = single_engine.continuation_roi().unwrap();
        assert!((split - 2.0 * continuation).abs() < 1e-12);
    }

    #[test]
    fn test_probabilities_sum_to_one_on_random_shoes() {
        let rule = Rule::new(RuleSettings {
            dealer_peeks: true,
            ..Default::default()
        })
        .unwrap();
        let mut rng = rand::thread_rng();
        for _ in 0..20 {
            let mut counts = [0; 13];
            for count in counts.iter_mut() {
                *count = rng.gen_range(1..=3);
            }
            let mut shoe = Shoe::from_counts(52, counts).unwrap();
            let up = [Rank::Ace, Rank::Ten, Rank::Seven][rng.gen_range(0..3)];
            let first = ALL_RANKS[rng.gen_range(0..13)];
            let second = ALL_RANKS[rng.gen_range(0..13)];
            if [up, first, second].iter().any(|&rank| shoe.deal(rank).is_err()) {
                continue;
            }
            let mut engine = engine(&rule, &shoe, &[first, second], up);
            if up != Rank::Seven && rng.gen_bool(0.5) {
                engine.confirm_no_blackjack().unwrap();
            }
            // The default check aborts on any sibling set that does not sum to 1.
            for value in all_option_values(&mut engine) {
                assert!((-2.0..=2.0).contains(&value));
            }
        }
    }

    #[test]
    fn test_real_deal_clears_tables() {
        let rule = Rule::default();
        let shoe = shoe_without(&[Rank::Two, Rank::Three, Rank::Ten]);
        let mut engine = engine(&rule, &shoe, &[Rank::Two, Rank::Three], Rank::Ten);
        engine.hit_roi().unwrap();
        assert!(!engine.tables().is_empty());
        engine.deal_to_player(Rank::Four).unwrap();
        assert!(engine.tables().is_empty());
        assert_eq!(engine.player().score(), 9);
        assert_eq!(engine.shoe().total(), 48);
    }
}
