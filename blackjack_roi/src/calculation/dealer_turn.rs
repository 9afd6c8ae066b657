use super::ExpectationEngine;
use crate::card::{DEALER_RANKS, NUMBER_OF_DEALER_RANKS};
use crate::peek::dealer_draw_probability;
use crate::roi::{Roi, LOSS, WIN};
use crate::{EngineError, PeekState};

impl<'a> ExpectationEngine<'a> {
    /// Value of standing with `player_score` while the dealer plays out the current dealer hand.
    ///
    /// Must run inside a stand evaluation: the dealer table and `dealer_shoe` belong to the
    /// player hand being stood on.
    pub(super) fn dealer_turn_value(
        &mut self,
        player_score: u16,
        player_blackjack: bool,
    ) -> Result<f64, EngineError> {
        let rule = self.rule;

        // Obvious case 1: Dealer busts.
        if self.dealer.is_bust() {
            return Ok(WIN);
        }

        // Obvious case 2: Dealer has blackjack.
        if self.dealer.is_blackjack() {
            return Ok(if player_blackjack {
                rule.tie_value()
            } else {
                LOSS
            });
        }

        // Obvious case 3: Dealer stops drawing.
        if rule.dealer_stands(&self.dealer) {
            return Ok(rule.compare(player_score, self.dealer.score()));
        }

        if self.memoize {
            if let Some(value) = self.tables.dealer.get(&self.dealer) {
                return Ok(value);
            }
        }

        // Only the hole card is affected by what the peek revealed.
        let peek = if self.dealer.card_count() == 1 {
            self.peek
        } else {
            PeekState::Unknown
        };
        let mut branches = [Roi::default(); NUMBER_OF_DEALER_RANKS];
        let mut number_of_branches = 0;
        for rank in DEALER_RANKS {
            if self.dealer_shoe.remaining(rank) == 0 || peek.excludes(rank) {
                continue;
            }
            let probability = dealer_draw_probability(peek, &self.dealer_shoe, rank)?;
            let value = self.speculate_dealer(rank, |engine| {
                engine.dealer_turn_value(player_score, player_blackjack)
            })?;
            branches[number_of_branches] = Roi::new(probability, value);
            number_of_branches += 1;
        }
        if number_of_branches == 0 {
            return Err(EngineError::ShoeExhausted("the dealer's turn"));
        }

        let value = self.check.merge(&branches[..number_of_branches])?;
        if self.memoize {
            self.tables.dealer.insert(&self.dealer, value);
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HandState, Rank, Rule, RuleSettings, Shoe};

    fn shoe_of(cards: &[(Rank, u16)]) -> Shoe {
        let mut counts = [0; 13];
        for &(rank, count) in cards {
            counts[rank.index()] = count;
        }
        Shoe::from_counts(52, counts).unwrap()
    }

    fn stand_against(rule: &Rule, shoe: Shoe, player: &[Rank], up: Rank, peek: PeekState) -> f64 {
        let mut engine =
            ExpectationEngine::new(rule, shoe, HandState::from_ranks(player), up, peek).unwrap();
        engine.stand_roi().unwrap()
    }

    #[test]
    fn test_dealer_draws_to_a_known_total() {
        let rule = Rule::default();
        // Dealer 10 can only draw a 7 or an 8.
        let shoe = shoe_of(&[(Rank::Seven, 1), (Rank::Eight, 3)]);
        let value = stand_against(&rule, shoe, &[Rank::Ten, Rank::Eight], Rank::Ten, PeekState::Unknown);
        // The dealer makes 17 a quarter of the time and pushes with 18 otherwise.
        assert!((value - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_dealer_busts_through_stiff_total() {
        let rule = Rule::default();
        // Dealer 6 draws a ten for 16, then must bust on another ten.
        let shoe = shoe_of(&[(Rank::King, 4)]);
        let value = stand_against(&rule, shoe, &[Rank::Ten, Rank::Two], Rank::Six, PeekState::Unknown);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_soft17_rule_changes_the_outcome() {
        // Either hole card leads the dealer to soft 17 or soft 15, and the other card makes 21.
        let shoe = shoe_of(&[(Rank::Six, 1), (Rank::Four, 1)]);
        let player = [Rank::Ten, Rank::Eight];

        let stands = Rule::default();
        let value = stand_against(&stands, shoe.clone(), &player, Rank::Ace, PeekState::Unknown);
        assert!((value - 0.0).abs() < 1e-12);

        let hits = Rule::new(RuleSettings {
            dealer_hits_soft17: true,
            ..Default::default()
        })
        .unwrap();
        let value = stand_against(&hits, shoe, &player, Rank::Ace, PeekState::Unknown);
        assert!((value + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dealer_blackjack_beats_twenty_one() {
        let rule = Rule::default();
        let shoe = shoe_of(&[(Rank::Ace, 1), (Rank::Nine, 1)]);
        let player = [Rank::Seven, Rank::Seven, Rank::Seven];
        // Hole ace is blackjack, hole nine is 19.
        let value = stand_against(&rule, shoe.clone(), &player, Rank::Ten, PeekState::Unknown);
        assert!((value - 0.0).abs() < 1e-12);

        // After a peek the ace cannot be underneath.
        let value = stand_against(
            &rule,
            shoe,
            &player,
            Rank::Ten,
            PeekState::ConfirmedNoBlackjackViaTen,
        );
        assert_eq!(value, 1.0);
    }
}
