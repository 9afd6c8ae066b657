use super::ExpectationEngine;
use crate::roi::Roi;
use crate::{EngineError, Rank};

impl<'a> ExpectationEngine<'a> {
    /// Value of standing on the current player hand.
    pub(super) fn stand_value(&mut self) -> Result<f64, EngineError> {
        if self.player.is_blackjack() {
            let settings = self.rule.settings();
            let payout = if self.player.split_level() == 0 {
                settings.payout_blackjack
            } else {
                settings.payout_split_blackjack
            };
            return self.blackjack_value(payout);
        }

        if self.memoize {
            if let Some(value) = self.tables.player_stand.get(&self.player) {
                return Ok(value);
            }
        }

        self.tables.dealer.clear();
        self.dealer_shoe = self.shoe.dealer_view();
        let value = self.dealer_turn_value(self.player.score(), false)?;

        if self.memoize {
            self.tables.player_stand.insert(&self.player, value);
        }
        Ok(value)
    }

    /// Value of a two-card 21 paying `payout`, which only the dealer's own blackjack can stop.
    pub(super) fn blackjack_value(&self, payout: f64) -> Result<f64, EngineError> {
        if self.peek.is_confirmed() || self.dealer.card_count() != 1 {
            return Ok(payout);
        }
        let p_dealer_blackjack = if self.dealer.is_single(Rank::Ace) {
            self.shoe.probability_ten_value()
        } else if self.dealer.is_single(Rank::Ten) {
            self.shoe.probability_ace()
        } else {
            return Ok(payout);
        };
        if self.shoe.total() == 0 {
            return Err(EngineError::ShoeExhausted("the dealer's hole card"));
        }
        self.check.merge(&[
            Roi::new(p_dealer_blackjack, self.rule.tie_value()),
            Roi::new(1.0 - p_dealer_blackjack, payout),
        ])
    }
}
