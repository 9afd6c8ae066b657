use super::ExpectationEngine;
use crate::card::{ALL_RANKS, NUMBER_OF_RANKS};
use crate::peek::player_draw_probability;
use crate::roi::{Roi, LOSS, WIN};
use crate::EngineError;

impl<'a> ExpectationEngine<'a> {
    /// Best value of the current player hand, playing on optimally.
    pub(super) fn player_turn_value(&mut self) -> Result<f64, EngineError> {
        let rule = self.rule;
        let settings = rule.settings();

        // Obvious case 1: Bust.
        if self.player.is_bust() {
            return Ok(LOSS);
        }

        if self.memoize {
            if let Some(value) = self.tables.player.get(&self.player) {
                return Ok(value);
            }
        }

        let cards = self.player.card_count();
        let score = self.player.score();

        // Obvious case 2: Two cards of 21 after a split.
        if score == 21 && cards == 2 {
            return self.stand_value();
        }

        // Obvious case 3: Five-card bonuses.
        if cards == 5 && score == 21 && settings.five_card_21 {
            return Ok(settings.payout_five_card_21);
        }
        if cards == 5 && settings.five_card_charlie {
            return Ok(WIN);
        }

        // Obvious case 4: Current score is 21. Stand!
        if score == 21 {
            return self.stand_value();
        }

        let value = if cards == 1 {
            // A freshly split hand has to take its second card.
            self.hit_value()?
        } else {
            let mut value = self.stand_value()?;
            if rule.can_hit(&self.player) {
                value = value.max(self.hit_value()?);
            }
            if rule.can_split(&self.player) {
                value = value.max(self.split_value()?);
            }
            if rule.can_double(&self.player) {
                value = value.max(self.double_value()?);
            }
            value
        };

        if self.memoize {
            self.tables.player.insert(&self.player, value);
        }
        Ok(value)
    }

    /// Value of drawing one card and then playing on optimally.
    pub(super) fn hit_value(&mut self) -> Result<f64, EngineError> {
        if self.shoe.total() == 0 {
            return Err(EngineError::ShoeExhausted("the player's turn"));
        }
        let mut branches = [Roi::default(); NUMBER_OF_RANKS];
        let mut number_of_branches = 0;
        for rank in ALL_RANKS {
            if self.shoe.remaining(rank) == 0 {
                continue;
            }
            let probability = player_draw_probability(self.peek, &self.shoe, rank)?;
            if probability == 0.0 {
                continue;
            }
            let value = self.speculate_player(rank, |engine| engine.player_turn_value())?;
            branches[number_of_branches] = Roi::new(probability, value);
            number_of_branches += 1;
        }
        self.check.merge(&branches[..number_of_branches])
    }

    /// Value of splitting the current pair, counted over both resulting hands.
    ///
    /// Each hand is valued as if it were played alone from the current shoe, so the result is
    /// twice the value of one single-card hand one split level deeper.
    pub(super) fn split_value(&mut self) -> Result<f64, EngineError> {
        let second = self.player.split()?;
        let value = self.player_turn_value();
        self.player.unsplit(second);
        Ok(2.0 * value?)
    }

    /// Value of doubling: one card at twice the stake, then the hand stands.
    pub(super) fn double_value(&mut self) -> Result<f64, EngineError> {
        if self.shoe.total() == 0 {
            return Err(EngineError::ShoeExhausted("the player's double"));
        }
        let mut branches = [Roi::default(); NUMBER_OF_RANKS];
        let mut number_of_branches = 0;
        for rank in ALL_RANKS {
            if self.shoe.remaining(rank) == 0 {
                continue;
            }
            let probability = player_draw_probability(self.peek, &self.shoe, rank)?;
            if probability == 0.0 {
                continue;
            }
            let value = self.speculate_player(rank, |engine| engine.doubled_hand_value())?;
            branches[number_of_branches] = Roi::new(probability, value);
            number_of_branches += 1;
        }
        Ok(2.0 * self.check.merge(&branches[..number_of_branches])?)
    }

    fn doubled_hand_value(&mut self) -> Result<f64, EngineError> {
        let settings = self.rule.settings();
        let cards = self.player.card_count();
        if self.player.is_bust() {
            return Ok(LOSS);
        }
        if cards == 5 && self.player.score() == 21 && settings.five_card_21 {
            return Ok(settings.payout_five_card_21);
        }
        if cards == 5 && settings.five_card_charlie {
            return Ok(WIN);
        }
        self.stand_value()
    }
}
