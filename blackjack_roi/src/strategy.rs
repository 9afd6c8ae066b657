use crate::calculation::ExpectationEngine;
use crate::roi::{ProbabilityCheck, DRAW};
use crate::{EngineError, HandState, OptionKind, OptionSet, PeekState, PlayOption, Rank, Rule, Shoe};

/// Share of the original bet staked on insurance.
pub const INSURANCE_STAKE: f64 = 0.5;

/// Values of the plays open to one hand. `None` marks an option that is not legal.
#[derive(Debug, Clone, Copy, PartialEq, OptionSet)]
pub struct PlayExpectations {
    pub surrender: Option<f64>,
    pub stand: Option<f64>,
    pub hit: Option<f64>,
    pub split: Option<f64>,
    pub double: Option<f64>,
}

impl PlayExpectations {
    /// Values every legal play of the engine's current player hand.
    pub fn evaluate(engine: &mut ExpectationEngine) -> Result<Self, EngineError> {
        let rule = engine.rule();
        let player = engine.player();
        if player.card_count() == 0 || player.is_bust() {
            return Err(EngineError::InvalidState(format!(
                "there is no decision to make on a hand of {} cards scoring {}",
                player.card_count(),
                player.score()
            )));
        }
        // A split hand holding a single card has to take its second card first.
        let can_stand = player.card_count() >= 2;
        let can_surrender = rule.can_surrender(player, engine.dealer_up_card(), engine.peek());
        let can_hit = rule.can_hit(player);
        let can_split = rule.can_split(player);
        let can_double = rule.can_double(player);

        Ok(PlayExpectations {
            surrender: can_surrender.then(|| engine.surrender_roi()),
            stand: if can_stand { Some(engine.stand_roi()?) } else { None },
            hit: if can_hit { Some(engine.hit_roi()?) } else { None },
            split: if can_split { Some(engine.split_roi()?) } else { None },
            double: if can_double { Some(engine.double_roi()?) } else { None },
        })
    }

    fn with_insurance(self, insurance: f64) -> Self {
        PlayExpectations {
            // Insurance and surrender exclude each other.
            surrender: None,
            stand: self.stand.map(|roi| roi + insurance),
            hit: self.hit.map(|roi| roi + insurance),
            split: self.split.map(|roi| roi + insurance),
            double: self.double.map(|roi| roi + insurance),
        }
    }
}

/// Values of the side decision offered against a dealer ace, before the hole card is checked.
#[derive(Debug, Clone, Copy, PartialEq, OptionSet)]
pub struct InsuranceExpectations {
    /// Return per unit of insurance staked.
    pub accept_insurance: Option<f64>,
    pub refuse_insurance: Option<f64>,
    pub accept_even_money: Option<f64>,
    pub refuse_even_money: Option<f64>,
}

impl InsuranceExpectations {
    /// `None` when the current situation offers no side decision.
    ///
    /// A natural is offered even money. Any other opening hand is offered insurance.
    pub fn evaluate(engine: &ExpectationEngine) -> Result<Option<Self>, EngineError> {
        let settings = engine.rule().settings();
        let player = engine.player();
        let is_opening = player.card_count() == 2 && player.split_level() == 0;
        if !engine.dealer_up_card().is_ace() || engine.peek().is_confirmed() || !is_opening {
            return Ok(None);
        }

        if player.is_natural() && settings.offers_even_money {
            return Ok(Some(InsuranceExpectations {
                accept_even_money: Some(engine.accept_even_money_roi()),
                refuse_even_money: Some(engine.refuse_even_money_roi()?),
                ..Default::default()
            }));
        }
        if settings.offers_insurance {
            return Ok(Some(InsuranceExpectations {
                accept_insurance: Some(engine.insurance_roi()),
                refuse_insurance: Some(DRAW),
                ..Default::default()
            }));
        }
        Ok(None)
    }
}

/// What to do with one opening hand, side decision included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningAdvice {
    pub take_insurance: bool,
    /// The best option. Its return includes the insurance result when insurance is taken.
    pub best: PlayOption,
}

/// Combines the side decision with the best play for the engine's current hand.
pub fn opening_advice(engine: &mut ExpectationEngine) -> Result<OpeningAdvice, EngineError> {
    let side = InsuranceExpectations::evaluate(engine)?;
    if let Some(best_side) = side.and_then(|side| side.best()) {
        if best_side.kind() == OptionKind::AcceptEvenMoney {
            return Ok(OpeningAdvice {
                take_insurance: false,
                best: best_side,
            });
        }
    }

    let insurance = side
        .and_then(|side| side.accept_insurance)
        .filter(|&roi| roi > 0.0);
    let mut plays = PlayExpectations::evaluate(engine)?;
    if let Some(roi) = insurance {
        plays = plays.with_insurance(INSURANCE_STAKE * roi);
    }
    let best = plays.best().ok_or_else(|| {
        EngineError::InvalidState(String::from("no play is legal for this hand"))
    })?;
    Ok(OpeningAdvice {
        take_insurance: insurance.is_some(),
        best,
    })
}

/// Ranked options for one live decision.
///
/// Probability sums that stray from 1 are logged rather than fatal here, so a live session
/// keeps going on a slightly inconsistent shoe.
#[derive(Debug, Clone)]
pub struct DecisionEvaluator<'a> {
    engine: ExpectationEngine<'a>,
}

impl<'a> DecisionEvaluator<'a> {
    pub fn new(
        rule: &'a Rule,
        shoe: Shoe,
        player: HandState,
        dealer_up_card: Rank,
        peek: PeekState,
    ) -> Result<Self, EngineError> {
        let engine = ExpectationEngine::new(rule, shoe, player, dealer_up_card, peek)?
            .with_probability_check(ProbabilityCheck::Warn);
        Ok(DecisionEvaluator { engine })
    }

    pub fn from_engine(engine: ExpectationEngine<'a>) -> Self {
        DecisionEvaluator { engine }
    }

    pub fn engine(&self) -> &ExpectationEngine<'a> {
        &self.engine
    }

    pub fn into_engine(self) -> ExpectationEngine<'a> {
        self.engine
    }

    /// Legal plays for the current hand, best first.
    pub fn play_options(&mut self) -> Result<Vec<PlayOption>, EngineError> {
        let options = PlayExpectations::evaluate(&mut self.engine)?.ranked();
        log::debug!("play options for {:?}: {:?}", self.engine.player(), options);
        Ok(options)
    }

    /// The insurance or even-money decision, best first. Empty when none is offered.
    pub fn side_options(&self) -> Result<Vec<PlayOption>, EngineError> {
        Ok(InsuranceExpectations::evaluate(&self.engine)?
            .map(|side| side.ranked())
            .unwrap_or_default())
    }

    pub fn opening_advice(&mut self) -> Result<OpeningAdvice, EngineError> {
        opening_advice(&mut self.engine)
    }

    /// Deals a real card to the player.
    pub fn deal_to_player(&mut self, rank: Rank) -> Result<(), EngineError> {
        self.engine.deal_to_player(rank)
    }

    /// Splits the live pair and continues with the first of the two hands.
    pub fn split(&mut self) -> Result<(), EngineError> {
        if !self.engine.rule().can_split(self.engine.player()) {
            return Err(EngineError::IllegalOption(OptionKind::Split));
        }
        let mut player = self.engine.player().clone();
        player.split()?;
        self.engine.set_player(player);
        Ok(())
    }

    pub fn confirm_no_blackjack(&mut self) -> Result<(), EngineError> {
        self.engine.confirm_no_blackjack()
    }
}
