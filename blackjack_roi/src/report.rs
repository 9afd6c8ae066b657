use crate::calculation::ExpectationEngine;
use crate::card::{ALL_RANKS, NUMBER_OF_RANKS};
use crate::roi::{ProbabilityCheck, Roi};
use crate::strategy::opening_advice;
use crate::{EngineError, HandState, PeekState, PlayOption, Rank, Rule, Shoe};

/// Best play for one opening deal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recommendation {
    pub take_insurance: bool,
    pub best: PlayOption,
    /// Chance of this opening being dealt from the full shoe, both card orders included.
    pub probability: f64,
}

/// Recommendations keyed by dealer up card and the two player cards.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyChart {
    cells: Vec<Option<Recommendation>>,
}

impl Default for StrategyChart {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyChart {
    pub fn new() -> Self {
        StrategyChart {
            cells: vec![None; NUMBER_OF_RANKS * NUMBER_OF_RANKS * NUMBER_OF_RANKS],
        }
    }

    fn index(dealer_up_card: Rank, first: Rank, second: Rank) -> usize {
        let (low, high) = if first.index() <= second.index() {
            (first, second)
        } else {
            (second, first)
        };
        (dealer_up_card.index() * NUMBER_OF_RANKS + low.index()) * NUMBER_OF_RANKS + high.index()
    }

    /// The player cards may be given in either order.
    pub fn get(&self, dealer_up_card: Rank, first: Rank, second: Rank) -> Option<&Recommendation> {
        self.cells[Self::index(dealer_up_card, first, second)].as_ref()
    }

    pub fn insert(
        &mut self,
        dealer_up_card: Rank,
        first: Rank,
        second: Rank,
        recommendation: Recommendation,
    ) {
        self.cells[Self::index(dealer_up_card, first, second)] = Some(recommendation);
    }

    /// Every recorded opening against `dealer_up_card`, lower player card first.
    pub fn openings(
        &self,
        dealer_up_card: Rank,
    ) -> impl Iterator<Item = (Rank, Rank, &Recommendation)> + '_ {
        ALL_RANKS.into_iter().enumerate().flat_map(move |(i, first)| {
            ALL_RANKS.into_iter().skip(i).filter_map(move |second| {
                self.get(dealer_up_card, first, second)
                    .map(|recommendation| (first, second, recommendation))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdvantageReport {
    pub chart: StrategyChart,
    /// Expected return per unit bet of a fresh round played perfectly. Negative is a house edge.
    pub advantage: f64,
}

/// Receives the report while it is being built.
pub trait ReportHandler {
    /// Called once the openings against `dealer_up_card` are all in `chart`.
    fn on_dealer_up_card(&mut self, _dealer_up_card: Rank, _chart: &StrategyChart) {}

    fn on_report(&mut self, _report: &AdvantageReport) {}
}

impl ReportHandler for () {}

/// Values every opening deal from `shoe` and the round as a whole.
///
/// Openings are grouped by dealer up card. Each group shares one engine, so the memo tables
/// filled for one player opening serve the next one.
pub fn calculate_advantage_report<H: ReportHandler>(
    rule: &Rule,
    shoe: &Shoe,
    handler: &mut H,
) -> Result<AdvantageReport, EngineError> {
    let total = shoe.total();
    if total < 3 {
        return Err(EngineError::ShoeExhausted("the opening deal"));
    }
    log::info!("calculating the advantage report for a shoe of {total} cards");
    let denominator = total as f64 * (total - 1) as f64 * (total - 2) as f64;

    let mut chart = StrategyChart::new();
    let mut rois = Vec::with_capacity(NUMBER_OF_RANKS * NUMBER_OF_RANKS * (NUMBER_OF_RANKS + 1) / 2);
    for dealer_up_card in ALL_RANKS {
        let count_up = shoe.remaining(dealer_up_card);
        if count_up == 0 {
            continue;
        }
        let mut remaining = shoe.clone();
        remaining.deal(dealer_up_card)?;
        let mut engine = ExpectationEngine::new(
            rule,
            remaining,
            HandState::new(),
            dealer_up_card,
            PeekState::Unknown,
        )?
        .with_probability_check(ProbabilityCheck::Abort);

        for (i, first) in ALL_RANKS.into_iter().enumerate() {
            for second in ALL_RANKS.into_iter().skip(i) {
                let count_first = engine.shoe().remaining(first);
                let count_second = engine
                    .shoe()
                    .remaining(second)
                    .saturating_sub((first == second) as u16);
                if count_first == 0 || count_second == 0 {
                    continue;
                }
                let mut probability =
                    (count_up as f64 * count_first as f64 * count_second as f64) / denominator;
                if first != second {
                    probability *= 2.0;
                }

                let advice = engine.speculate_player(first, |engine| {
                    engine.speculate_player(second, opening_advice)
                })?;
                rois.push(Roi::new(probability, advice.best.roi()));
                chart.insert(
                    dealer_up_card,
                    first,
                    second,
                    Recommendation {
                        take_insurance: advice.take_insurance,
                        best: advice.best,
                        probability,
                    },
                );
            }
        }
        log::debug!(
            "openings against {dealer_up_card} done, {} states memoized",
            engine.tables().len()
        );
        handler.on_dealer_up_card(dealer_up_card, &chart);
    }

    let advantage = ProbabilityCheck::Abort.merge(&rois)?;
    log::info!("player advantage: {:.4}%", advantage * 100.0);
    let report = AdvantageReport { chart, advantage };
    handler.on_report(&report);
    Ok(report)
}
