pub mod calculation;
pub mod card;
mod error;
pub mod hand;
pub mod peek;
pub mod report;
pub mod roi;
pub mod rule;
pub mod shoe;
mod statearray;
pub mod strategy;

pub use blackjack_roi_macros::OptionSet;
pub use calculation::ExpectationEngine;
pub use card::{Card, Rank, Suit};
pub use error::EngineError;
pub use hand::HandState;
pub use peek::PeekState;
pub use report::{
    calculate_advantage_report, AdvantageReport, Recommendation, ReportHandler, StrategyChart,
};
pub use roi::{ProbabilityCheck, Roi};
pub use rule::{Rule, RuleSettings, SplitEquality, SurrenderPolicy};
pub use shoe::{DealerShoe, Shoe};
pub use statearray::{TranspositionTable, TranspositionTables};
pub use strategy::{
    DecisionEvaluator, InsuranceExpectations, OpeningAdvice, PlayExpectations,
};

use strum_macros::{Display, EnumIter};

/// Everything a player may do at one decision point.
///
/// The declaration order is the tie-break order when two options return the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
pub enum OptionKind {
    Surrender,
    Stand,
    Hit,
    Split,
    #[strum(serialize = "Double Down")]
    Double,
    #[strum(serialize = "Accept Insurance")]
    AcceptInsurance,
    #[strum(serialize = "Refuse Insurance")]
    RefuseInsurance,
    #[strum(serialize = "Accept Even Money")]
    AcceptEvenMoney,
    #[strum(serialize = "Refuse Even Money")]
    RefuseEvenMoney,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayOption {
    kind: OptionKind,
    roi: f64,
}

impl PlayOption {
    pub fn new(kind: OptionKind, roi: f64) -> Self {
        PlayOption { kind, roi }
    }

    pub fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Expected return per unit of the original bet.
    pub fn roi(&self) -> f64 {
        self.roi
    }
}

/// A set of valued options. Derive it with `#[derive(OptionSet)]` on a struct of
/// `Option<f64>` fields named after the `OptionKind` variants.
pub trait OptionSet {
    /// The options that hold a value, in declaration order.
    fn options(&self) -> Vec<PlayOption>;

    /// Best option first. Equal returns keep the `OptionKind` order.
    fn ranked(&self) -> Vec<PlayOption> {
        let mut options = self.options();
        options.sort_by(|a, b| b.roi.total_cmp(&a.roi).then(a.kind.cmp(&b.kind)));
        options
    }

    fn best(&self) -> Option<PlayOption> {
        self.ranked().into_iter().next()
    }
}
