use crate::EngineError;

pub const WIN: f64 = 1.0;
pub const DRAW: f64 = 0.0;
pub const LOSS: f64 = -1.0;
pub const SURRENDER: f64 = -0.5;

/// How far a set of sibling branch probabilities may drift from 1.
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// One branch of a chance node: how likely it is and what it returns per unit bet.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Roi {
    probability: f64,
    value: f64,
}

impl Roi {
    pub const fn new(probability: f64, value: f64) -> Self {
        Roi { probability, value }
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// What to do when sibling probabilities do not sum to 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProbabilityCheck {
    /// Fail the evaluation with `EngineError::ProbabilitySum`.
    #[default]
    Abort,
    /// Log a warning and merge anyway.
    Warn,
}

impl ProbabilityCheck {
    /// Expected value over a complete set of sibling branches.
    pub fn merge(self, branches: &[Roi]) -> Result<f64, EngineError> {
        let sum: f64 = branches.iter().map(Roi::probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
            let probabilities: Vec<f64> = branches.iter().map(Roi::probability).collect();
            match self {
                ProbabilityCheck::Abort => {
                    return Err(EngineError::ProbabilitySum {
                        sum,
                        branches: probabilities,
                    })
                }
                ProbabilityCheck::Warn => {
                    log::warn!("branch probabilities sum to {sum}: {probabilities:?}")
                }
            }
        }
        Ok(branches
            .iter()
            .map(|branch| branch.probability * branch.value)
            .sum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_weights_values() {
        let branches = [Roi::new(0.25, WIN), Roi::new(0.5, LOSS), Roi::new(0.25, 2.0)];
        let merged = ProbabilityCheck::Abort.merge(&branches).unwrap();
        assert!((merged - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_incomplete_branches_abort() {
        let branches = [Roi::new(0.5, WIN), Roi::new(0.4, LOSS)];
        match ProbabilityCheck::Abort.merge(&branches) {
            Err(EngineError::ProbabilitySum { sum, branches }) => {
                assert!((sum - 0.9).abs() < 1e-12);
                assert_eq!(branches, vec![0.5, 0.4]);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_incomplete_branches_warn() {
        let branches = [Roi::new(0.5, WIN), Roi::new(0.4, LOSS)];
        let merged = ProbabilityCheck::Warn.merge(&branches).unwrap();
        assert!((merged - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_rounding_within_tolerance_is_accepted() {
        let branches = [Roi::new(1.0 / 3.0, WIN); 3];
        assert!(ProbabilityCheck::Abort.merge(&branches).is_ok());
    }
}
