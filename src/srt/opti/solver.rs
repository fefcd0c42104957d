use strum_macros::{Display, EnumString};

use crate::types::market::ActivationMask;
use crate::types::solution::RawSolution;

use super::model::RouteModel;

/// Variable-domain regime for one backend invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SolveMode {
    /// Boolean activations, integer flows
    MixedInteger,
    /// Everything continuous, activations relaxed to [0, 1]
    ContinuousRelaxation,
}

/// Picks the solving mode from the activation mask alone.
///
/// Venues pinned off cannot carry flow, so only the remaining candidates
/// drive mixed-integer size: at or below `threshold` candidates the problem
/// is small enough for boolean activations, otherwise relax.
pub fn select_mode(mask: &ActivationMask, threshold: usize) -> SolveMode {
    if mask.candidate_count() <= threshold {
        SolveMode::MixedInteger
    } else {
        SolveMode::ContinuousRelaxation
    }
}

/// Opaque optimization backend. The engine behind this call and its tuning
/// (tolerances, iteration limits, timeouts) are configuration, not core
/// logic, and no fallback engine is ever attempted.
pub trait SolverBackend {
    fn name(&self) -> String;

    /// Solve the model and return raw values for every variable. Transport
    /// failures surface as plain strings at this seam.
    fn solve(&self, model: &RouteModel) -> Result<RawSolution, String>;
}
