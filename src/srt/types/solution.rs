use ndarray::Array1;
use serde::Serialize;
use strum_macros::Display;

use crate::error::{Result, RouterError};

/// Termination status reported by the optimization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    OptimalInaccurate,
    Infeasible,
    Unbounded,
    Unknown,
}

impl SolverStatus {
    /// Exact optimum or optimum within tolerance. Anything else is fatal for
    /// the routing call.
    pub fn is_usable(&self) -> bool {
        matches!(self, SolverStatus::Optimal | SolverStatus::OptimalInaccurate)
    }
}

/// Raw numeric values returned by the backend, one entry of each vector per
/// venue. `deltas` is what each venue is given, `lambdas` what is taken out,
/// `etas` the activation indicator.
#[derive(Debug, Clone)]
pub struct RawSolution {
    pub status: SolverStatus,
    pub deltas: Vec<[f64; 2]>,
    pub lambdas: Vec<[f64; 2]>,
    pub etas: Vec<f64>,
}

/// Solved allocation, populated once with plain numbers at the moment the
/// backend returns. Holds no reference into the live model.
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub status: SolverStatus,
    pub deltas: Vec<[f64; 2]>,
    pub lambdas: Vec<[f64; 2]>,
    pub etas: Vec<f64>,
    /// Net amount received per global token index
    pub psi: Array1<f64>,
    /// Global token-index pair of each venue's two legs
    pub venue_tokens: Vec<[usize; 2]>,
}

impl Solution {
    /// Freezes one backend result. The per-venue vectors must all have one
    /// entry per venue and the venue count must be positive.
    pub fn new(status: SolverStatus, deltas: Vec<[f64; 2]>, lambdas: Vec<[f64; 2]>, etas: Vec<f64>, psi: Array1<f64>, venue_tokens: Vec<[usize; 2]>) -> Result<Self> {
        let count = deltas.len();
        if count == 0 {
            return Err(RouterError::Backend("solution covers zero venues".into()));
        }
        if lambdas.len() != count || etas.len() != count || venue_tokens.len() != count {
            return Err(RouterError::Backend(format!(
                "solution vector counts disagree: {} deltas, {} lambdas, {} etas, {} venue pairs",
                count,
                lambdas.len(),
                etas.len(),
                venue_tokens.len()
            )));
        }
        Ok(Solution { status, deltas, lambdas, etas, psi, venue_tokens })
    }

    pub fn venue_count(&self) -> usize {
        self.deltas.len()
    }

    /// Net received amount of the token at `global_index`.
    pub fn received(&self, global_index: usize) -> f64 {
        self.psi[global_index]
    }
}

/// Single directed net trade over one venue, obtained by netting the venue's
/// received vector against its given vector. Token fields are global indices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VenueOperation {
    pub venue: usize,
    pub token_in: usize,
    pub amount_in: f64,
    pub token_out: usize,
    pub amount_out: f64,
}
