/// =============================================================================
/// Error Handling Module
/// =============================================================================
///
/// @description: Centralized error handling for the routing core. This module
/// defines the main error type shared by the model builder, the two-phase
/// solver invoker and the route tree builder. No error below is retried
/// internally and no partial plan is ever returned: the first failure aborts
/// the whole routing attempt.
/// =============================================================================
use thiserror::Error;

use crate::types::market::TokenId;
use crate::types::solution::SolverStatus;

/// =============================================================================
/// @enum: RouterError
/// @description: Main error type for routing operations
/// @variants:
/// - UnsupportedConfiguration: Request shape the core refuses to approximate
/// - InfeasibleProblem: Backend finished without a usable optimum
/// - NoViableRoute: Every venue ended up forced off
/// - TokenNotFound: Token lookup failures against the snapshot
/// - PriceOracle: USD valuation failures
/// - Backend: Transport or contract violations at the solver seam
/// - IterationCap: Route decomposition hit its defensive step bound
/// - Config: Configuration loading or validation errors
/// =============================================================================
#[derive(Error, Debug)]
pub enum RouterError {
    #[error("Unsupported configuration: {0}")]
    UnsupportedConfiguration(String),

    #[error("Infeasible problem: solver status {0}")]
    InfeasibleProblem(SolverStatus),

    #[error("No viable route: {0}")]
    NoViableRoute(String),

    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),

    #[error("Price oracle error: {0}")]
    PriceOracle(String),

    #[error("Solver backend error: {0}")]
    Backend(String),

    #[error("Route decomposition exceeded {0} steps")]
    IterationCap(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// =============================================================================
/// @type: Result
/// @description: Type alias for Result with RouterError
/// @generic T: Success type
/// =============================================================================
pub type Result<T> = std::result::Result<T, RouterError>;
