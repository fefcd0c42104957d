//! Application constants and default configuration values

/// Default epsilon below which amounts, reserves and activations are solver noise
pub const DEFAULT_MINIMAL_AMOUNT: f64 = 1e-5;

/// Default candidate-venue threshold at or below which solving is mixed integer
pub const DEFAULT_MI_VENUE_COUNT: usize = 8;

/// Min trade leg worth USD for a venue to survive the threshold pass
pub const DEFAULT_MIN_USD_VENUE_AMOUNT: f64 = 5.0;

/// Default share of the input amount the solver must commit
pub const DEFAULT_INPUT_COMMITMENT: f64 = 0.8;

/// Hard cap on decomposition worklist steps (termination is already guaranteed
/// by strictly decreasing per-token counters on well-formed trade sets)
pub const MAX_DECOMPOSITION_STEPS: usize = 10_000;
