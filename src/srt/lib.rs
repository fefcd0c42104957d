///   =============================================================================
/// Splitroute Core Library (srt)
///   =============================================================================
///
/// @description: Core library for multi-venue trade routing. Builds the
/// constrained-optimization model splitting one input amount across pools and
/// cross-chain transfers, drives the two-phase forced-activation solving
/// protocol, and decodes the solved allocation into an executable route tree.
///   =============================================================================
pub mod core;
pub mod error;
pub mod opti;
pub mod types;
pub mod utils;
