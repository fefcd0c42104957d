//! Core Routing Module
//!
//! Netting of solved allocations into per-venue trades and decomposition of
//! the trade set into an execution tree.
pub mod planner;
pub mod trades;
pub mod tree;
