use serde::Deserialize;
use std::fs;

use crate::error::{Result, RouterError};
use crate::utils::constants::{DEFAULT_INPUT_COMMITMENT, DEFAULT_MINIMAL_AMOUNT, DEFAULT_MIN_USD_VENUE_AMOUNT, DEFAULT_MI_VENUE_COUNT};

/// Router configuration, exact match with config file (e.g. router.toml)
#[derive(Debug, Clone, Deserialize)]
pub struct RouterConfig {
    /// Render and log the route tree after decomposition
    pub debug: bool,
    /// Epsilon below which amounts, reserves and activations are noise
    pub minimal_amount: f64,
    /// Candidate-venue count at or below which solving is mixed integer
    pub mi_venue_count: usize,
    /// Min trade leg worth USD for a venue to survive the threshold pass
    pub min_usd_venue_amount: f64,
    /// Force boolean activation variables even under continuous relaxation
    pub integer: bool,
    /// Share of the input amount the solver must commit, in (0, 1]
    pub input_commitment: f64,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            debug: false,
            minimal_amount: DEFAULT_MINIMAL_AMOUNT,
            mi_venue_count: DEFAULT_MI_VENUE_COUNT,
            min_usd_venue_amount: DEFAULT_MIN_USD_VENUE_AMOUNT,
            integer: false,
            input_commitment: DEFAULT_INPUT_COMMITMENT,
        }
    }
}

impl RouterConfig {
    pub fn log_config(&self) {
        tracing::debug!("Router Config:");
        tracing::debug!("  Debug:                 {}", self.debug);
        tracing::debug!("  Minimal amount:        {}", self.minimal_amount);
        tracing::debug!("  MI venue count:        {}", self.mi_venue_count);
        tracing::debug!("  Min USD venue amount:  {}", self.min_usd_venue_amount);
        tracing::debug!("  Integer activations:   {}", self.integer);
        tracing::debug!("  Input commitment:      {}", self.input_commitment);
    }

    pub fn validate(&self) -> Result<()> {
        if self.minimal_amount <= 0.0 {
            return Err(RouterError::Config("minimal_amount must be > 0".into()));
        }
        if self.input_commitment <= 0.0 || self.input_commitment > 1.0 {
            return Err(RouterError::Config("input_commitment must be in (0, 1]".into()));
        }
        if self.min_usd_venue_amount < 0.0 {
            return Err(RouterError::Config("min_usd_venue_amount must be >= 0".into()));
        }
        Ok(())
    }
}

pub fn load_router_config(path: &str) -> Result<RouterConfig> {
    let contents = fs::read_to_string(path).map_err(|e| RouterError::Config(format!("Failed to read config file: {e}")))?;
    let config: RouterConfig = toml::from_str(&contents).map_err(|e| RouterError::Config(format!("Failed to parse TOML: {e}")))?;
    config.validate()?;
    Ok(config)
}
