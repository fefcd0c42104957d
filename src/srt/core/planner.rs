use crate::error::{Result, RouterError};
use crate::opti::routing;
use crate::opti::solver::SolverBackend;
use crate::types::config::RouterConfig;
use crate::types::market::{ActivationMask, MarketView, TradeRequest};
use crate::types::solution::Solution;

use super::trades::net_trades;
use super::tree::{decompose, RouteTree};

/// Top-level routing surface: owns the configuration and the optimization
/// backend, and turns one trade request against one snapshot into a final
/// allocation and its execution tree.
pub struct Router {
    pub config: RouterConfig,
    pub backend: Box<dyn SolverBackend>,
}

/// Builder for creating Router instances
pub struct RouterBuilder {
    config: RouterConfig,
    backend: Box<dyn SolverBackend>,
}

impl RouterBuilder {
    pub fn new(config: RouterConfig, backend: Box<dyn SolverBackend>) -> Self {
        Self { config, backend }
    }

    pub fn build(self) -> Result<Router> {
        self.config.validate()?;
        tracing::info!("Building Router with backend: {}", self.backend.name());
        Ok(Router { config: self.config, backend: self.backend })
    }
}

impl Router {
    /// One model build and one backend call with an explicit activation mask.
    pub fn solve(&self, view: &dyn MarketView, request: &TradeRequest, mask: &ActivationMask) -> Result<Solution> {
        routing::solve_once(view, request, mask, &self.config, self.backend.as_ref())
    }

    /// Two-phase solve with every venue initially free.
    pub fn route(&self, view: &dyn MarketView, request: &TradeRequest) -> Result<Solution> {
        self.route_pinned(view, request, &ActivationMask::unset(view.venue_count()))
    }

    /// Two-phase solve honoring caller activation pins in the second phase.
    pub fn route_pinned(&self, view: &dyn MarketView, request: &TradeRequest, pins: &ActivationMask) -> Result<Solution> {
        routing::route(view, request, pins, &self.config, self.backend.as_ref())
    }

    /// Full pipeline: two-phase solve, netting, tree decomposition. The tree
    /// is built once from the final solution and handed to the caller.
    pub fn plan(&self, view: &dyn MarketView, request: &TradeRequest) -> Result<(Solution, RouteTree)> {
        let solution = self.route(view, request)?;
        let trades: Vec<_> = net_trades(&solution, self.config.minimal_amount).into_iter().flatten().collect();
        let source = view.index_of_token(&request.token_in).ok_or(RouterError::TokenNotFound(request.token_in))?;
        let tree = decompose(&trades, source, request.amount_in, view.token_count(), self.config.minimal_amount)?;
        if self.config.debug {
            tracing::debug!("Route tree:\n{}", tree.render());
        }
        Ok((solution, tree))
    }
}
