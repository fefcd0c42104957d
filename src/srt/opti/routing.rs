use ndarray::{arr1, Array1};

use crate::core::trades::net_trades;
use crate::error::{Result, RouterError};
use crate::types::config::RouterConfig;
use crate::types::market::{ActivationMask, MarketView, TradeRequest};
use crate::types::solution::{Solution, VenueOperation};

use super::model::{build_model, RouteModel};
use super::solver::{select_mode, SolverBackend};

/// Runs one model build and one backend invocation, then eagerly freezes the
/// returned numbers into a [`Solution`]. Nothing keeps a reference into the
/// model afterwards.
pub fn solve_once(view: &dyn MarketView, request: &TradeRequest, mask: &ActivationMask, config: &RouterConfig, backend: &dyn SolverBackend) -> Result<Solution> {
    let mode = select_mode(mask, config.mi_venue_count);
    tracing::info!("Optimization mode: {} ({} candidate venues)", mode, mask.candidate_count());
    let model = build_model(view, request, mask, config, mode)?;
    let raw = backend.solve(&model).map_err(RouterError::Backend)?;
    if !raw.status.is_usable() {
        return Err(RouterError::InfeasibleProblem(raw.status));
    }
    let count = model.venue_count();
    if raw.deltas.len() != count || raw.lambdas.len() != count || raw.etas.len() != count {
        return Err(RouterError::Backend(format!(
            "backend {} returned {}/{}/{} variable blocks for {} venues",
            backend.name(),
            raw.deltas.len(),
            raw.lambdas.len(),
            raw.etas.len(),
            count
        )));
    }

    // Aggregate the per-venue nets into the global per-token vector through
    // the incidence matrices.
    let mut psi: Array1<f64> = Array1::zeros(model.token_count);
    for (i, venue) in model.venues.iter().enumerate() {
        let net = arr1(&[raw.lambdas[i][0] - raw.deltas[i][0], raw.lambdas[i][1] - raw.deltas[i][1]]);
        psi += &venue.incidence.dot(&net);
    }
    let venue_tokens = model.venues.iter().map(|v| v.tokens).collect();
    let solution = Solution::new(raw.status, raw.deltas, raw.lambdas, raw.etas, psi, venue_tokens)?;

    tracing::info!("Solved: total in = {:.6}, total out = {:.6}", solution.received(model.source), solution.received(model.target));
    report(&solution, &model);
    Ok(solution)
}

/// Post-solve venue report: active venues at info, the rest at debug.
fn report(solution: &Solution, model: &RouteModel) {
    for i in 0..solution.venue_count() {
        let venue = &model.venues[i];
        if solution.etas[i] > 0.0 {
            tracing::info!(
                "Venue {}: tokens {:?} reserves {:?}, delta {:?}, lambda {:?}, eta {:.4}",
                i,
                venue.tokens,
                venue.reserves,
                solution.deltas[i],
                solution.lambdas[i],
                solution.etas[i]
            );
        } else {
            tracing::debug!(
                "Venue {}: tokens {:?} reserves {:?}, delta {:?}, lambda {:?}, eta {:.4}",
                i,
                venue.tokens,
                venue.reserves,
                solution.deltas[i],
                solution.lambdas[i],
                solution.etas[i]
            );
        }
    }
}

/// Derives the phase-2 activation mask from the phase-1 net trades: venues
/// with no net flow are pinned off, venues whose both legs fall below the USD
/// notional floor are pinned off, everything else stays free. Caller pins are
/// copied through verbatim and outrank the derived entries.
fn threshold_mask(view: &dyn MarketView, trades: &[Option<VenueOperation>], pins: &ActivationMask, config: &RouterConfig) -> Result<ActivationMask> {
    let mut mask = ActivationMask::unset(trades.len());
    for (i, trade) in trades.iter().enumerate() {
        if let Some(pin) = pins.get(i) {
            mask.pin(i, pin);
            continue;
        }
        match trade {
            Some(trade) => {
                let usd_in = trade.amount_in * view.token_price_in_usd(trade.token_in).map_err(RouterError::PriceOracle)?;
                let usd_out = trade.amount_out * view.token_price_in_usd(trade.token_out).map_err(RouterError::PriceOracle)?;
                if usd_in < config.min_usd_venue_amount && usd_out < config.min_usd_venue_amount {
                    tracing::warn!("Zeroing venue {} trade below notional floor: in ${:.2}, out ${:.2}", i, usd_in, usd_out);
                    mask.pin(i, false);
                } else {
                    tracing::info!("Retaining venue {} trade: in ${:.2}, out ${:.2}", i, usd_in, usd_out);
                }
            }
            None => {
                tracing::debug!("Zeroing venue {}: no net flow in the initial allocation", i);
                mask.pin(i, false);
            }
        }
    }
    Ok(mask)
}

/// Two-phase forced-activation protocol: an unmasked exploratory solve, the
/// notional threshold pass over its net trades, then a final solve with the
/// resulting mask. The second solution is the one handed downstream.
pub fn route(view: &dyn MarketView, request: &TradeRequest, pins: &ActivationMask, config: &RouterConfig, backend: &dyn SolverBackend) -> Result<Solution> {
    if pins.len() != view.venue_count() {
        return Err(RouterError::Config(format!("activation pins have {} entries for {} venues", pins.len(), view.venue_count())));
    }
    tracing::debug!("Routing {} of token {} into token {} over {} venues", request.amount_in, request.token_in, request.token_out, view.venue_count());

    let initial = solve_once(view, request, &ActivationMask::unset(view.venue_count()), config, backend)?;
    let trades = net_trades(&initial, config.minimal_amount);
    let mask = threshold_mask(view, &trades, pins, config)?;
    if mask.all_off() {
        return Err(RouterError::NoViableRoute("every venue was forced off by the threshold pass".into()));
    }
    solve_once(view, request, &mask, config, backend)
}
