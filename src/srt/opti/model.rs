use ndarray::{Array1, Array2};

use crate::error::{Result, RouterError};
use crate::types::config::RouterConfig;
use crate::types::market::{ActivationMask, MarketView, TradeRequest, VenueKind};

use super::solver::SolveMode;

/// Per-venue block of the optimization model.
#[derive(Debug, Clone)]
pub struct VenueModel {
    /// token_count x 2 incidence matrix mapping the two local legs to global
    /// token indices
    pub incidence: Array2<f64>,
    /// Pre-trade reserves, zeroed when the venue is degenerate
    pub reserves: [f64; 2],
    /// Share of the tendered amount reaching the reserve
    pub fee: f64,
    pub kind: VenueKind,
    /// Global token index of each leg
    pub tokens: [usize; 2],
}

/// One entry of the constraint set handed to the backend.
///
/// Post-trade reserves are `R + fee * delta - lambda` throughout.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// psi + current_assets >= 0: no token's net position goes negative
    NonNegativeHoldings,
    /// psi[token] <= -min_spend: floor on the routed share of the input
    InputCommitment { token: usize, min_spend: f64 },
    /// delta = lambda = 0
    VenueShutdown { venue: usize },
    /// eta pinned to 1 (on) or 0 (off)
    ActivationPinned { venue: usize, on: bool },
    /// geometric mean of post-trade reserves >= pre-trade geometric mean
    XykInvariant { venue: usize },
    /// sum of post-trade reserves >= pre-trade sum, post-trade reserves >= 0
    TransferInvariant { venue: usize },
    /// delta <= eta * caps, caps from the maximal-reserve oracle
    ActivationCapacity { venue: usize, caps: [f64; 2] },
}

/// Maximize `psi[target] - etas . activation_costs`.
#[derive(Debug, Clone)]
pub struct Objective {
    pub target: usize,
    /// Per-venue fixed USD cost converted into target-token units
    pub activation_costs: Vec<f64>,
}

/// Complete model for one solver invocation.
///
/// Variable domains: per venue, `delta` (given in) and `lambda` (taken out)
/// are non-negative 2-vectors and `eta` lies in [0, 1]. Under
/// [`SolveMode::MixedInteger`] delta and lambda are integer; eta is boolean
/// whenever `boolean_eta` is set.
#[derive(Debug, Clone)]
pub struct RouteModel {
    pub mode: SolveMode,
    pub boolean_eta: bool,
    pub token_count: usize,
    pub source: usize,
    pub target: usize,
    pub amount_in: f64,
    /// Caller holdings before any trade: `amount_in` at the source index
    pub current_assets: Array1<f64>,
    pub venues: Vec<VenueModel>,
    pub constraints: Vec<Constraint>,
    pub objective: Objective,
}

impl RouteModel {
    pub fn venue_count(&self) -> usize {
        self.venues.len()
    }
}

/// Builds the full model for one solve: incidence matrices, the constraint
/// set and the fixed-cost objective, with the activation mask passed through
/// and degenerate venues forced off.
pub fn build_model(view: &dyn MarketView, request: &TradeRequest, mask: &ActivationMask, config: &RouterConfig, mode: SolveMode) -> Result<RouteModel> {
    if !request.spend_maximal {
        return Err(RouterError::UnsupportedConfiguration("spend_maximal = false is not supported yet".into()));
    }
    let venue_count = view.venue_count();
    if venue_count == 0 {
        return Err(RouterError::NoViableRoute("snapshot contains no venues".into()));
    }
    if mask.len() != venue_count {
        return Err(RouterError::Config(format!("activation mask has {} entries for {} venues", mask.len(), venue_count)));
    }
    let token_count = view.token_count();
    let source = view.index_of_token(&request.token_in).ok_or(RouterError::TokenNotFound(request.token_in))?;
    let target = view.index_of_token(&request.token_out).ok_or(RouterError::TokenNotFound(request.token_out))?;

    let mut current_assets: Array1<f64> = Array1::zeros(token_count);
    current_assets[source] = request.amount_in;

    let eps = config.minimal_amount;
    let target_price = view.token_price_in_usd(target).map_err(RouterError::PriceOracle)?;
    if target_price <= 0.0 {
        return Err(RouterError::PriceOracle(format!("non-positive USD price for target token index {}", target)));
    }

    let mut venues = Vec::with_capacity(venue_count);
    let mut activation_costs = Vec::with_capacity(venue_count);
    let mut constraints = vec![
        Constraint::NonNegativeHoldings,
        Constraint::InputCommitment { token: source, min_spend: config.input_commitment * request.amount_in },
    ];

    for i in 0..venue_count {
        let venue = view.venue(i);
        let a = view.index_of_token(&venue.pair[0]).ok_or(RouterError::TokenNotFound(venue.pair[0]))?;
        let b = view.index_of_token(&venue.pair[1]).ok_or(RouterError::TokenNotFound(venue.pair[1]))?;
        let mut incidence: Array2<f64> = Array2::zeros((token_count, 2));
        incidence[[a, 0]] = 1.0;
        incidence[[b, 1]] = 1.0;

        // A reserve below epsilon on either leg makes the invariant
        // constraint meaningless: the venue is shut down and its reserves
        // zeroed, overriding any caller pin for this venue.
        let degenerate = venue.reserves[0] <= eps || venue.reserves[1] <= eps;
        if degenerate {
            if mask.get(i) == Some(true) {
                tracing::warn!("Venue {} is pinned on but one reserve leg is below {}, forcing it off", i, eps);
            } else {
                tracing::warn!("Venue {} has a reserve leg below {}, forcing it off", i, eps);
            }
            constraints.push(Constraint::ActivationPinned { venue: i, on: false });
            constraints.push(Constraint::VenueShutdown { venue: i });
        } else {
            match venue.kind {
                VenueKind::Xyk => constraints.push(Constraint::XykInvariant { venue: i }),
                VenueKind::Transfer => constraints.push(Constraint::TransferInvariant { venue: i }),
            }
            if let Some(on) = mask.get(i) {
                constraints.push(Constraint::ActivationPinned { venue: i, on });
                if !on {
                    constraints.push(Constraint::VenueShutdown { venue: i });
                }
            }
            if mask.get(i) != Some(false) {
                let caps = [view.maximal_reserve_of(a), view.maximal_reserve_of(b)];
                if caps[0] <= eps || caps[1] <= eps {
                    tracing::warn!("Venue {} trades a token with near-zero liquid amount globally (caps {:?})", i, caps);
                }
                constraints.push(Constraint::ActivationCapacity { venue: i, caps });
            }
        }

        activation_costs.push(venue.cost_usd / target_price);
        venues.push(VenueModel {
            incidence,
            reserves: if degenerate { [0.0, 0.0] } else { venue.reserves },
            fee: venue.fee,
            kind: venue.kind,
            tokens: [a, b],
        });
    }

    Ok(RouteModel {
        mode,
        boolean_eta: config.integer || mode == SolveMode::MixedInteger,
        token_count,
        source,
        target,
        amount_in: request.amount_in,
        current_assets,
        venues,
        constraints,
        objective: Objective { target, activation_costs },
    })
}
