use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Stable external identity of an asset. The snapshot maps it to a global
/// index in [0, token_count) via [`MarketView::index_of_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(pub u64);

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Venue kind, selects the invariant constraint the venue must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum VenueKind {
    /// Constant-product pool (Uniswap v2 like)
    Xyk,
    /// Constant-sum cross-chain transfer
    Transfer,
}

/// One trading venue of the snapshot: an ordered token pair with its
/// two-sided reserve, the proportional reduction applied to the tendered
/// side, and a fixed USD cost paid once if the venue carries any flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub kind: VenueKind,
    /// Ordered token pair: leg 0 and leg 1
    pub pair: [TokenId; 2],
    pub reserves: [f64; 2],
    /// Share of the tendered amount reaching the reserve (0.997 = 30 bps fee)
    pub fee: f64,
    /// Fixed activation cost in USD
    pub cost_usd: f64,
}

impl Venue {
    pub fn pool(pair: [TokenId; 2], reserves: [f64; 2], fee: f64, cost_usd: f64) -> Self {
        Venue { kind: VenueKind::Xyk, pair, reserves, fee, cost_usd }
    }

    pub fn transfer(pair: [TokenId; 2], reserves: [f64; 2], fee: f64, cost_usd: f64) -> Self {
        Venue { kind: VenueKind::Transfer, pair, reserves, fee, cost_usd }
    }
}

/// One routing request: trade `amount_in` of `token_in` for a maximum amount
/// of `token_out`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub token_in: TokenId,
    pub token_out: TokenId,
    pub amount_in: f64,
    /// Spend-maximal semantics: the solver must commit the configured share
    /// of the full input. `false` is not implemented and fails fast.
    pub spend_maximal: bool,
}

impl TradeRequest {
    pub fn new(token_in: TokenId, token_out: TokenId, amount_in: f64) -> Self {
        TradeRequest { token_in, token_out, amount_in, spend_maximal: true }
    }
}

/// Per-venue tri-state activation pin for a solve: `None` leaves the venue
/// free, `Some(true)` pins it on, `Some(false)` pins it off and zeroes its
/// flow. A no-trade venue is always represented as `Some(false)`, never as a
/// numeric sentinel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationMask(Vec<Option<bool>>);

impl ActivationMask {
    /// Mask leaving every venue free.
    pub fn unset(venues: usize) -> Self {
        ActivationMask(vec![None; venues])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, venue: usize) -> Option<bool> {
        self.0.get(venue).copied().flatten()
    }

    /// Pin one venue on or off. Panics when `venue` is out of bounds.
    pub fn pin(&mut self, venue: usize, on: bool) {
        self.0[venue] = Some(on);
    }

    pub fn entries(&self) -> &[Option<bool>] {
        &self.0
    }

    /// Venues that may still carry flow (everything not pinned off).
    pub fn candidate_count(&self) -> usize {
        self.0.iter().filter(|e| **e != Some(false)).count()
    }

    pub fn all_off(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|e| *e == Some(false))
    }
}

impl From<Vec<Option<bool>>> for ActivationMask {
    fn from(entries: Vec<Option<bool>>) -> Self {
        ActivationMask(entries)
    }
}

/// Read-only venue/reserve snapshot plus the oracle lookups the model
/// builder and the threshold pass need. Loading and constructing the
/// snapshot is the caller's concern; the routing core never mutates it.
pub trait MarketView {
    fn token_count(&self) -> usize;
    fn venue_count(&self) -> usize;
    fn venue(&self, index: usize) -> &Venue;
    fn index_of_token(&self, token: &TokenId) -> Option<usize>;
    /// Largest reserve of the token available anywhere, in token units.
    /// Caps how much a single venue may be tendered.
    fn maximal_reserve_of(&self, token: usize) -> f64;
    fn token_price_in_usd(&self, token: usize) -> Result<f64, String>;
}
