//! The uniform result shape every venue kernel returns.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    InsufficientLiquidity,
    IterationCapExceeded,
    InvalidInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapOutcome<State> {
    pub success: bool,
    pub output_amount: u64,
    pub new_state: State,
    pub price_impact_bps: u32,
    pub fee_paid: u64,
    pub error: Option<SimError>,
}

impl<State: Copy> SwapOutcome<State> {
    pub fn failure(unchanged_state: State, error: SimError) -> Self {
        Self {
            success: false,
            output_amount: 0,
            new_state: unchanged_state,
            price_impact_bps: 0,
            fee_paid: 0,
            error: Some(error),
        }
    }
}

/// `(price_after − price_before) / price_before`, in basis points, using
/// the ratio of marginal prices implied by output/input at the margin.
pub fn price_impact_bps(spot_price_before_q64: u128, spot_price_after_q64: u128) -> u32 {
    if spot_price_before_q64 == 0 {
        return 0;
    }
    let diff = spot_price_before_q64.abs_diff(spot_price_after_q64);
    let bps = (diff.saturating_mul(10_000)) / spot_price_before_q64;
    bps.min(10_000) as u32
}
