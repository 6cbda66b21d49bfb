//! Structured, locally-handled failure modes for both detector modes.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OpportunityError {
    #[error("victim simulation failed")]
    VictimSimulationFailed,
    #[error("no candidate produced positive gross profit")]
    NoProfitableCandidate,
    #[error("net profit below floor: {net} < {floor}")]
    BelowProfitFloor { net: i128, floor: u64 },
    #[error("sanity check rejected the opportunity: {reason}")]
    SanityRejected { reason: String },
    #[error("token {token} still within price-check cooldown")]
    Cooldown { token: String },
}

pub type OpportunityResult<T> = Result<T, OpportunityError>;
