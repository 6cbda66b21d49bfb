use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BundleError {
    #[error("signer rejected the {leg} leg: {reason}")]
    SigningFailed { leg: &'static str, reason: String },
    #[error("victim transaction bytes were empty")]
    EmptyVictim,
}

pub type BundleResult<T> = Result<T, BundleError>;
