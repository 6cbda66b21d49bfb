use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("transport rejected the bundle: {reason}")]
    TransportRejected { reason: String },
    #[error("submission retries exhausted after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

pub type SubmitResult<T> = Result<T, SubmitError>;
