use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("wrong discriminator for {account_type}")]
    WrongDiscriminator { account_type: &'static str },

    #[error("length {actual} too short for {account_type} (need at least {minimum})")]
    TooShort {
        account_type: &'static str,
        actual: usize,
        minimum: usize,
    },

    #[error("field '{field}' out of range in {account_type}")]
    OutOfRangeField {
        account_type: &'static str,
        field: &'static str,
    },

    #[error("no dispatch entry for owner={owner} length={length}")]
    NoDispatchEntry { owner: String, length: usize },

    #[error("malformed transaction message: {reason}")]
    MalformedMessage { reason: String },
}

pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
