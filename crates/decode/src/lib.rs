//! Account decoders: one function per account type, an explicit dispatch
//! table keyed by `(owner program, data length, discriminator)`, and the
//! transaction wire-format parser.

pub mod alt;
pub mod dispatch;
pub mod error;
pub mod reader;
pub mod spl_token;
pub mod tx;
pub mod venues;

pub use alt::decode_address_lookup_table;
pub use dispatch::{DecodedAccount, Dispatcher};
pub use error::{DecodeError, DecodeResult};
pub use spl_token::decode_token_amount;
pub use tx::parse_legacy_message;
