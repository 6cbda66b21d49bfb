//! The pending-transaction queue: a bounded, signature-keyed store of
//! not-yet-confirmed transactions the engine has decoded swap legs out of,
//! used to find victims before they land.

pub mod legs;
pub mod queue;

pub use legs::{decode_swap_legs, extract_swap_legs, SwapProgramConfig};
pub use queue::{PendingQueue, PendingQueueConfig};
