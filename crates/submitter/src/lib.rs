//! Fire-and-forget bundle submission: retry/backoff against a
//! `SubmissionTransport`, plus result-stream reconciliation.

pub mod counters;
pub mod error;
pub mod submitter;
pub mod transport;

pub use counters::{SubmitCounters, SubmitCountersSnapshot};
pub use error::{SubmitError, SubmitResult};
pub use submitter::{SeenSets, Submitter, SubmitterConfig};
pub use transport::{BundleResultEvent, BundleState, SubmissionTransport, TestTransport};
