//! # tontrace kernel
//!
//! Answers one question about a signed TON external message: has the trace
//! it started finished, is it still running, or did it fail?
//!
//! A single external message spawns a tree of internal messages (a *trace*).
//! Indexers key traces by a normalized hash of that external message, so the
//! kernel first derives the lookup key, then asks an ordered chain of trace
//! sources and projects whatever it finds into a [`TransactionStatus`].
//!
//! ## Architecture
//!
//! ```text
//! SignedMessage           ← decoded BOC (root cell + Message)
//!     │
//! MessageHashNormalizer   ← src cleared, import_fee = 0, body by reference
//!     │
//! NormalizedHash          ← 32-byte lookup key (base64 on the wire)
//!     │
//! TraceSource chain       ← pending traces, then completed traces, …
//!     │
//! TraceLookup             ← NotFound | Found { source, record }
//!     │
//! TransactionStatus       ← pending | completed | failed + message counts
//! ```
//!
//! The kernel holds no mutable state and never retries or polls; callers own
//! retry, backoff and polling policy.

pub mod api;
pub mod error;
pub mod hash;
pub mod normalize;
pub mod resolver;
pub mod source;
pub mod status;
pub mod trace;

#[cfg(test)]
mod test_vectors;

pub use api::{PendingTraceRequest, TraceApi, TraceRequest};
pub use error::{TraceApiError, TraceError};
pub use hash::{NormalizedHash, ParseHashError};
pub use normalize::{MessageHashNormalizer, SignedMessage, StateInitPolicy};
pub use resolver::{TraceLookup, TraceStatusResolver};
pub use source::{CompletedTraceSource, PendingTraceSource, TraceSource};
pub use status::{StatusKind, TransactionStatus};
pub use trace::{
    ActionWire, ClassifiedAction, TraceInfoWire, TraceRecord, TraceState, TraceWire,
    TracesResponse,
};
