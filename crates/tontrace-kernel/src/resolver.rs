//! Trace status resolution over an ordered chain of sources.

use crate::api::TraceApi;
use crate::error::TraceError;
use crate::hash::NormalizedHash;
use crate::normalize::{MessageHashNormalizer, SignedMessage};
use crate::source::{CompletedTraceSource, PendingTraceSource, TraceSource};
use crate::status::TransactionStatus;
use crate::trace::TraceRecord;
use std::sync::Arc;
use tracing::debug;

/// Outcome of walking the source chain for one hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceLookup {
    /// No source knows the hash yet.
    NotFound,
    /// First record of the first source that returned any.
    Found { source: String, record: TraceRecord },
}

impl TraceLookup {
    pub fn status(&self) -> TransactionStatus {
        match self {
            Self::NotFound => TransactionStatus::not_found(),
            Self::Found { record, .. } => TransactionStatus::from_record(record),
        }
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            Self::NotFound => None,
            Self::Found { source, .. } => Some(source),
        }
    }
}

/// Resolves a message (or its hash) to a [`TransactionStatus`].
///
/// Sources are queried one after another; the first non-empty answer wins
/// and later sources are not contacted. A failing source ends the walk with
/// [`TraceError::TraceSourceUnavailable`].
pub struct TraceStatusResolver {
    normalizer: MessageHashNormalizer,
    sources: Vec<Box<dyn TraceSource>>,
}

impl TraceStatusResolver {
    /// A resolver with an empty source chain.
    pub fn new(normalizer: MessageHashNormalizer) -> Self {
        Self {
            normalizer,
            sources: Vec::new(),
        }
    }

    /// The default chain: pending traces, then completed traces.
    pub fn for_api(api: Arc<dyn TraceApi>, normalizer: MessageHashNormalizer) -> Self {
        Self::new(normalizer)
            .with_source(PendingTraceSource::new(Arc::clone(&api)))
            .with_source(CompletedTraceSource::new(api))
    }

    /// Append a source after the existing ones.
    pub fn with_source(mut self, source: impl TraceSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn normalizer(&self) -> &MessageHashNormalizer {
        &self.normalizer
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|source| source.name()).collect()
    }

    pub async fn resolve(&self, hash: &NormalizedHash) -> Result<TraceLookup, TraceError> {
        for source in &self.sources {
            let name = source.name();
            debug!(source = name, hash = %hash, "querying trace source");

            let records = source.lookup(hash).await.map_err(|cause| {
                debug!(source = name, error = %cause, "trace source failed");
                TraceError::TraceSourceUnavailable {
                    source_name: name.to_string(),
                    cause,
                }
            })?;

            if let Some(record) = records.into_iter().next() {
                debug!(
                    source = name,
                    state = ?record.trace_state,
                    total = record.total_messages,
                    pending = record.pending_messages,
                    "trace found"
                );
                return Ok(TraceLookup::Found {
                    source: name.to_string(),
                    record,
                });
            }
        }

        debug!(hash = %hash, "trace not indexed by any source");
        Ok(TraceLookup::NotFound)
    }

    pub async fn status_for_hash(
        &self,
        hash: &NormalizedHash,
    ) -> Result<TransactionStatus, TraceError> {
        Ok(self.resolve(hash).await?.status())
    }

    pub async fn status_for_message(
        &self,
        message: &SignedMessage,
    ) -> Result<TransactionStatus, TraceError> {
        let hash = self.normalizer.lookup_hash(message)?;
        self.status_for_hash(&hash).await
    }

    /// Decode a base64 BOC and resolve it. Decoding errors surface before
    /// any source is queried.
    pub async fn status_for_boc(&self, boc: &str) -> Result<TransactionStatus, TraceError> {
        let message = SignedMessage::from_base64(boc)?;
        self.status_for_message(&message).await
    }

    pub async fn status_for_bytes(&self, bytes: &[u8]) -> Result<TransactionStatus, TraceError> {
        let message = SignedMessage::from_bytes(bytes)?;
        self.status_for_message(&message).await
    }
}
