//! Trace source strategies evaluated in order by the resolver.

use crate::api::{PendingTraceRequest, TraceApi, TraceRequest};
use crate::error::TraceApiError;
use crate::hash::NormalizedHash;
use crate::trace::TraceRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// One place a trace may be found.
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Stable name used in logs and errors.
    fn name(&self) -> &str;

    /// Records matching `hash`, in source order. Empty means "not here".
    async fn lookup(&self, hash: &NormalizedHash) -> Result<Vec<TraceRecord>, TraceApiError>;
}

/// Traces still being executed, keyed by external message hash.
#[derive(Clone)]
pub struct PendingTraceSource {
    api: Arc<dyn TraceApi>,
}

impl PendingTraceSource {
    pub fn new(api: Arc<dyn TraceApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TraceSource for PendingTraceSource {
    fn name(&self) -> &str {
        "pending"
    }

    async fn lookup(&self, hash: &NormalizedHash) -> Result<Vec<TraceRecord>, TraceApiError> {
        let response = self
            .api
            .get_pending_trace(PendingTraceRequest {
                external_message_hash: vec![hash.to_base64()],
            })
            .await?;
        Ok(response.records())
    }
}

/// Indexed traces, keyed by trace id (the root message hash).
#[derive(Clone)]
pub struct CompletedTraceSource {
    api: Arc<dyn TraceApi>,
}

impl CompletedTraceSource {
    pub fn new(api: Arc<dyn TraceApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl TraceSource for CompletedTraceSource {
    fn name(&self) -> &str {
        "completed"
    }

    async fn lookup(&self, hash: &NormalizedHash) -> Result<Vec<TraceRecord>, TraceApiError> {
        let response = self
            .api
            .get_trace(TraceRequest {
                trace_id: vec![hash.to_base64()],
            })
            .await?;
        Ok(response.records())
    }
}
