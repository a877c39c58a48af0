//! The remote trace-indexer interface the kernel consumes.

use crate::error::TraceApiError;
use crate::trace::TracesResponse;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Look up in-flight traces by external message hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTraceRequest {
    pub external_message_hash: Vec<String>,
}

/// Look up indexed traces by trace id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceRequest {
    pub trace_id: Vec<String>,
}

/// A trace indexer. Implementations own transport, timeouts and any
/// caching; the kernel only sequences calls.
#[async_trait]
pub trait TraceApi: Send + Sync {
    async fn get_pending_trace(
        &self,
        request: PendingTraceRequest,
    ) -> Result<TracesResponse, TraceApiError>;

    async fn get_trace(&self, request: TraceRequest) -> Result<TracesResponse, TraceApiError>;
}
