//! The caller-facing status summary.

use crate::trace::{ClassifiedAction, TraceRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Pending,
    Completed,
    Failed,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure projection of a trace lookup. Serializes in camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatus {
    pub status: StatusKind,
    pub total_messages: u64,
    pub pending_messages: u64,
    pub completed_messages: u64,
    pub actions: Vec<ClassifiedAction>,
}

impl TransactionStatus {
    /// Nothing indexed yet: the message is assumed to still be propagating.
    pub fn not_found() -> Self {
        Self {
            status: StatusKind::Pending,
            total_messages: 0,
            pending_messages: 0,
            completed_messages: 0,
            actions: Vec::new(),
        }
    }

    pub fn from_record(record: &TraceRecord) -> Self {
        let status = if record.is_effectively_complete() {
            StatusKind::Completed
        } else {
            record.trace_state.status()
        };

        if record.pending_messages > record.total_messages {
            warn!(
                total = record.total_messages,
                pending = record.pending_messages,
                "indexer reported more pending than total messages"
            );
        }

        Self {
            status,
            total_messages: record.total_messages,
            pending_messages: record.pending_messages,
            completed_messages: record.total_messages.saturating_sub(record.pending_messages),
            actions: record.actions.clone(),
        }
    }

    /// `completed` or `failed`.
    pub fn is_final(&self) -> bool {
        self.status != StatusKind::Pending
    }

    /// Whether an action of `action_type` already succeeded, even if the
    /// rest of the trace is still running.
    pub fn action_succeeded(&self, action_type: &str) -> bool {
        self.actions
            .iter()
            .any(|action| action.action_type == action_type && action.success)
    }
}
