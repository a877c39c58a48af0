//! Trace records: the indexer wire shape and the reconciled snapshot.

use crate::status::StatusKind;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// `{ "traces": [...] }` as returned by both trace endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracesResponse {
    #[serde(default)]
    pub traces: Vec<TraceWire>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceWire {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub trace_info: TraceInfoWire,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<ActionWire>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceInfoWire {
    pub trace_state: String,
    #[serde(default)]
    pub messages: u64,
    #[serde(default)]
    pub pending_messages: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionWire {
    #[serde(rename = "type")]
    pub action_type: String,
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_id: Option<String>,
}

/// Progress label reported by the indexer for a whole trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceState {
    Complete,
    Pending,
    /// Any label other than `complete` or `pending`.
    Unknown,
}

impl TraceState {
    pub fn from_label(label: &str) -> Self {
        match label {
            "complete" => Self::Complete,
            "pending" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    /// Status implied by the label alone.
    pub fn status(self) -> StatusKind {
        match self {
            Self::Complete => StatusKind::Completed,
            Self::Pending => StatusKind::Pending,
            Self::Unknown => StatusKind::Failed,
        }
    }
}

/// A semantically typed sub-effect of a trace (swap, transfer, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifiedAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub success: bool,
}

/// Snapshot of one trace as seen by a single query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub trace_state: TraceState,
    pub total_messages: u64,
    pub pending_messages: u64,
    pub actions: Vec<ClassifiedAction>,
}

impl TraceRecord {
    pub fn from_wire(wire: &TraceWire) -> Self {
        let info = &wire.trace_info;
        let trace_state = TraceState::from_label(&info.trace_state);
        if trace_state == TraceState::Unknown {
            warn!(
                trace_state = %info.trace_state,
                trace_id = wire.trace_id.as_deref().unwrap_or("-"),
                "unrecognized trace state; reporting as failed"
            );
        }

        let actions = wire
            .actions
            .iter()
            .flatten()
            .map(|action| ClassifiedAction {
                action_type: action.action_type.clone(),
                success: action.success.unwrap_or(false),
            })
            .collect();

        Self {
            trace_state,
            total_messages: info.messages,
            pending_messages: info.pending_messages,
            actions,
        }
    }

    /// The indexer may keep a trace labelled `pending` for a while after its
    /// last message executed; zero pending messages counts as done.
    pub fn is_effectively_complete(&self) -> bool {
        match self.trace_state {
            TraceState::Complete => true,
            TraceState::Pending => self.pending_messages == 0,
            TraceState::Unknown => false,
        }
    }
}

impl TracesResponse {
    /// Records in the order the indexer returned them.
    pub fn records(&self) -> Vec<TraceRecord> {
        self.traces.iter().map(TraceRecord::from_wire).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PENDING_TRACES_FIXTURE: &str = r#"{
        "traces": [
            {
                "trace_id": "a1b2",
                "external_hash": "ignored",
                "trace_info": {
                    "trace_state": "pending",
                    "messages": 7,
                    "transactions": 5,
                    "pending_messages": 2,
                    "classification_state": "ok"
                },
                "actions": [
                    { "action_id": "x1", "type": "jetton_swap", "success": true },
                    { "action_id": "x2", "type": "ton_transfer", "success": null }
                ],
                "transactions_order": []
            }
        ],
        "address_book": {}
    }"#;

    #[test]
    fn decodes_indexer_payload_and_ignores_extra_fields() {
        let response: TracesResponse =
            serde_json::from_str(PENDING_TRACES_FIXTURE).expect("fixture should decode");
        let records = response.records();
        assert_eq!(records.len(), 1);

        let record = &records[0];
        assert_eq!(record.trace_state, TraceState::Pending);
        assert_eq!(record.total_messages, 7);
        assert_eq!(record.pending_messages, 2);
        assert_eq!(
            record.actions,
            vec![
                ClassifiedAction {
                    action_type: "jetton_swap".into(),
                    success: true
                },
                ClassifiedAction {
                    action_type: "ton_transfer".into(),
                    success: false
                },
            ]
        );
    }

    #[test]
    fn missing_actions_and_traces_default_to_empty() {
        let empty: TracesResponse = serde_json::from_str("{}").expect("empty object");
        assert!(empty.records().is_empty());

        let bare: TracesResponse = serde_json::from_str(
            r#"{"traces":[{"trace_info":{"trace_state":"complete","messages":1,"pending_messages":0},"actions":null}]}"#,
        )
        .expect("bare trace");
        assert!(bare.records()[0].actions.is_empty());
    }

    #[test]
    fn labels_map_to_states() {
        assert_eq!(TraceState::from_label("complete"), TraceState::Complete);
        assert_eq!(TraceState::from_label("pending"), TraceState::Pending);
        assert_eq!(TraceState::from_label("unknown"), TraceState::Unknown);
        assert_eq!(TraceState::from_label("Complete"), TraceState::Unknown);
        assert_eq!(TraceState::Unknown.status(), StatusKind::Failed);
    }

    #[test]
    fn effective_completion_needs_zero_pending_messages() {
        let mut record = TraceRecord {
            trace_state: TraceState::Pending,
            total_messages: 4,
            pending_messages: 0,
            actions: Vec::new(),
        };
        assert!(record.is_effectively_complete());

        record.pending_messages = 1;
        assert!(!record.is_effectively_complete());

        record.trace_state = TraceState::Unknown;
        record.pending_messages = 0;
        assert!(!record.is_effectively_complete());
    }
}
