//! Normalized hashing of external-in messages.
//!
//! Relays and re-broadcasts may rewrite the sender-supplied `src` and
//! `import_fee` of an external message without changing what it does.
//! Clearing both and storing the body behind a reference yields a key that
//! is stable across such rewrites (the TEP-467 normalization).

use crate::error::TraceError;
use crate::hash::{NormalizedHash, decode_base64};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tontrace_cell::{
    ArcCell, CommonMsgInfo, ExternalAddress, ExternalInMsgInfo, Layout, Message, MessageKind,
    StoreLayout, cell_hash, parse_single_root, serialize,
};

/// A decoded signed message: the BOC root cell and its parsed layout.
#[derive(Debug, Clone)]
pub struct SignedMessage {
    root: ArcCell,
    message: Message,
}

impl SignedMessage {
    pub fn from_cell(root: ArcCell) -> Result<Self, TraceError> {
        let message = Message::from_cell(&root)?;
        Ok(Self { root, message })
    }

    /// Decode a raw bag of cells with a single message root.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TraceError> {
        Self::from_cell(parse_single_root(bytes)?)
    }

    /// Decode a base64 bag of cells (either alphabet, padding optional).
    pub fn from_base64(encoded: &str) -> Result<Self, TraceError> {
        let encoded = encoded.trim();
        if encoded.is_empty() {
            return Err(TraceError::MalformedMessage("empty BOC".into()));
        }
        let bytes = decode_base64(encoded)
            .map_err(|e| TraceError::MalformedMessage(format!("invalid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn root(&self) -> &ArcCell {
        &self.root
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn kind(&self) -> MessageKind {
        self.message.kind()
    }

    /// Hash of the message exactly as encoded.
    pub fn root_hash(&self) -> NormalizedHash {
        NormalizedHash::from(cell_hash(&self.root))
    }

    /// Re-encode the original root as base64 with a CRC32-C trailer.
    pub fn to_base64(&self) -> Result<String, TraceError> {
        Ok(STANDARD.encode(serialize(&self.root)?))
    }
}

/// What normalization does with a message's `StateInit`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateInitPolicy {
    /// Hash the state-init as part of the message.
    #[default]
    Preserve,
    /// Drop the state-init before hashing, as TEP-467 indexers do.
    Discard,
}

impl StateInitPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preserve => "preserve",
            Self::Discard => "discard",
        }
    }
}

impl fmt::Display for StateInitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StateInitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "preserve" => Ok(Self::Preserve),
            "discard" => Ok(Self::Discard),
            other => Err(format!(
                "invalid state-init policy `{other}` (expected `preserve` or `discard`)"
            )),
        }
    }
}

/// Derives trace lookup keys from signed messages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHashNormalizer {
    state_init: StateInitPolicy,
}

impl MessageHashNormalizer {
    pub fn new(state_init: StateInitPolicy) -> Self {
        Self { state_init }
    }

    pub fn state_init_policy(&self) -> StateInitPolicy {
        self.state_init
    }

    /// Strict normalization: only external-in messages are accepted.
    ///
    /// `src` becomes `addr_none`, `import_fee` becomes zero, `dest` and the
    /// body content are kept, and body and state-init are stored as child
    /// references before taking the root cell hash.
    pub fn normalize_external_in(&self, message: &Message) -> Result<NormalizedHash, TraceError> {
        let CommonMsgInfo::ExternalIn(info) = &message.info else {
            return Err(TraceError::InvalidMessageKind {
                expected: MessageKind::ExternalIn,
                actual: message.kind(),
            });
        };

        let init = match self.state_init {
            StateInitPolicy::Preserve => message.init.clone(),
            StateInitPolicy::Discard => None,
        };
        let normalized = Message {
            info: CommonMsgInfo::ExternalIn(ExternalInMsgInfo {
                src: ExternalAddress::None,
                dest: info.dest.clone(),
                import_fee: BigUint::default(),
            }),
            init,
            init_layout: Layout::Reference,
            body: Arc::clone(&message.body),
            body_layout: Layout::Reference,
        };

        let cell = normalized.to_cell(StoreLayout::ForceReference)?;
        Ok(NormalizedHash::from(cell_hash(&cell)))
    }

    /// Lookup key for any message: the normalized hash for external-in, the
    /// raw root cell hash for every other kind.
    pub fn lookup_hash(&self, message: &SignedMessage) -> Result<NormalizedHash, TraceError> {
        match message.kind() {
            MessageKind::ExternalIn => self.normalize_external_in(message.message()),
            _ => Ok(message.root_hash()),
        }
    }
}
