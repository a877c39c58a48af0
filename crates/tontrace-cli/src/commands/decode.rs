use crate::cli::MessageArgs;
use crate::support::{load_message_or_exit, print_json_or_exit, yes_no};
use serde::Serialize;
use tontrace_cell::CommonMsgInfo;
use tontrace_kernel::{NormalizedHash, SignedMessage};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedMessage {
    pub kind: &'static str,
    pub src: String,
    pub dest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_fee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_lt: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u32>,
    pub body_layout: &'static str,
    pub body_bits: usize,
    pub body_refs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_init: Option<DecodedStateInit>,
    pub raw_hash: NormalizedHash,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedStateInit {
    pub layout: &'static str,
    pub has_code: bool,
    pub has_data: bool,
    pub has_library: bool,
}

impl DecodedMessage {
    pub fn from_signed(signed: &SignedMessage) -> Self {
        let message = signed.message();
        let mut decoded = Self {
            kind: message.kind().as_str(),
            src: message.info.src(),
            dest: message.info.dest(),
            import_fee: None,
            value: None,
            bounce: None,
            created_lt: None,
            created_at: None,
            body_layout: message.body_layout.as_str(),
            body_bits: message.body.bit_len(),
            body_refs: message.body.references().len(),
            state_init: message.init.as_ref().map(|init| DecodedStateInit {
                layout: message.init_layout.as_str(),
                has_code: init.code.is_some(),
                has_data: init.data.is_some(),
                has_library: init.library.is_some(),
            }),
            raw_hash: signed.root_hash(),
        };

        match &message.info {
            CommonMsgInfo::ExternalIn(info) => {
                decoded.import_fee = Some(info.import_fee.to_string());
            }
            CommonMsgInfo::Internal(info) => {
                decoded.value = Some(info.value.grams.to_string());
                decoded.bounce = Some(info.bounce);
                decoded.created_lt = Some(info.created_lt);
                decoded.created_at = Some(info.created_at);
            }
            CommonMsgInfo::ExternalOut(info) => {
                decoded.created_lt = Some(info.created_lt);
                decoded.created_at = Some(info.created_at);
            }
        }
        decoded
    }
}

pub fn run(message: MessageArgs, json: bool) {
    let signed = load_message_or_exit(&message);
    let decoded = DecodedMessage::from_signed(&signed);

    if json {
        print_json_or_exit(&decoded);
        return;
    }

    println!("tontrace decode");
    println!("  kind: {}", decoded.kind);
    println!("  src: {}", decoded.src);
    println!("  dest: {}", decoded.dest);
    if let Some(fee) = &decoded.import_fee {
        println!("  import fee: {fee}");
    }
    if let Some(value) = &decoded.value {
        println!("  value: {value}");
    }
    if let Some(bounce) = decoded.bounce {
        println!("  bounce: {}", yes_no(bounce));
    }
    if let Some(lt) = decoded.created_lt {
        println!("  created lt: {lt}");
    }
    println!(
        "  body: {} bits, {} refs ({})",
        decoded.body_bits, decoded.body_refs, decoded.body_layout
    );
    match &decoded.state_init {
        Some(init) => println!(
            "  state-init: {} (code: {}, data: {}, library: {})",
            init.layout,
            yes_no(init.has_code),
            yes_no(init.has_data),
            yes_no(init.has_library)
        ),
        None => println!("  state-init: (none)"),
    }
    println!("  raw hash: {}", decoded.raw_hash);
}
