use crate::cli::MessageArgs;
use crate::support::{
    exit_with, load_message_or_exit, load_settings_or_exit, print_json_or_exit, yes_no,
};
use serde::Serialize;
use tontrace_cell::MessageKind;
use tontrace_kernel::{
    MessageHashNormalizer, NormalizedHash, SignedMessage, StateInitPolicy, TraceError,
};
use tontrace_toncenter::Overrides;

pub struct Args {
    pub message: MessageArgs,
    pub discard_state_init: bool,
    pub config: Option<String>,
    pub json: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HashReport {
    pub kind: &'static str,
    pub normalized: bool,
    pub hash: NormalizedHash,
    pub hash_hex: String,
    pub raw_hash: NormalizedHash,
    pub state_init: StateInitPolicy,
}

impl HashReport {
    pub fn build(
        normalizer: &MessageHashNormalizer,
        message: &SignedMessage,
    ) -> Result<Self, TraceError> {
        let hash = normalizer.lookup_hash(message)?;
        Ok(Self {
            kind: message.kind().as_str(),
            normalized: message.kind() == MessageKind::ExternalIn,
            hash_hex: hash.to_hex(),
            hash,
            raw_hash: message.root_hash(),
            state_init: normalizer.state_init_policy(),
        })
    }
}

pub fn run(args: Args) {
    let message = load_message_or_exit(&args.message);
    let overrides = Overrides {
        state_init: args.discard_state_init.then_some(StateInitPolicy::Discard),
        ..Overrides::default()
    };
    let settings = load_settings_or_exit(args.config.as_deref(), &overrides);
    let normalizer = MessageHashNormalizer::new(settings.state_init);

    let report = HashReport::build(&normalizer, &message).unwrap_or_else(|e| exit_with(e));

    if args.json {
        print_json_or_exit(&report);
        return;
    }

    println!("tontrace hash");
    println!("  kind: {}", report.kind);
    println!("  normalized: {}", yes_no(report.normalized));
    println!("  state-init: {}", report.state_init);
    println!("  hash (base64): {}", report.hash);
    println!("  hash (hex): {}", report.hash_hex);
    println!("  raw hash: {}", report.raw_hash);
}
