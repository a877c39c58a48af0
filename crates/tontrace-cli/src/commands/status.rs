use crate::cli::{MessageArgs, NetworkArgs};
use crate::support::{
    build_resolver_or_exit, exit_with, load_message_or_exit, load_settings_or_exit,
    overrides_from, print_json_or_exit, runtime_or_exit,
};
use serde::Serialize;
use tontrace_kernel::{NormalizedHash, TraceError, TraceStatusResolver, TransactionStatus};

/// One resolution: the key that was looked up, who answered, and the status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub hash: NormalizedHash,
    pub source: Option<String>,
    #[serde(flatten)]
    pub status: TransactionStatus,
}

impl StatusReport {
    pub async fn resolve(
        resolver: &TraceStatusResolver,
        hash: NormalizedHash,
    ) -> Result<Self, TraceError> {
        let lookup = resolver.resolve(&hash).await?;
        Ok(Self {
            hash,
            source: lookup.source().map(str::to_string),
            status: lookup.status(),
        })
    }

    pub fn print_text(&self) {
        println!("  hash: {}", self.hash);
        println!("  status: {}", self.status.status);
        println!("  source: {}", self.source.as_deref().unwrap_or("(not indexed)"));
        println!(
            "  messages: {} total, {} completed, {} pending",
            self.status.total_messages,
            self.status.completed_messages,
            self.status.pending_messages
        );
        if self.status.actions.is_empty() {
            println!("  actions: (none)");
        } else {
            println!("  actions:");
            for action in &self.status.actions {
                let outcome = if action.success { "ok" } else { "failed" };
                println!("    - {} ({outcome})", action.action_type);
            }
        }
    }
}

pub fn run(message: MessageArgs, network: NetworkArgs, json: bool) {
    let signed = load_message_or_exit(&message);
    let settings = load_settings_or_exit(network.config.as_deref(), &overrides_from(&network));
    let resolver = build_resolver_or_exit(&settings);
    let hash = resolver
        .normalizer()
        .lookup_hash(&signed)
        .unwrap_or_else(|e| exit_with(e));

    let runtime = runtime_or_exit();
    let report = runtime
        .block_on(StatusReport::resolve(&resolver, hash))
        .unwrap_or_else(|e| exit_with(e));

    if json {
        print_json_or_exit(&report);
    } else {
        println!("tontrace status ({})", settings.network);
        report.print_text();
    }
}
