use super::status::StatusReport;
use crate::cli::{MessageArgs, NetworkArgs};
use crate::support::{
    build_resolver_or_exit, exit_with, load_message_or_exit, load_settings_or_exit,
    overrides_from, runtime_or_exit,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;
use tontrace_kernel::{NormalizedHash, TraceError, TraceStatusResolver, TransactionStatus};
use tracing::warn;

pub struct Args {
    pub message: MessageArgs,
    pub network: NetworkArgs,
    pub interval_ms: Option<u64>,
    pub max_polls: Option<u32>,
    pub until_action: Option<String>,
    pub json: bool,
}

/// Why a watch stopped polling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Final,
    ActionSucceeded,
}

pub fn stop_reason(status: &TransactionStatus, until_action: Option<&str>) -> Option<StopReason> {
    if status.is_final() {
        return Some(StopReason::Final);
    }
    match until_action {
        Some(action) if status.action_succeeded(action) => Some(StopReason::ActionSucceeded),
        _ => None,
    }
}

/// Failure text once every poll is spent. A failed last poll is named so a
/// dead indexer does not read like a slow trace.
fn exhausted_message(max_polls: u32, last_error: Option<&TraceError>) -> String {
    match last_error {
        Some(e) => format!("trace not final after {max_polls} polls; last poll failed: {e}"),
        None => format!("trace not final after {max_polls} polls"),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PollLine<'a> {
    poll: u32,
    at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<StopReason>,
    #[serde(flatten)]
    report: &'a StatusReport,
}

pub fn run(args: Args) {
    let signed = load_message_or_exit(&args.message);
    let mut overrides = overrides_from(&args.network);
    overrides.interval_ms = args.interval_ms;
    overrides.max_polls = args.max_polls;
    let settings = load_settings_or_exit(args.network.config.as_deref(), &overrides);
    let resolver = build_resolver_or_exit(&settings);
    let hash = resolver
        .normalizer()
        .lookup_hash(&signed)
        .unwrap_or_else(|e| exit_with(e));

    if !args.json {
        println!("tontrace watch ({})", settings.network);
        println!("  hash: {hash}");
        println!(
            "  polling every {}ms, at most {} times",
            settings.watch.interval.as_millis(),
            settings.watch.max_polls
        );
    }

    let runtime = runtime_or_exit();
    let outcome = runtime.block_on(poll(
        &resolver,
        hash,
        settings.watch.interval,
        settings.watch.max_polls,
        args.until_action.as_deref(),
        args.json,
    ));
    if let Err(message) = outcome {
        exit_with(message);
    }
}

async fn poll(
    resolver: &TraceStatusResolver,
    hash: NormalizedHash,
    interval: Duration,
    max_polls: u32,
    until_action: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let mut last_error = None;
    for poll in 1..=max_polls {
        if poll > 1 {
            tokio::time::sleep(interval).await;
        }

        let report = match StatusReport::resolve(resolver, hash).await {
            Ok(report) => {
                last_error = None;
                report
            }
            Err(e) if e.is_retryable() => {
                warn!(poll, error = %e, "trace lookup failed; retrying");
                last_error = Some(e);
                continue;
            }
            Err(e) => return Err(e.to_string()),
        };

        let stop = stop_reason(&report.status, until_action);
        let at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        if json {
            let line = PollLine {
                poll,
                at,
                stop,
                report: &report,
            };
            let text = serde_json::to_string(&line).map_err(|e| e.to_string())?;
            println!("{text}");
        } else {
            println!(
                "[{at}] poll {poll}: {} ({}/{} messages completed)",
                report.status.status,
                report.status.completed_messages,
                report.status.total_messages
            );
        }

        if let Some(reason) = stop {
            if !json {
                if reason == StopReason::ActionSucceeded
                    && let Some(action) = until_action
                {
                    println!("  action `{action}` succeeded");
                }
                report.print_text();
            }
            return Ok(());
        }
    }

    Err(exhausted_message(max_polls, last_error.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tontrace_kernel::{ClassifiedAction, StatusKind, TraceApiError};

    fn status(kind: StatusKind, actions: &[(&str, bool)]) -> TransactionStatus {
        TransactionStatus {
            status: kind,
            total_messages: 3,
            pending_messages: u64::from(kind == StatusKind::Pending),
            completed_messages: 2,
            actions: actions
                .iter()
                .map(|(action_type, success)| ClassifiedAction {
                    action_type: action_type.to_string(),
                    success: *success,
                })
                .collect(),
        }
    }

    #[test]
    fn final_statuses_stop_the_watch() {
        assert_eq!(
            stop_reason(&status(StatusKind::Completed, &[]), None),
            Some(StopReason::Final)
        );
        assert_eq!(
            stop_reason(&status(StatusKind::Failed, &[]), Some("jetton_swap")),
            Some(StopReason::Final)
        );
        assert_eq!(stop_reason(&status(StatusKind::Pending, &[]), None), None);
    }

    #[test]
    fn successful_action_stops_a_pending_watch() {
        let pending = status(
            StatusKind::Pending,
            &[("jetton_swap", true), ("ton_transfer", false)],
        );
        assert_eq!(
            stop_reason(&pending, Some("jetton_swap")),
            Some(StopReason::ActionSucceeded)
        );
        assert_eq!(stop_reason(&pending, Some("ton_transfer")), None);
        assert_eq!(stop_reason(&pending, None), None);
    }

    #[test]
    fn exhausted_watch_names_the_last_failure() {
        assert_eq!(
            exhausted_message(3, None),
            "trace not final after 3 polls"
        );

        let down = TraceError::TraceSourceUnavailable {
            source_name: "pending".into(),
            cause: TraceApiError::Transport("connection refused".into()),
        };
        let message = exhausted_message(3, Some(&down));
        assert!(message.starts_with("trace not final after 3 polls; last poll failed: "));
        assert!(message.contains("trace source `pending` unavailable"));
        assert!(message.contains("connection refused"));
    }
}
