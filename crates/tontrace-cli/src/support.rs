use crate::cli::{MessageArgs, NetworkArgs};
use serde::Serialize;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use std::process;
use std::sync::Arc;
use tontrace_kernel::{
    MessageHashNormalizer, SignedMessage, StateInitPolicy, TraceError, TraceStatusResolver,
};
use tontrace_toncenter::{ConfigFile, Overrides, Settings, ToncenterClient};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "TONTRACE_LOG";

const BOC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];

/// Logs go to stderr; stdout is reserved for command output and MCP frames.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug,hyper=info,reqwest=info,rustls=info")
        } else {
            EnvFilter::new("warn")
        }
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn exit_with(message: impl Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

pub fn runtime_or_exit() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap_or_else(|e| exit_with(format!("failed to create tokio runtime: {e}")))
}

pub fn print_json_or_exit<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => exit_with(format!("json serialization failed: {e}")),
    }
}

/// Decode the message named by `--boc` or `--boc-file`. A file may hold the
/// raw bag of cells or its base64 text.
pub fn load_message(args: &MessageArgs) -> Result<SignedMessage, String> {
    if let Some(boc) = &args.boc {
        return SignedMessage::from_base64(boc).map_err(|e| e.to_string());
    }
    let Some(path) = &args.boc_file else {
        return Err("one of --boc or --boc-file is required".to_string());
    };
    let bytes = fs::read(path).map_err(|e| format!("failed to read {path}: {e}"))?;
    let decoded = if bytes.starts_with(&BOC_MAGIC) {
        SignedMessage::from_bytes(&bytes)
    } else {
        let text = String::from_utf8(bytes).map_err(|_| {
            format!("{path} is neither a raw bag of cells nor base64 text")
        })?;
        SignedMessage::from_base64(&text)
    };
    decoded.map_err(|e: TraceError| e.to_string())
}

pub fn load_message_or_exit(args: &MessageArgs) -> SignedMessage {
    load_message(args).unwrap_or_else(|e| exit_with(e))
}

pub fn overrides_from(args: &NetworkArgs) -> Overrides {
    Overrides {
        network: args.network.map(Into::into),
        endpoint: args.endpoint.clone(),
        api_key: args.api_key.clone(),
        timeout_ms: args.timeout_ms,
        state_init: args.discard_state_init.then_some(StateInitPolicy::Discard),
        ..Overrides::default()
    }
}

pub fn load_settings(config: Option<&str>, overrides: &Overrides) -> Result<Settings, String> {
    let file = ConfigFile::discover(config.map(Path::new)).map_err(|e| e.to_string())?;
    Settings::from_env(&file, overrides).map_err(|e| e.to_string())
}

pub fn load_settings_or_exit(config: Option<&str>, overrides: &Overrides) -> Settings {
    load_settings(config, overrides).unwrap_or_else(|e| exit_with(e))
}

/// The default pending-then-completed chain against toncenter.
pub fn build_resolver(settings: &Settings) -> Result<TraceStatusResolver, String> {
    let client = ToncenterClient::new(settings.client.clone()).map_err(|e| e.to_string())?;
    Ok(TraceStatusResolver::for_api(
        Arc::new(client),
        MessageHashNormalizer::new(settings.state_init),
    ))
}

pub fn build_resolver_or_exit(settings: &Settings) -> TraceStatusResolver {
    build_resolver(settings).unwrap_or_else(|e| exit_with(e))
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
