use super::hash::HashReport;
use super::status::StatusReport;
use crate::cli::NetworkArgs;
use crate::support::{build_resolver, load_settings, overrides_from, runtime_or_exit};
use async_trait::async_trait;
use rust_mcp_sdk::{
    McpServer, StdioTransport, ToMcpServerHandler, TransportOptions,
    macros::{JsonSchema, mcp_tool},
    mcp_server::{McpServerOptions, ServerHandler, ServerRuntime, server_runtime},
    schema::{
        CallToolRequestParams, CallToolResult, Implementation, InitializeResult, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, RpcError, ServerCapabilities,
        ServerCapabilitiesTools, TextContent, schema_utils::CallToolError,
    },
    tool_box,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::process;
use std::sync::Arc;
use tontrace_kernel::{NormalizedHash, SignedMessage, StateInitPolicy, TraceStatusResolver};

const TOOL_INSTRUCTIONS: &str = "Use get_normalized_hash to derive the indexer lookup key of a signed message BOC, and get_transaction_status with the same BOC (or a known hash) to learn whether its trace is pending, completed or failed. A status of pending with zero messages means the message is not indexed yet; poll again later.";

const PRESERVE_CAVEAT: &str = "This server keeps the state-init when hashing. toncenter keys deploy messages (a wallet's first transfer, which carries a state-init) with it dropped, so their status stays pending forever here. Restart with --discard-state-init, or set state_init = \"discard\" in tontrace.toml, to track them.";

/// Initialize-time instructions; warns about deploy messages under `preserve`.
fn server_instructions(policy: StateInitPolicy) -> String {
    match policy {
        StateInitPolicy::Preserve => format!("{TOOL_INSTRUCTIONS} {PRESERVE_CAVEAT}"),
        StateInitPolicy::Discard => TOOL_INSTRUCTIONS.to_string(),
    }
}

pub struct Args {
    pub network: NetworkArgs,
    pub server_name: String,
    pub server_version: String,
}

#[derive(Clone)]
struct TontraceMcpHandler {
    resolver: Arc<TraceStatusResolver>,
}

impl fmt::Debug for TontraceMcpHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TontraceMcpHandler")
            .field("sources", &self.resolver.source_names())
            .field("state_init", &self.resolver.normalizer().state_init_policy())
            .finish()
    }
}

pub fn run(args: Args) {
    eprintln!("tontrace mcp-serve");
    eprintln!("  transport: stdio");
    eprintln!("  server: {} {}", args.server_name, args.server_version);

    let runtime = runtime_or_exit();
    runtime.block_on(async move {
        if let Err(e) = run_async(args).await {
            eprintln!("error: mcp server failed: {e}");
            process::exit(1);
        }
    });
}

async fn run_async(args: Args) -> Result<(), String> {
    let settings = load_settings(args.network.config.as_deref(), &overrides_from(&args.network))?;
    eprintln!("  network: {}", settings.network);
    eprintln!("  endpoint: {}", settings.client.endpoint);
    eprintln!("  state-init: {}", settings.state_init);

    let resolver = build_resolver(&settings)?;

    let server_details = InitializeResult {
        server_info: Implementation {
            name: args.server_name,
            version: args.server_version,
            title: Some("tontrace MCP Server".into()),
            description: Some(
                "Normalized hashing and trace status lookups for TON external messages".into(),
            ),
            icons: vec![],
            website_url: Some("https://github.com/tontrace/tontrace".into()),
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        protocol_version: ProtocolVersion::V2025_11_25.into(),
        instructions: Some(server_instructions(settings.state_init)),
        meta: None,
    };

    let transport = StdioTransport::new(TransportOptions::default()).map_err(|e| e.to_string())?;
    let handler = TontraceMcpHandler {
        resolver: Arc::new(resolver),
    };

    let server: Arc<ServerRuntime> = server_runtime::create_server(McpServerOptions {
        server_details,
        transport,
        handler: handler.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    server.start().await.map_err(|e| {
        e.rpc_error_message()
            .cloned()
            .unwrap_or_else(|| e.to_string())
    })
}

#[async_trait]
impl ServerHandler for TontraceMcpHandler {
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: TontraceTools::tools(),
        })
    }

    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> std::result::Result<CallToolResult, CallToolError> {
        let tool_params: TontraceTools =
            TontraceTools::try_from(params).map_err(CallToolError::new)?;

        match tool_params {
            TontraceTools::GetTransactionStatusTool(tool) => {
                call_get_transaction_status(&self.resolver, tool).await
            }
            TontraceTools::GetNormalizedHashTool(tool) => {
                call_get_normalized_hash(&self.resolver, tool)
            }
        }
    }
}

#[mcp_tool(
    name = "get_transaction_status",
    description = "Resolve the trace status (pending, completed or failed) of a signed external message",
    read_only_hint = true
)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
struct GetTransactionStatusTool {
    /// Base64 bag of cells holding the signed message
    #[serde(default)]
    boc: Option<String>,
    /// Normalized hash (base64 or hex) when the BOC is not at hand
    #[serde(default)]
    hash: Option<String>,
}

#[mcp_tool(
    name = "get_normalized_hash",
    description = "Compute the normalized lookup hash of a signed external message",
    read_only_hint = true
)]
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
struct GetNormalizedHashTool {
    /// Base64 bag of cells holding the signed message
    boc: String,
}

tool_box!(
    TontraceTools,
    [GetTransactionStatusTool, GetNormalizedHashTool]
);

async fn call_get_transaction_status(
    resolver: &TraceStatusResolver,
    tool: GetTransactionStatusTool,
) -> std::result::Result<CallToolResult, CallToolError> {
    let hash = match (tool.boc.as_deref(), tool.hash.as_deref()) {
        (Some(boc), None) => {
            let message = SignedMessage::from_base64(boc).map_err(call_tool_error)?;
            resolver
                .normalizer()
                .lookup_hash(&message)
                .map_err(call_tool_error)?
        }
        (None, Some(hash)) => hash.parse::<NormalizedHash>().map_err(call_tool_error)?,
        (Some(_), Some(_)) => return Err(call_tool_error("pass either boc or hash, not both")),
        (None, None) => return Err(call_tool_error("one of boc or hash is required")),
    };

    let report = StatusReport::resolve(resolver, hash)
        .await
        .map_err(call_tool_error)?;
    json_result(&report)
}

fn call_get_normalized_hash(
    resolver: &TraceStatusResolver,
    tool: GetNormalizedHashTool,
) -> std::result::Result<CallToolResult, CallToolError> {
    let message = SignedMessage::from_base64(&tool.boc).map_err(call_tool_error)?;
    let report = HashReport::build(resolver.normalizer(), &message).map_err(call_tool_error)?;
    json_result(&report)
}

fn json_result<T: Serialize>(value: &T) -> std::result::Result<CallToolResult, CallToolError> {
    let text = serde_json::to_string_pretty(value).map_err(CallToolError::new)?;
    Ok(CallToolResult::text_content(vec![TextContent::from(text)]))
}

fn call_tool_error(message: impl ToString) -> CallToolError {
    CallToolError::from_message(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::Value;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tontrace_kernel::{
        MessageHashNormalizer, PendingTraceRequest, TraceApi, TraceApiError, TraceRequest,
        TracesResponse,
    };

    struct CannedApi {
        pending: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TraceApi for CannedApi {
        async fn get_pending_trace(
            &self,
            _request: PendingTraceRequest,
        ) -> Result<TracesResponse, TraceApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            serde_json::from_str(self.pending).map_err(|e| TraceApiError::Decode(e.to_string()))
        }

        async fn get_trace(&self, _request: TraceRequest) -> Result<TracesResponse, TraceApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TracesResponse::default())
        }
    }

    fn resolver_with(pending: &'static str) -> (TraceStatusResolver, Arc<CannedApi>) {
        let api = Arc::new(CannedApi {
            pending,
            calls: AtomicUsize::new(0),
        });
        let resolver = TraceStatusResolver::for_api(api.clone(), MessageHashNormalizer::default());
        (resolver, api)
    }

    // A wallet v4 transfer as broadcast, and the same transfer after a relay
    // set `src`, charged an import fee and moved the body behind a reference.
    const WALLET_TRANSFER_BOC: &str = "te6cckEBAgEAtgAB4YgA43Cvzn8qKikPLAxMk+qJWiDCKrfh1EQCJqb9DJSVwrQEXGS6ZxtGkB8/UhZ7v/czwY6gS819oGV4OYl38z5MFVr5DPZXkSFB3XyGL/jEGZBmKTvQjrJ6eV69VAL/zqz9kU1NGLsqn5rAAAAAOAAcAQCAYgBN7z6JSUlJm5GywlCTzusJDaBobTldZtaUCwy8to17z6AvrwgAAAAAAAAAAAAAAAAAAAAAAAB0b250cmFjZdeX9Ks=";
    const RELAYED_TRANSFER_BOC: &str = "te6cckEBAwEAvwABUZCF93wAcbhX5z+VFRSHlgYmSfVErRBhFVvw6iIBE1N+hkpK4Vow9CQGAQGci4yXTONo0gPn6kLPd/7meDHUCXmvtAyvBzEu/mfJgqtfIZ7K8iQoO6+Qxf8YgzIMxSd6EdZPTyvXqoBf+dWfsimpoxdlU/NYAAAABwADAgCAYgBN7z6JSUlJm5GywlCTzusJDaBobTldZtaUCwy8to17z6AvrwgAAAAAAAAAAAAAAAAAAAAAAAB0b250cmFjZeCk0Jg=";
    const TRANSFER_NORMALIZED_HASH: &str = "i1AlCVE0bmV/d9Qd6oemd+XJz0VaPHhNXZMI0SOT5Ks=";

    fn parse_tool_json(result: CallToolResult) -> Value {
        let text = result
            .content
            .first()
            .expect("result should contain content")
            .as_text_content()
            .expect("content should be text")
            .text
            .clone();
        serde_json::from_str(&text).expect("tool response should be valid json")
    }

    #[test]
    fn normalized_hash_tool_ignores_import_fee() {
        let (resolver, api) = resolver_with(r#"{"traces":[]}"#);
        let first = parse_tool_json(
            call_get_normalized_hash(
                &resolver,
                GetNormalizedHashTool {
                    boc: WALLET_TRANSFER_BOC.into(),
                },
            )
            .expect("hash"),
        );
        let second = parse_tool_json(
            call_get_normalized_hash(
                &resolver,
                GetNormalizedHashTool {
                    boc: RELAYED_TRANSFER_BOC.into(),
                },
            )
            .expect("hash"),
        );

        assert_eq!(first["kind"], "external-in");
        assert_eq!(first["normalized"], true);
        assert_eq!(first["hash"], TRANSFER_NORMALIZED_HASH);
        assert_eq!(second["hash"], TRANSFER_NORMALIZED_HASH);
        assert_ne!(first["rawHash"], second["rawHash"]);
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn status_tool_reports_pending_trace() {
        let (resolver, api) = resolver_with(
            r#"{"traces":[{"trace_info":{"trace_state":"pending","messages":5,"pending_messages":2},"actions":[{"type":"jetton_swap","success":true}]}]}"#,
        );
        let payload = parse_tool_json(
            call_get_transaction_status(
                &resolver,
                GetTransactionStatusTool {
                    boc: Some(WALLET_TRANSFER_BOC.into()),
                    hash: None,
                },
            )
            .await
            .expect("status"),
        );

        assert_eq!(payload["status"], "pending");
        assert_eq!(payload["source"], "pending");
        assert_eq!(payload["completedMessages"], 3);
        assert_eq!(payload["actions"][0]["type"], "jetton_swap");
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn status_tool_accepts_hash_and_reports_not_found() {
        let (resolver, api) = resolver_with(r#"{"traces":[]}"#);
        let payload = parse_tool_json(
            call_get_transaction_status(
                &resolver,
                GetTransactionStatusTool {
                    boc: None,
                    hash: Some("00".repeat(32)),
                },
            )
            .await
            .expect("status"),
        );

        assert_eq!(payload["status"], "pending");
        assert_eq!(payload["source"], Value::Null);
        assert_eq!(payload["totalMessages"], 0);
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn status_tool_rejects_bad_arguments_before_querying() {
        let (resolver, api) = resolver_with(r#"{"traces":[]}"#);

        for tool in [
            GetTransactionStatusTool::default(),
            GetTransactionStatusTool {
                boc: Some("%%%".into()),
                hash: None,
            },
            GetTransactionStatusTool {
                boc: None,
                hash: Some("not-a-hash".into()),
            },
            GetTransactionStatusTool {
                boc: Some(WALLET_TRANSFER_BOC.into()),
                hash: Some("00".repeat(32)),
            },
        ] {
            assert!(call_get_transaction_status(&resolver, tool).await.is_err());
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn instructions_warn_about_deploy_messages_under_preserve() {
        let preserve = server_instructions(StateInitPolicy::Preserve);
        assert!(preserve.starts_with(TOOL_INSTRUCTIONS));
        assert!(preserve.contains("stays pending forever"));
        assert!(preserve.contains("--discard-state-init"));

        assert_eq!(
            server_instructions(StateInitPolicy::Discard),
            TOOL_INSTRUCTIONS
        );
    }
}
