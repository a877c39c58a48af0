//! HTTP client for the toncenter v3 trace endpoints.

use async_trait::async_trait;
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use tontrace_kernel::{PendingTraceRequest, TraceApi, TraceApiError, TraceRequest, TracesResponse};
use tracing::{debug, warn};
use url::Url;

pub const PENDING_TRACES_PATH: &str = "api/v3/pendingTraces";
pub const TRACES_PATH: &str = "api/v3/traces";

const API_KEY_HEADER: &str = "X-API-Key";
const MAX_ERROR_BODY_CHARS: usize = 512;

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: Url,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`TraceApi`] over `GET {endpoint}/api/v3/pendingTraces` and
/// `GET {endpoint}/api/v3/traces`.
#[derive(Clone)]
pub struct ToncenterClient {
    http: Client,
    config: ClientConfig,
}

impl fmt::Debug for ToncenterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToncenterClient")
            .field("config", &self.config)
            .finish()
    }
}

impl ToncenterClient {
    pub fn new(config: ClientConfig) -> Result<Self, TraceApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| TraceApiError::Transport(format!("failed to build http client: {e}")))?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `path` resolved below the endpoint, keeping any endpoint path prefix.
    pub fn url(&self, path: &str) -> Result<Url, TraceApiError> {
        let mut base = self.config.endpoint.clone();
        if !base.path().ends_with('/') {
            let prefixed = format!("{}/", base.path());
            base.set_path(&prefixed);
        }
        base.join(path)
            .map_err(|e| TraceApiError::Transport(format!("invalid request url: {e}")))
    }

    async fn query_traces(
        &self,
        path: &str,
        key: &str,
        values: &[String],
    ) -> Result<TracesResponse, TraceApiError> {
        let url = self.url(path)?;
        let params: Vec<(&str, &str)> = values.iter().map(|value| (key, value.as_str())).collect();
        debug!(url = %url, key, count = values.len(), "toncenter request");

        let mut request = self
            .http
            .get(url)
            .query(&params)
            .header("accept", "application/json");
        if let Some(api_key) = &self.config.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body = truncate(&String::from_utf8_lossy(&body));
            warn!(status = status.as_u16(), path, "toncenter returned an error status");
            return Err(TraceApiError::Status {
                code: status.as_u16(),
                body,
            });
        }

        serde_json::from_slice(&body).map_err(|e| TraceApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TraceApi for ToncenterClient {
    async fn get_pending_trace(
        &self,
        request: PendingTraceRequest,
    ) -> Result<TracesResponse, TraceApiError> {
        self.query_traces(
            PENDING_TRACES_PATH,
            "ext_msg_hash",
            &request.external_message_hash,
        )
        .await
    }

    async fn get_trace(&self, request: TraceRequest) -> Result<TracesResponse, TraceApiError> {
        self.query_traces(TRACES_PATH, "trace_id", &request.trace_id)
            .await
    }
}

fn transport_error(err: reqwest::Error) -> TraceApiError {
    if err.is_timeout() {
        TraceApiError::Transport(format!("request timed out: {err}"))
    } else {
        TraceApiError::Transport(err.to_string())
    }
}

fn truncate(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        return body.to_string();
    }
    let mut out: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
    out.push('…');
    out
}
