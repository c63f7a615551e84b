//! HTTP client for the sandbox service API.
//!
//! Thin request/response boundary: all provisioning, execution, storage, and
//! LSP semantics live on the remote side. Methods are grouped by concern in
//! the submodules; everything hangs off [`SandboxClient`].

pub mod fs;
pub mod lsp;
pub mod proc;
pub mod sandbox;
pub mod snapshot;
pub mod types;
pub mod volume;

pub use lsp::LspServer;
pub use snapshot::Image;

use futures::StreamExt;
use reqwest::{Method, RequestBuilder, Response};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::config::Settings;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// True for a remote 404, used by get-or-create flows.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Api { status: 404, .. })
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

/// Error body shape the service uses for non-2xx responses.
#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Clone, Debug)]
pub struct SandboxClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    target: Option<String>,
}

impl SandboxClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        if settings.api_key.is_empty() {
            return Err(ApiError::Config("API key is empty".to_string()));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("sandcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            target: settings.target.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut rb = self.http.request(method, url).bearer_auth(&self.api_key);
        if let Some(target) = &self.target {
            rb = rb.header("X-Sandbox-Target", target);
        }
        rb
    }

    /// Send a request and map non-2xx responses into `ApiError::Api`.
    pub(crate) async fn execute(&self, rb: RequestBuilder) -> Result<Response> {
        let resp = rb.send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.message)
            .unwrap_or(text);
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.execute(self.request(Method::GET, path)).await?;
        Ok(resp.json().await?)
    }
}

/// Push-based stream of text chunks from a long-lived log response.
///
/// The remote side terminates the stream when the command completes. The
/// consumer can end it early via [`LogChunkStream::stop`]; dropping the
/// stream has the same effect.
pub struct LogChunkStream {
    chunks: mpsc::UnboundedReceiver<String>,
    stop: Option<oneshot::Sender<()>>,
}

impl LogChunkStream {
    /// Next chunk, or `None` once the remote command completed or the
    /// stream was stopped.
    pub async fn next_chunk(&mut self) -> Option<String> {
        self.chunks.recv().await
    }

    /// Signal the forwarding task to stop reading the response body.
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop.take() {
            let _ = tx.send(());
        }
    }

    /// Drain the stream to completion, concatenating all chunks.
    pub async fn collect_all(mut self) -> String {
        let mut out = String::new();
        while let Some(chunk) = self.next_chunk().await {
            out.push_str(&chunk);
        }
        out
    }
}

/// Forward a chunked response body into a channel until the body ends, the
/// receiver is dropped, or the stop signal fires.
pub(crate) fn spawn_chunk_forwarder(resp: Response) -> LogChunkStream {
    let (tx, rx) = mpsc::unbounded_channel();
    let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let mut body = resp.bytes_stream();
        loop {
            tokio::select! {
                _ = &mut stop_rx => break,
                next = body.next() => match next {
                    Some(Ok(bytes)) => {
                        let text = String::from_utf8_lossy(&bytes).into_owned();
                        if tx.send(text).is_err() {
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!("log stream error: {e}");
                        break;
                    }
                    None => break,
                },
            }
        }
    });

    LogChunkStream {
        chunks: rx,
        stop: Some(stop_tx),
    }
}
