//! HTTP endpoint and the JSON response envelope

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::config::RenderConfig;
use crate::echo::RequestEcho;
use crate::error::{Error, Result};
use crate::render::render;

/// Message reported in `info` on success
pub const SUCCESS_MESSAGE: &str = "PDF created successfully";

/// Response body wrapping the rendered document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub info: Vec<String>,
    pub errors: Vec<String>,
    /// Base64-encoded PDF, empty on failure
    pub document: String,
}

impl Envelope {
    pub fn success(document: &[u8]) -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            info: vec![SUCCESS_MESSAGE.to_string()],
            errors: Vec::new(),
            document: base64::engine::general_purpose::STANDARD.encode(document),
        }
    }

    pub fn failure(error: &Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            info: Vec::new(),
            errors: vec![error.to_string()],
            document: String::new(),
        }
    }

    /// Decode the embedded document
    pub fn decode_document(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.document)
            .map_err(|e| Error::General(format!("Invalid document encoding: {}", e)))
    }
}

/// Collect headers in arrival order as lossy UTF-8 strings
pub fn request_echo(headers: &HeaderMap, body: &[u8]) -> RequestEcho {
    let pairs = headers.iter().map(|(name, value)| {
        (
            name.as_str().to_string(),
            String::from_utf8_lossy(value.as_bytes()).into_owned(),
        )
    });
    RequestEcho::new(pairs, body.to_vec())
}

/// Render one request into an envelope
pub fn respond(config: &RenderConfig, request: &RequestEcho) -> Envelope {
    match render(config, request) {
        Ok(document) => Envelope::success(&document),
        Err(e) => Envelope::failure(&e),
    }
}

async fn echo_handler(
    State(config): State<Arc<RenderConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Envelope>) {
    let request = request_echo(&headers, &body);
    let body_len = request.body().len();

    let envelope = match tokio::task::spawn_blocking(move || respond(&config, &request)).await {
        Ok(envelope) => envelope,
        Err(e) => Envelope::failure(&Error::General(format!("Render task failed: {}", e))),
    };

    if envelope.errors.is_empty() {
        log::info!("Rendered echo document for {} byte body", body_len);
    } else {
        log::error!("Render failed: {}", envelope.errors.join("; "));
    }

    let status = StatusCode::from_u16(envelope.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(envelope))
}

/// Routes served by the endpoint
pub fn router(config: Arc<RenderConfig>) -> Router {
    Router::new()
        .route("/", post(echo_handler))
        .with_state(config)
}

/// Serve until the process is stopped
pub async fn serve(addr: SocketAddr, config: Arc<RenderConfig>) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(config)).await?;
    Ok(())
}
