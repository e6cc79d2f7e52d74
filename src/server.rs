//! UI log server module
//!
//! HTTP server that accepts log messages submitted by UI clients and
//! writes them to the daily log file at the `Mandatory` level.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{post, put},
    Json, Router,
};
use tokio::sync::oneshot;
use tracing::{debug, error, info};

use crate::logging::{panic_message, LogLevel, LogWriter};

/// Header carrying the submitting user's id
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the submitting user's session id
pub const SESSION_ID_HEADER: &str = "x-session-id";

/// Shared state for the UI log handlers
#[derive(Clone)]
pub struct UiLogState {
    writer: Arc<LogWriter>,
    enabled: bool,
}

impl UiLogState {
    /// `enabled == false` accepts messages but writes nothing
    pub fn new(writer: Arc<LogWriter>, enabled: bool) -> Self {
        Self { writer, enabled }
    }
}

/// Handle to control the running server
pub struct ServerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    addr: SocketAddr,
}

impl ServerHandle {
    /// Get the address the server is listening on
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Shutdown the server gracefully
    pub fn shutdown(mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }
        Ok(())
    }
}

/// Routes for the UI log endpoints
pub fn router(state: UiLogState) -> Router {
    Router::new()
        .route("/uilog", post(ui_log_handler))
        .route("/uilog/level", put(set_level_handler).get(get_level_handler))
        .with_state(state)
}

/// Start the UI log server
///
/// # Arguments
/// * `addr` - Address to listen on; port 0 picks a free port
/// * `state` - Writer and enablement shared with the handlers
///
/// # Returns
/// A `ServerHandle` that can be used to shut down the server
pub async fn start(addr: SocketAddr, state: UiLogState) -> Result<ServerHandle> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    info!("UI log server listening on {}", bound_addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
                info!("UI log server shutting down");
            })
            .await
            .ok();
    });

    Ok(ServerHandle {
        shutdown_tx: Some(shutdown_tx),
        addr: bound_addr,
    })
}

fn header_or<'a>(headers: &'a HeaderMap, name: &str, default: &'a str) -> &'a str {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// Decode a JSON string body
///
/// Malformed JSON is a 400; well-formed JSON that isn't a string is a 422.
fn decode_message(body: &[u8]) -> Result<String, StatusCode> {
    serde_json::from_slice::<String>(body).map_err(|e| {
        debug!("Rejected UI log body: {}", e);
        if e.is_data() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_REQUEST
        }
    })
}

/// POST /uilog handler
///
/// Body is a JSON string, decoded only when UI logging is enabled. The write
/// runs on the blocking pool; a failed or panicking write becomes a 500
/// instead of taking the server down.
async fn ui_log_handler(
    State(state): State<UiLogState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if !state.enabled {
        return StatusCode::OK;
    }

    let message = match decode_message(&body) {
        Ok(message) => message,
        Err(status) => return status,
    };

    let user = header_or(&headers, USER_ID_HEADER, "anonymous").to_string();
    let session = header_or(&headers, SESSION_ID_HEADER, "-").to_string();
    debug!(user = %user, session = %session, "Received UI log message");

    let writer = Arc::clone(&state.writer);
    let written = tokio::task::spawn_blocking(move || {
        writer.try_log(
            LogLevel::Mandatory,
            format_args!("User ({}), Session ({}): {}", user, session, message),
        )
    })
    .await;

    match written {
        Ok(Ok(())) => StatusCode::OK,
        Ok(Err(e)) => {
            error!("Failed to write UI log message: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e) if e.is_panic() => {
            let payload = e.into_panic();
            error!(
                "UI log write panicked: {}",
                panic_message(payload.as_ref()).unwrap_or("unknown panic")
            );
            StatusCode::INTERNAL_SERVER_ERROR
        }
        Err(e) => {
            error!("UI log write task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// PUT /uilog/level handler
///
/// Body is a JSON string level name; unknown names select ERROR.
async fn set_level_handler(
    State(state): State<UiLogState>,
    Json(name): Json<String>,
) -> StatusCode {
    state.writer.set_level(&name);
    info!("UI log level set to {}", state.writer.level());
    StatusCode::NO_CONTENT
}

/// GET /uilog/level handler
async fn get_level_handler(State(state): State<UiLogState>) -> Json<&'static str> {
    Json(state.writer.level().as_str())
}
