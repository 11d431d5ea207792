//! HTTP + WebSocket API for the blaster gallery
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /state - Latest session snapshot
//! - POST /session/start - Start a round
//! - POST /session/idle - Leave GAME_OVER
//! - POST /calibrate/:player - Calibrate player 1 or 2
//! - POST /play-area - Resize the visible play area
//! - WS /ws - Live snapshot stream
//!
//! Handlers never touch the game directly: commands go to the tick loop over
//! an mpsc channel and snapshots come back over a watch channel.

use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::config::PlayAreaConfig;
use crate::core::Command;
use crate::error::SessionError;
use crate::types::{PlayerId, SessionSnapshot};

/// Shared handler state
#[derive(Debug, Clone)]
pub struct ApiState {
    snapshots: watch::Receiver<SessionSnapshot>,
    commands: mpsc::UnboundedSender<Command>,
}

impl ApiState {
    pub fn new(
        snapshots: watch::Receiver<SessionSnapshot>,
        commands: mpsc::UnboundedSender<Command>,
    ) -> Self {
        Self { snapshots, commands }
    }

    fn submit(&self, command: Command) -> Response {
        match self.commands.send(command) {
            Ok(()) => (StatusCode::ACCEPTED, Json(CommandAccepted { command })).into_response(),
            Err(_) => {
                warn!(?command, "tick loop gone, command dropped");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ErrorResponse {
                        error: "game loop not running".to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// Health response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Body of a 202 reply
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandAccepted {
    pub command: Command,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/session/start", post(start_session))
        .route("/session/idle", post(return_to_idle))
        .route("/calibrate/:player", post(calibrate))
        .route("/play-area", post(set_play_area))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn get_state(State(state): State<ApiState>) -> Json<SessionSnapshot> {
    Json(state.snapshots.borrow().clone())
}

async fn start_session(State(state): State<ApiState>) -> Response {
    state.submit(Command::Start)
}

async fn return_to_idle(State(state): State<ApiState>) -> Response {
    state.submit(Command::ReturnToIdle)
}

async fn calibrate(State(state): State<ApiState>, Path(player): Path<u8>) -> Response {
    match PlayerId::try_from(player) {
        Ok(player) => state.submit(Command::Calibrate(Some(player))),
        Err(e) => bad_request(e),
    }
}

async fn set_play_area(
    State(state): State<ApiState>,
    Json(area): Json<PlayAreaConfig>,
) -> Response {
    if !area.is_valid() {
        return bad_request(SessionError::InvalidPlayArea);
    }
    state.submit(Command::SetPlayArea(area))
}

fn bad_request(e: SessionError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
        .into_response()
}

/// WebSocket handler for live updates
async fn websocket_handler(ws: WebSocketUpgrade, State(state): State<ApiState>) -> Response {
    let rx = state.snapshots.clone();
    ws.on_upgrade(move |socket| stream_snapshots(socket, rx))
}

/// Push every published snapshot until the client goes away
async fn stream_snapshots(socket: WebSocket, mut rx: watch::Receiver<SessionSnapshot>) {
    let (mut sender, mut receiver) = socket.split();
    info!("websocket client connected");

    let send_task = tokio::spawn(async move {
        // current value first, then one message per change
        rx.mark_changed();
        while rx.changed().await.is_ok() {
            let json = match serde_json::to_string(&*rx.borrow_and_update()) {
                Ok(json) => json,
                Err(e) => {
                    warn!(error = %e, "snapshot serialization failed");
                    break;
                }
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "websocket error");
                break;
            }
        }
    }

    send_task.abort();
    info!("websocket client disconnected");
}

/// Run the API server
pub async fn run_server(addr: &str, state: ApiState) -> std::io::Result<()> {
    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API listening");
    axum::serve(listener, router).await
}
