//! Web channel: the WebSocket + REST surface the browser widget talks to.
//!
//! Exposes `GET /health` and `GET /ws/chat`. Every WebSocket connection
//! gets its own session; frames are JSON objects tagged with `type`.

use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::{
        State,
        ws::{Message as WsFrame, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use crate::channels::channel::Channel;
use crate::error::ChannelError;
use crate::resources::{EmergencyContact, OnlineResource};
use crate::session::{AgentStatus, ChatService, ChatSession, Message, TurnOutcome};

// ── JSON Protocol ───────────────────────────────────────────────────────

/// Frame from widget client → server.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientFrame {
    /// Consent decision from the consent banner.
    Consent { terms: bool, privacy: bool },
    /// A chat message from the input field.
    Message { content: String },
}

/// Frame from server → widget client.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ServerFrame {
    /// Full history snapshot, sent once on connect.
    SessionSync { messages: Vec<Message> },
    /// Current consent gate state.
    ConsentState { accepted: bool },
    /// Agent presence indicator (drives the typing animation).
    Status { state: AgentStatus },
    /// An agent message bubble.
    Message { message: Message },
    /// Crisis surface payload, presented instead of a categorized reply.
    Crisis {
        notice: String,
        contacts: Vec<EmergencyContact>,
        resources: Vec<OnlineResource>,
    },
    /// A rejected frame or submission.
    Error { message: String },
}

/// Application state shared across handlers.
#[derive(Clone)]
struct WebState {
    service: Arc<ChatService>,
}

// ── WebChannel ──────────────────────────────────────────────────────────

/// Axum-based surface for the browser widget.
pub struct WebChannel {
    bind_addr: SocketAddr,
}

impl WebChannel {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Build the Axum router. Separate from `run` so tests can serve it
    /// on an ephemeral port.
    pub fn router(service: Arc<ChatService>) -> Router {
        Router::new()
            .route("/health", get(health))
            .route("/ws/chat", get(ws_chat_handler))
            // The widget is embedded on arbitrary pages.
            .layer(CorsLayer::permissive())
            .with_state(WebState { service })
    }
}

#[async_trait]
impl Channel for WebChannel {
    fn name(&self) -> &str {
        "web"
    }

    async fn run(&self, service: Arc<ChatService>) -> Result<(), ChannelError> {
        let app = Self::router(service);
        let listener = tokio::net::TcpListener::bind(self.bind_addr)
            .await
            .map_err(|e| ChannelError::StartupFailed {
                name: "web".to_string(),
                reason: e.to_string(),
            })?;
        info!(addr = %self.bind_addr, "Web channel listening");
        axum::serve(listener, app).await.map_err(ChannelError::Io)?;
        Ok(())
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "btl-chat"
    }))
}

async fn ws_chat_handler(ws: WebSocketUpgrade, State(state): State<WebState>) -> impl IntoResponse {
    info!("Widget client connecting");
    ws.on_upgrade(|socket| handle_socket(socket, state.service))
}

async fn handle_socket(mut socket: WebSocket, service: Arc<ChatService>) {
    let mut session = service.open_session();

    // Initial snapshot: the seeded greeting plus the closed consent gate.
    let sync = ServerFrame::SessionSync {
        messages: session.state().history().to_vec(),
    };
    if send_frame(&mut socket, &sync).await.is_err() {
        warn!("Failed to send initial sync, client disconnected");
        return;
    }
    let _ = send_frame(&mut socket, &ServerFrame::ConsentState { accepted: false }).await;

    loop {
        match socket.recv().await {
            Some(Ok(WsFrame::Text(text))) => {
                if handle_client_frame(&text, &mut socket, &mut session).await.is_err() {
                    debug!("Client disconnected during send");
                    break;
                }
            }
            Some(Ok(WsFrame::Ping(data))) => {
                if socket.send(WsFrame::Pong(data)).await.is_err() {
                    break;
                }
            }
            Some(Ok(WsFrame::Close(_))) | None => {
                info!("Widget client disconnected");
                break;
            }
            Some(Err(e)) => {
                warn!(error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }
}

/// Handle one client frame. `Err` means the socket is gone.
async fn handle_client_frame(
    text: &str,
    socket: &mut WebSocket,
    session: &mut ChatSession,
) -> Result<(), axum::Error> {
    let frame = match serde_json::from_str::<ClientFrame>(text) {
        Ok(frame) => frame,
        Err(e) => {
            warn!(error = %e, "Invalid client frame");
            return send_frame(
                socket,
                &ServerFrame::Error {
                    message: "invalid frame".to_string(),
                },
            )
            .await;
        }
    };

    match frame {
        ClientFrame::Consent { terms, privacy } => {
            let accepted = session.set_consent(terms, privacy);
            send_frame(socket, &ServerFrame::ConsentState { accepted }).await
        }
        ClientFrame::Message { content } => {
            send_frame(
                socket,
                &ServerFrame::Status {
                    state: AgentStatus::Processing,
                },
            )
            .await?;

            match session.submit(&content).await {
                Ok(TurnOutcome::Reply(message)) => {
                    send_frame(socket, &ServerFrame::Message { message }).await?;
                }
                Ok(TurnOutcome::Crisis { notice, directory }) => {
                    send_frame(
                        socket,
                        &ServerFrame::Crisis {
                            notice,
                            contacts: directory.contacts.clone(),
                            resources: directory.online.clone(),
                        },
                    )
                    .await?;
                }
                Err(e) => {
                    send_frame(
                        socket,
                        &ServerFrame::Error {
                            message: e.to_string(),
                        },
                    )
                    .await?;
                }
            }

            // Final status lets the client settle its typing indicator.
            send_frame(
                socket,
                &ServerFrame::Status {
                    state: session.state().status(),
                },
            )
            .await
        }
    }
}

async fn send_frame(socket: &mut WebSocket, frame: &ServerFrame) -> Result<(), axum::Error> {
    if let Ok(json) = serde_json::to_string(frame) {
        socket.send(WsFrame::Text(json.into())).await?;
    }
    Ok(())
}
