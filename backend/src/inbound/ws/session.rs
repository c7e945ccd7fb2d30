//! Per-connection WebSocket handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge while the per-session
//! [`ViewportController`] owns debouncing and fetch ordering. Every change of
//! controller state is pushed to the client as a snapshot frame. The public
//! contract pings every 5s and considers a connection idle after 10s without
//! client traffic; tests shorten both intervals.

use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::watch;
use tokio::time;
use tracing::{debug, warn};

use crate::domain::{BoundingBox, Error, ViewportController, ViewportSnapshot};
use crate::inbound::http::validation::bounding_box_error;
use crate::inbound::ws::messages::{ClientMessage, ServerMessage};

/// Time between heartbeats to the client.
#[cfg(not(test))]
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client.
#[cfg(not(test))]
const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
const CLIENT_TIMEOUT: Duration = Duration::from_millis(250);

pub(super) async fn handle_ws_session(
    controller: ViewportController,
    session: Session,
    stream: MessageStream,
) {
    WsSession::new(controller).run(session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct WsSession {
    controller: ViewportController,
}

impl WsSession {
    fn new(controller: ViewportController) -> Self {
        Self { controller }
    }

    async fn run(&self, mut session: Session, mut stream: MessageStream) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);
        let mut updates = self.controller.subscribe();

        let initial = updates.borrow_and_update().clone();
        if let Err(error) = self.send_snapshot(&mut session, &initial).await {
            self.log_shutdown_reason(&SessionError::Network(error));
            return;
        }

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                changed = updates.changed() => {
                    self.handle_state_change(&mut session, &mut updates, changed.is_ok())
                        .await
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                let close_action = self.close_action_for(&error);
                self.close_session_if_needed(session, close_action).await;
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_state_change(
        &self,
        session: &mut Session,
        updates: &mut watch::Receiver<ViewportSnapshot>,
        open: bool,
    ) -> Result<(), SessionError> {
        if !open {
            // The controller lives as long as this session; a closed channel
            // means it was torn down underneath us.
            return Err(SessionError::StreamClosed);
        }
        let snapshot = updates.borrow_and_update().clone();
        self.send_snapshot(session, &snapshot)
            .await
            .map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(message) => self.handle_message(session, last_heartbeat, message).await,
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Message,
    ) -> Result<(), SessionError> {
        match message {
            Message::Ping(payload) => {
                *last_heartbeat = Instant::now();
                session
                    .pong(&payload)
                    .await
                    .map_err(SessionError::Network)?;
                Ok(())
            }
            Message::Text(text) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let request = match serde_json::from_str::<ClientMessage>(text) {
            Ok(request) => request,
            Err(error) => {
                warn!(error = %error, "Rejected malformed WebSocket payload");
                return Err(SessionError::InvalidPayload);
            }
        };

        match request {
            ClientMessage::Viewport {
                south,
                west,
                north,
                east,
            } => match BoundingBox::try_new(south, west, north, east) {
                Ok(bbox) => {
                    debug!(%bbox, "viewport changed");
                    self.controller.viewport_changed(bbox);
                    Ok(())
                }
                Err(err) => {
                    let error = bounding_box_error(&err);
                    self.send_rejection(session, &error)
                        .await
                        .map_err(SessionError::Network)
                }
            },
        }
    }

    async fn send_snapshot(
        &self,
        session: &mut Session,
        snapshot: &ViewportSnapshot,
    ) -> Result<(), Closed> {
        self.send_json(session, &ServerMessage::Snapshot(snapshot.into()))
            .await
    }

    async fn send_rejection(&self, session: &mut Session, error: &Error) -> Result<(), Closed> {
        self.send_json(session, &ServerMessage::Rejected(error)).await
    }

    async fn send_json<T: serde::Serialize>(
        &self,
        session: &mut Session,
        payload: &T,
    ) -> Result<(), Closed> {
        match serde_json::to_string(payload) {
            Ok(body) => session.text(body).await,
            Err(error) => {
                warn!(error = %error, "Failed to serialize WebSocket payload");
                Ok(())
            }
        }
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!("WebSocket heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(error = %error, "WebSocket protocol error");
            }
            SessionError::Network(error) => {
                warn!(error = %error, "WebSocket send failed; closing connection");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }

    fn close_action_for(&self, error: &SessionError) -> CloseAction {
        match error {
            SessionError::HeartbeatTimeout => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Normal,
                description: Some("heartbeat timeout".to_owned()),
            })),
            SessionError::Protocol(_) => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Protocol,
                description: Some("protocol error".to_owned()),
            })),
            SessionError::InvalidPayload => CloseAction::Close(Some(CloseReason {
                code: CloseCode::Policy,
                description: Some("invalid payload".to_owned()),
            })),
            SessionError::ClientClosed(reason) => CloseAction::Close(reason.clone()),
            SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
        }
    }

    async fn close_session_if_needed(&self, session: Session, close_action: CloseAction) {
        if let CloseAction::Close(reason) = close_action {
            if let Err(error) = session.close(reason).await {
                warn!(error = %error, "Failed to close WebSocket session");
            }
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
