use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    dto::ws::{ViewerInboundMessage, ViewerOutboundMessage},
    error::ServiceError,
    services::control_service,
    state::{SharedState, Subscription},
};

/// Internal error type for viewer command handling.
///
/// Kept apart from `ServiceError` so a dead writer can end the connection
/// while a stopped scoring loop only gets logged.
#[derive(Debug, Error)]
enum ViewerError {
    /// Writer channel closed - connection should be terminated immediately.
    #[error("connection closed")]
    ConnectionClosed,
    /// Message could not be understood.
    #[error("unsupported viewer message")]
    Unsupported,
    /// Error from the scoring loop.
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
}

/// Handle the full lifecycle for an individual viewer WebSocket connection.
pub async fn handle_socket(state: SharedState, socket: WebSocket) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<Message>();

    // Dedicated writer task keeps outbound messages flowing even while we await inbound frames.
    let writer_task = tokio::spawn(async move {
        while let Some(message) = outbound_rx.recv().await {
            if sender.send(message).await.is_err() {
                break;
            }
        }
    });

    let viewer_id = state.register_viewer(outbound_tx.clone());
    info!(id = %viewer_id, viewers = state.viewer_count(), "viewer connected");

    let forwarder = spawn_state_forwarder(state.broadcaster().subscribe(), outbound_tx.clone());

    while let Some(message) = receiver.next().await {
        match message {
            Ok(Message::Text(text)) => {
                debug!(id = %viewer_id, payload = %text, "received viewer message");
                if let Err(err) = handle_text(&state, &text, &outbound_tx) {
                    warn!(id = %viewer_id, error = %err, "error while handling viewer message");
                    if matches!(err, ViewerError::ConnectionClosed) {
                        break;
                    }
                }
            }
            Ok(Message::Ping(payload)) => {
                let _ = outbound_tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(frame)) => {
                info!(id = %viewer_id, "viewer closed");
                let _ = outbound_tx.send(Message::Close(frame));
                break;
            }
            Ok(Message::Binary(_)) => {}
            Ok(Message::Pong(_)) => {}
            Err(err) => {
                warn!(id = %viewer_id, error = %err, "websocket error");
                break;
            }
        }
    }

    forwarder.abort();
    state.unregister_viewer(&viewer_id);
    info!(id = %viewer_id, "viewer disconnected");

    finalize(writer_task, outbound_tx).await;
}

/// Push every committed snapshot to the viewer, starting with the current one.
fn spawn_state_forwarder(
    mut subscription: Subscription,
    tx: mpsc::UnboundedSender<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(published) = subscription.next().await {
            let message = ViewerOutboundMessage::GameState {
                state: published.view.as_ref(),
            };
            if send_message_to_websocket(&tx, &message).is_err() {
                break;
            }
        }
    })
}

fn handle_text(
    state: &SharedState,
    text: &str,
    outbound_tx: &mpsc::UnboundedSender<Message>,
) -> Result<(), ViewerError> {
    let message = serde_json::from_str::<ViewerInboundMessage>(text)
        .map_err(|_| ViewerError::Unsupported)?;

    match message {
        ViewerInboundMessage::ButtonPress { button } => {
            control_service::virtual_tap(state, button)?
        }
        ViewerInboundMessage::ButtonHold { button } => {
            control_service::virtual_hold(state, button)?
        }
        ViewerInboundMessage::ResetRequest => control_service::virtual_reset(state)?,
        ViewerInboundMessage::DebugRequest => send_message_to_websocket(
            outbound_tx,
            &ViewerOutboundMessage::DebugResponse {
                debug: state.config().debug(),
            },
        )?,
        ViewerInboundMessage::Unknown => return Err(ViewerError::Unsupported),
    }
    Ok(())
}

/// Serialize a payload and push it onto the provided WebSocket sender.
///
/// Serialization failures are logged and swallowed; only a closed writer is
/// reported back.
fn send_message_to_websocket<T>(
    tx: &mpsc::UnboundedSender<Message>,
    value: &T,
) -> Result<(), ViewerError>
where
    T: ?Sized + serde::Serialize + std::fmt::Debug,
{
    let payload = match serde_json::to_string(value) {
        Ok(p) => p,
        Err(err) => {
            warn!(error = %err, "failed to serialize message `{value:?}`");
            return Ok(());
        }
    };

    tx.send(Message::Text(payload.into()))
        .map_err(|_| ViewerError::ConnectionClosed)
}

/// Ensure the writer task winds down before we return from the socket handler.
async fn finalize(writer_task: JoinHandle<()>, outbound_tx: mpsc::UnboundedSender<Message>) {
    drop(outbound_tx);
    let _ = writer_task.await;
}
