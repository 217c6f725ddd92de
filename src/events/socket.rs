use axum::{
    extract::{
        Extension,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::PollError;
use crate::events::models::{ClientEvent, ServerEvent};
use crate::service::PollService;
use crate::store::Poll;

pub async fn poll_events_ws(
    ws: WebSocketUpgrade,
    Extension(service): Extension<PollService>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: PollService) {
    let connection_id = Uuid::new_v4();
    let (snapshot, mut rx) = service.subscribe().await;
    info!(%connection_id, observers = service.observer_count(), "Observer connected");

    let (mut sender, mut receiver) = socket.split();

    if sender
        .send(Message::Text(ServerEvent::CurrentPolls(snapshot).to_json()))
        .await
        .is_err()
    {
        info!(%connection_id, "Observer disconnected before catch-up");
        return;
    }

    let send_service = service.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let event = match rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%connection_id, skipped, "Observer lagged, resending snapshot");
                    let (snapshot, fresh) = send_service.subscribe().await;
                    rx = fresh;
                    ServerEvent::CurrentPolls(snapshot)
                }
                Err(RecvError::Closed) => break,
            };

            if sender.send(Message::Text(event.to_json())).await.is_err() {
                break;
            }
        }
    });

    let recv_service = service.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            match message {
                Message::Text(text) => {
                    // The socket path never answers the sender, failures are only logged.
                    if let Err(e) = apply_client_message(&recv_service, &text).await {
                        debug!(%connection_id, error = %e, "Dropped observer event");
                    }
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(%connection_id, "Observer disconnected");
}

/// Parses one inbound frame and applies it through the shared poll service.
pub async fn apply_client_message(service: &PollService, text: &str) -> Result<Poll, PollError> {
    let event: ClientEvent =
        serde_json::from_str(text).map_err(|e| PollError::InvalidRequest(e.to_string()))?;

    match event {
        ClientEvent::Vote(vote) => service.cast_vote(&vote.poll_id, vote.option_id).await,
        ClientEvent::CreatePoll(new_poll) => service.create_poll(new_poll).await,
    }
}
