use crate::SignalingService;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use roomlink_core::{ConnectionId, SignalMessage};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    let connection_id = ConnectionId::new();

    ws.on_upgrade(move |socket| handle_socket(socket, connection_id, service))
}

async fn handle_socket(socket: WebSocket, connection_id: ConnectionId, service: SignalingService) {
    info!("New WebSocket connection: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<SignalMessage>();

    if let Err(e) = service.connect(connection_id, tx).await {
        error!("Could not register {}: {}", connection_id, e);
        return;
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match msg.encode() {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize signal message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match SignalMessage::decode(&text) {
                        Ok(signal) => {
                            if let Err(e) = service.handle_message(connection_id, signal).await {
                                error!("Room registry unavailable: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid SignalMessage from {}: {}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    service.disconnect(connection_id).await;
    info!("WebSocket disconnected: {}", connection_id);
}
