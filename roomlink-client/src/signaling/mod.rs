use crate::MeshError;
use futures::{SinkExt, StreamExt};
use roomlink_core::SignalMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

/// Both directions of a connection to the signaling server, as queues of
/// decoded messages. The channel is gone once `inbound` yields `None`.
pub struct SignalingChannel {
    pub outbound: mpsc::UnboundedSender<SignalMessage>,
    pub inbound: mpsc::UnboundedReceiver<SignalMessage>,
}

impl SignalingChannel {
    pub fn new(
        outbound: mpsc::UnboundedSender<SignalMessage>,
        inbound: mpsc::UnboundedReceiver<SignalMessage>,
    ) -> Self {
        Self { outbound, inbound }
    }
}

/// Opens a WebSocket to `url` and pumps it through a [`SignalingChannel`].
pub async fn connect(url: &str) -> Result<SignalingChannel, MeshError> {
    let (ws, _) = connect_async(url).await?;
    info!("Connected to signaling server at {}", url);

    let (mut ws_tx, mut ws_rx) = ws.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (in_tx, in_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let text = match msg.encode() {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to encode '{}': {}", msg.op(), e);
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
        debug!("Signaling writer finished");
    });

    tokio::spawn(async move {
        while let Some(Ok(frame)) = ws_rx.next().await {
            match frame {
                Message::Text(text) => match SignalMessage::decode(text.as_str()) {
                    Ok(msg) => {
                        if in_tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("Invalid message from server: {}", e),
                },
                Message::Close(_) => break,
                _ => {}
            }
        }
        info!("Signaling connection closed");
    });

    Ok(SignalingChannel::new(out_tx, in_rx))
}
