use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use roomlink_core::{
    ConnectionId, SessionDescription, SignalEnvelope, SignalMessage, SignalPayload,
};
use roomlink_server::{SignalingService, app};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::integration::{init_tracing, room};

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn start_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let service = SignalingService::new(roomlink_core::utils::default_ice_servers());
    tokio::spawn(async move {
        axum::serve(listener, app(service)).await.unwrap();
    });
    addr
}

async fn send(ws: &mut Ws, msg: SignalMessage) -> Result<()> {
    ws.send(Message::Text(msg.encode()?.into())).await?;
    Ok(())
}

async fn recv_until<F>(ws: &mut Ws, pred: F) -> Result<SignalMessage>
where
    F: Fn(&SignalMessage) -> bool,
{
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .context("Timeout waiting for frame")?
            .context("Socket closed")??;
        if let Message::Text(text) = frame {
            let msg = SignalMessage::decode(&text)?;
            if pred(&msg) {
                return Ok(msg);
            }
        }
    }
}

/// Connects and returns the socket along with the id from `welcome`.
async fn open(addr: SocketAddr) -> Result<(Ws, ConnectionId)> {
    let (mut ws, _) = connect_async(format!("ws://{addr}/ws")).await?;
    let welcome = recv_until(&mut ws, |m| matches!(m, SignalMessage::Welcome { .. })).await?;
    let SignalMessage::Welcome { connection_id } = welcome else {
        unreachable!()
    };
    let ice = recv_until(&mut ws, |m| matches!(m, SignalMessage::IceConfig { .. })).await?;
    assert!(matches!(ice, SignalMessage::IceConfig { ice_servers } if !ice_servers.is_empty()));
    Ok((ws, connection_id))
}

fn join(name: &str) -> SignalMessage {
    SignalMessage::JoinRoom {
        room_id: room("r1"),
        user_id: String::new(),
        user_name: name.into(),
    }
}

#[tokio::test]
async fn test_websocket_signaling() -> Result<()> {
    init_tracing();
    let addr = start_server().await;

    let (mut j1, j1_id) = open(addr).await?;
    send(&mut j1, join("J1")).await?;
    let snapshot = recv_until(&mut j1, |m| matches!(m, SignalMessage::ExistingUsers { .. })).await?;
    assert_eq!(snapshot, SignalMessage::ExistingUsers { users: vec![] });

    let (mut j2, j2_id) = open(addr).await?;
    send(&mut j2, join("J2")).await?;
    let snapshot = recv_until(&mut j2, |m| matches!(m, SignalMessage::ExistingUsers { .. })).await?;
    let SignalMessage::ExistingUsers { users } = snapshot else { unreachable!() };
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].socket_id, j1_id);
    assert_eq!(users[0].user_name, "J1");

    let joined = recv_until(&mut j1, |m| matches!(m, SignalMessage::UserJoined { .. })).await?;
    assert!(matches!(joined, SignalMessage::UserJoined { socket_id, .. } if socket_id == j2_id));

    // Offer from the joiner reaches the existing member with a stamped sender.
    send(
        &mut j2,
        SignalMessage::Signal(SignalEnvelope::new(
            j1_id,
            SignalPayload::Offer {
                signal: SessionDescription::offer("v=0"),
                user_name: "J2".into(),
            },
        )),
    )
    .await?;
    let offer = recv_until(&mut j1, |m| matches!(m, SignalMessage::Signal(_))).await?;
    let SignalMessage::Signal(env) = offer else { unreachable!() };
    assert_eq!(env.from, Some(j2_id));

    // Malformed frames are dropped without killing the connection.
    j2.send(Message::Text("{\"op\":\"nonsense\"}".into())).await?;

    // Abrupt close: J1 hears about it exactly once.
    drop(j2);
    let left = recv_until(&mut j1, |m| matches!(m, SignalMessage::UserLeft { .. })).await?;
    assert!(matches!(left, SignalMessage::UserLeft { socket_id, .. } if socket_id == j2_id));

    send(&mut j1, SignalMessage::LeaveRoom).await?;
    let extra = tokio::time::timeout(
        Duration::from_millis(300),
        recv_until(&mut j1, |m| matches!(m, SignalMessage::UserLeft { .. })),
    )
    .await;
    assert!(extra.is_err(), "user-left must be broadcast only once");

    Ok(())
}
