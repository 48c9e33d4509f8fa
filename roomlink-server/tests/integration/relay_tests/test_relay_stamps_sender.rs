use roomlink_core::{ConnectionId, SessionDescription, SignalEnvelope, SignalMessage, SignalPayload};
use roomlink_server::SignalingService;

use crate::integration::{connect_to_service, init_tracing};
use crate::utils::wait_for;

#[tokio::test]
async fn test_relay_stamps_sender() {
    init_tracing();

    let service = SignalingService::new(vec![]);
    let (alice, _alice_rx) = connect_to_service(&service).await;
    let (bob, mut bob_rx) = connect_to_service(&service).await;

    let mut envelope = SignalEnvelope::new(
        bob,
        SignalPayload::Offer {
            signal: SessionDescription::offer("v=0 alice"),
            user_name: "Alice".into(),
        },
    );
    // A spoofed sender must be overwritten.
    envelope.from = Some(ConnectionId::new());

    service
        .handle_message(alice, SignalMessage::Signal(envelope.clone()))
        .await
        .unwrap();

    let received = wait_for(&mut bob_rx, |m| matches!(m, SignalMessage::Signal(_)))
        .await
        .expect("bob receives the offer");
    let SignalMessage::Signal(received) = received else {
        unreachable!()
    };

    assert_eq!(received.from, Some(alice));
    assert_eq!(received.to, bob);
    assert_eq!(received.payload, envelope.payload);
}

#[tokio::test]
async fn test_relay_needs_no_shared_room() {
    init_tracing();

    // The relay routes on `to` alone; room membership is not consulted.
    let service = SignalingService::new(vec![]);
    let (alice, _alice_rx) = connect_to_service(&service).await;
    let (bob, mut bob_rx) = connect_to_service(&service).await;

    let candidate = SignalEnvelope::new(
        bob,
        SignalPayload::IceCandidate {
            signal: roomlink_core::IceCandidate {
                candidate: "candidate:0 1 udp 1 127.0.0.1 9 typ host".into(),
                sdp_mid: Some("0".into()),
                sdp_m_line_index: Some(0),
                username_fragment: None,
            },
        },
    );
    assert!(service.relay(alice, candidate));

    let msg = wait_for(&mut bob_rx, |m| matches!(m, SignalMessage::Signal(_)))
        .await
        .unwrap();
    assert_eq!(msg.op(), "signal");
}
