use crate::integration::{create_test_service, init_tracing, room};
use crate::utils::{Call, Participant, RawPeer, test_config};
use roomlink_client::media::SyntheticDevices;
use roomlink_client::{ClientConfig, FailureReason, MeshEvent};
use roomlink_core::{SignalMessage, SignalPayload};
use std::sync::Arc;
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn test_silent_peer_times_out() {
    init_tracing();
    let service = create_test_service();
    let r1 = room("r1");

    let mut silent = RawPeer::attach(&service).await;
    silent.join(&r1, "Silent").await.unwrap();

    let config = ClientConfig {
        negotiation_timeout: Some(Duration::from_secs(30)),
        ..test_config()
    };
    let devices = Arc::new(SyntheticDevices {
        audio: true,
        video: true,
    });
    let mut local = Participant::spawn_with(&service, config, devices).await;
    local.client.join(r1.clone(), "Local").await.unwrap();

    silent
        .expect(|m| {
            matches!(m, SignalMessage::Signal(env) if matches!(env.payload, SignalPayload::Offer { .. }))
        })
        .await
        .unwrap();

    // No answer ever comes; the clock runs on by itself while idle.
    let failed = tokio::time::timeout(Duration::from_secs(120), async {
        loop {
            match local.events.recv().await {
                Some(MeshEvent::PeerFailed { id, reason }) => return (id, reason),
                Some(_) => continue,
                None => panic!("engine stopped"),
            }
        }
    })
    .await
    .expect("link should have timed out");

    assert_eq!(failed, (silent.id, FailureReason::NegotiationTimeout));
    assert!(local.client.peer_links().await.unwrap().is_empty());

    let transport = local.factory.transport_for(silent.id).unwrap();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !transport.is_closed() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
    assert!(!transport.calls().iter().any(|c| matches!(c, Call::SetRemote(_))));
}

#[tokio::test(start_paused = true)]
async fn test_connected_link_outlives_the_window() {
    init_tracing();
    let service = create_test_service();
    let r1 = room("r1");

    let mut remote = RawPeer::attach(&service).await;
    remote.join(&r1, "Remote").await.unwrap();

    let config = ClientConfig {
        negotiation_timeout: Some(Duration::from_secs(30)),
        ..test_config()
    };
    let devices = Arc::new(SyntheticDevices {
        audio: true,
        video: false,
    });
    let mut local = Participant::spawn_with(&service, config, devices).await;
    local.client.join(r1.clone(), "Local").await.unwrap();
    remote.answer_offer_from(local.id).await.unwrap();
    local.expect_connected(remote.id).await.unwrap();

    tokio::time::sleep(Duration::from_secs(90)).await;

    let links = local.client.peer_links().await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].state, roomlink_client::NegotiationState::Connected);
}
