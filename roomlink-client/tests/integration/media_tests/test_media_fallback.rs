use crate::integration::{create_test_service, init_tracing, room};
use crate::utils::{Participant, RawPeer, eventually, test_config};
use roomlink_client::media::SyntheticDevices;
use roomlink_client::{MediaMode, MeshEvent};
use std::sync::Arc;

#[tokio::test]
async fn test_missing_camera_degrades_to_audio_only() {
    init_tracing();
    let service = create_test_service();
    let r = room("r");

    let mut remote = RawPeer::attach(&service).await;
    remote.join(&r, "Remote").await.unwrap();

    let devices = Arc::new(SyntheticDevices {
        audio: true,
        video: false,
    });
    let mut local = Participant::spawn_with(&service, test_config(), devices).await;
    local.client.join(r.clone(), "L").await.unwrap();

    local
        .expect(|e| matches!(e, MeshEvent::MediaDegraded(MediaMode::AudioOnly)))
        .await
        .unwrap();

    // Degraded, but the join itself went through.
    remote.answer_offer_from(local.id).await.unwrap();
    local.expect_connected(remote.id).await.unwrap();
    assert_eq!(local.factory.transport_for(remote.id).unwrap().video(), None);
}

#[tokio::test]
async fn test_no_devices_join_receive_only() {
    init_tracing();
    let service = create_test_service();
    let r = room("r");

    let devices = Arc::new(SyntheticDevices {
        audio: false,
        video: false,
    });
    let mut listener = Participant::spawn_with(&service, test_config(), devices).await;
    listener.client.join(r.clone(), "Listener").await.unwrap();
    listener
        .expect(|e| matches!(e, MeshEvent::MediaDegraded(MediaMode::ReceiveOnly)))
        .await
        .unwrap();
    listener
        .expect(|e| matches!(e, MeshEvent::Joined { .. }))
        .await
        .unwrap();

    let mut speaker = Participant::spawn(&service).await;
    speaker.join(&r, "Speaker").await.unwrap();
    listener.expect_connected(speaker.id).await.unwrap();

    let factory = listener.factory.clone();
    let peer = speaker.id;
    eventually(|| factory.transport_for(peer).is_some())
        .await
        .unwrap();
    assert_eq!(listener.factory.transport_for(speaker.id).unwrap().video(), None);
}
