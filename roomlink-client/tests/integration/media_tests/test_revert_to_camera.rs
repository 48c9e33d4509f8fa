use crate::integration::{create_test_service, init_tracing, room};
use crate::utils::{Call, Participant, RawPeer, RecordingDevices, eventually, test_config};
use roomlink_client::{LocalTrack, MeshEvent, TrackSource, VideoSource, VideoSourceKind};
use std::sync::Arc;

#[tokio::test]
async fn test_revert_to_camera() {
    init_tracing();
    let service = create_test_service();
    let r = room("r");

    let mut remote = RawPeer::attach(&service).await;
    remote.join(&r, "Remote").await.unwrap();

    let devices = Arc::new(RecordingDevices::new(true, true));
    let mut local = Participant::spawn_with(&service, test_config(), devices.clone()).await;
    local.join(&r, "L").await.unwrap();
    remote.answer_offer_from(local.id).await.unwrap();
    local.expect_connected(remote.id).await.unwrap();

    let camera = devices.last(TrackSource::Camera).unwrap();
    let transport = local.factory.transport_for(remote.id).unwrap();
    assert_eq!(transport.video(), Some(camera.clone()));

    let screen = LocalTrack::new(TrackSource::Screen);
    local
        .client
        .substitute_video(VideoSource::Screen(screen.clone()))
        .await
        .unwrap();
    eventually(|| transport.video().as_ref() == Some(&screen))
        .await
        .unwrap();

    local.client.substitute_video(VideoSource::Camera).await.unwrap();
    local
        .expect(|e| matches!(e, MeshEvent::LocalTrackSubstituted(VideoSourceKind::Camera)))
        .await
        .unwrap();
    eventually(|| transport.video().as_ref() == Some(&camera))
        .await
        .unwrap();
    assert!(screen.is_ended());
}

#[tokio::test]
async fn test_revert_without_camera_sends_no_video() {
    init_tracing();
    let service = create_test_service();
    let r = room("r");

    let mut remote = RawPeer::attach(&service).await;
    remote.join(&r, "Remote").await.unwrap();

    let devices = Arc::new(RecordingDevices::new(true, true));
    let mut local = Participant::spawn_with(&service, test_config(), devices.clone()).await;
    local.join(&r, "L").await.unwrap();
    remote.answer_offer_from(local.id).await.unwrap();
    local.expect_connected(remote.id).await.unwrap();

    let transport = local.factory.transport_for(remote.id).unwrap();
    let screen = LocalTrack::new(TrackSource::Screen);
    local
        .client
        .substitute_video(VideoSource::Screen(screen.clone()))
        .await
        .unwrap();

    // Camera released while the screen was being shown.
    devices.last(TrackSource::Camera).unwrap().stop();

    local.client.substitute_video(VideoSource::Camera).await.unwrap();
    local
        .expect(|e| matches!(e, MeshEvent::LocalTrackSubstituted(VideoSourceKind::Camera)))
        .await
        .unwrap();

    eventually(|| transport.calls().last() == Some(&Call::ReplaceVideo(None)))
        .await
        .unwrap();
    assert_eq!(transport.video(), None);
    assert_eq!(local.client.peer_links().await.unwrap().len(), 1);
}
