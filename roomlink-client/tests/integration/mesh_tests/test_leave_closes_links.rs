use crate::integration::{create_test_service, init_tracing, room};
use crate::utils::{Participant, eventually};
use roomlink_client::MeshEvent;
use std::collections::HashSet;

#[tokio::test]
async fn test_leave_closes_links() {
    init_tracing();
    let service = create_test_service();
    let r = room("r");

    let mut a = Participant::spawn(&service).await;
    a.join(&r, "A").await.unwrap();
    let mut b = Participant::spawn(&service).await;
    b.join(&r, "B").await.unwrap();
    let mut c = Participant::spawn(&service).await;
    c.join(&r, "C").await.unwrap();
    c.expect_connected(a.id).await.unwrap();

    c.client.leave().await.unwrap();

    let mut left = HashSet::new();
    while left.len() < 2 {
        if let MeshEvent::PeerLeft { id } = c
            .expect(|e| matches!(e, MeshEvent::PeerLeft { .. }))
            .await
            .unwrap()
        {
            left.insert(id);
        }
    }
    assert_eq!(left, HashSet::from([a.id, b.id]));
    assert!(c.client.peer_links().await.unwrap().is_empty());

    a.expect(|e| matches!(e, MeshEvent::PeerLeft { id } if *id == c.id))
        .await
        .unwrap();
    b.expect(|e| matches!(e, MeshEvent::PeerLeft { id } if *id == c.id))
        .await
        .unwrap();

    let factory = c.factory.clone();
    eventually(|| factory.transports().iter().all(|t| t.is_closed()))
        .await
        .unwrap();

    // Leaving twice is harmless.
    c.client.leave().await.unwrap();
    assert_eq!(
        service.rooms().members(r.clone()).await.unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_rejoin_moves_rooms() {
    init_tracing();
    let service = create_test_service();

    let mut a = Participant::spawn(&service).await;
    a.join(&room("first"), "A").await.unwrap();
    let mut b = Participant::spawn(&service).await;
    b.join(&room("first"), "B").await.unwrap();
    b.expect_connected(a.id).await.unwrap();

    b.join(&room("second"), "B").await.unwrap();

    a.expect(|e| matches!(e, MeshEvent::PeerLeft { id } if *id == b.id))
        .await
        .unwrap();
    assert!(b.client.peer_links().await.unwrap().is_empty());
    assert_eq!(service.rooms().members(room("first")).await.unwrap().len(), 1);
    assert_eq!(service.rooms().members(room("second")).await.unwrap().len(), 1);
}
