use crate::integration::{connect, create_test_registry, init_tracing, room};

#[tokio::test]
async fn test_disconnect_triggers_leave() {
    init_tracing();

    let (rooms, output, _rx) = create_test_registry();
    let j1 = connect(&rooms).await;
    let j2 = connect(&rooms).await;
    rooms.join(j1, room("r1"), String::new(), "J1".into()).await.unwrap();
    rooms.join(j2, room("r1"), String::new(), "J2".into()).await.unwrap();

    // Transport reports the drop three times.
    assert!(rooms.disconnect(j2).await.unwrap());
    assert!(!rooms.disconnect(j2).await.unwrap());
    assert!(!rooms.disconnect(j2).await.unwrap());

    assert_eq!(output.user_left_count(&j1, &j2).await, 1);

    let members = rooms.members(room("r1")).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].socket_id, j1);
}

#[tokio::test]
async fn test_last_disconnect_destroys_room() {
    init_tracing();

    let (rooms, _output, _rx) = create_test_registry();
    let j1 = connect(&rooms).await;
    rooms.join(j1, room("solo"), String::new(), "J1".into()).await.unwrap();

    assert!(rooms.disconnect(j1).await.unwrap());
    assert!(rooms.members(room("solo")).await.unwrap().is_empty());

    // Joining again recreates it from scratch.
    let j2 = connect(&rooms).await;
    let snapshot = rooms.join(j2, room("solo"), String::new(), "J2".into()).await.unwrap();
    assert!(snapshot.is_empty());
}
