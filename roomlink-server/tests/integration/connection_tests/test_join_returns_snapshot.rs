use roomlink_core::{MemberInfo, SignalMessage};

use crate::integration::{connect, create_test_registry, init_tracing, room};

#[tokio::test]
async fn test_join_returns_snapshot() {
    init_tracing();

    let (rooms, output, _rx) = create_test_registry();
    let j1 = connect(&rooms).await;
    let j2 = connect(&rooms).await;

    let snapshot = rooms
        .join(j1, room("r1"), "u1".into(), "J1".into())
        .await
        .expect("J1 join");
    assert!(snapshot.is_empty());

    let snapshot = rooms
        .join(j2, room("r1"), "u2".into(), "J2".into())
        .await
        .expect("J2 join");
    assert_eq!(
        snapshot,
        vec![MemberInfo {
            socket_id: j1,
            user_name: "J1".into()
        }]
    );

    let to_j1 = output.messages_for(&j1).await;
    assert!(to_j1.iter().any(|m| matches!(
        m,
        SignalMessage::UserJoined { socket_id, user_name, user_id }
            if *socket_id == j2 && user_name == "J2" && user_id == "u2"
    )));

    let to_j2 = output.messages_for(&j2).await;
    assert_eq!(
        to_j2,
        vec![SignalMessage::ExistingUsers {
            users: snapshot.clone()
        }]
    );
    assert!(
        !to_j2.iter().any(|m| matches!(m, SignalMessage::UserJoined { .. })),
        "a joiner must not be told about itself"
    );
}

#[tokio::test]
async fn test_join_from_unregistered_connection_fails() {
    init_tracing();

    let (rooms, output, _rx) = create_test_registry();
    let ghost = roomlink_core::ConnectionId::new();

    let result = rooms.join(ghost, room("r1"), String::new(), "G".into()).await;
    assert!(result.is_err());
    assert_eq!(output.total().await, 0);
}
