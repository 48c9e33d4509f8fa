use crate::integration::{connect, create_test_registry, init_tracing, room};
use roomlink_server::RegistryError;

#[tokio::test]
async fn test_unreachable_member_is_dropped() {
    init_tracing();

    let (rooms, output, _rx) = create_test_registry();
    let j1 = connect(&rooms).await;
    let j2 = connect(&rooms).await;
    let j3 = connect(&rooms).await;
    for (id, name) in [(j1, "J1"), (j2, "J2"), (j3, "J3")] {
        rooms.join(id, room("r1"), String::new(), name.into()).await.unwrap();
    }

    // J2's writer died but its disconnect has not been processed yet.
    output.set_offline(j2).await;
    rooms.chat(j3, "hello".into(), "J3".into()).await.unwrap();

    let members = rooms.members(room("r1")).await.unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.socket_id != j2));
    assert_eq!(output.user_left_count(&j1, &j2).await, 1);
    assert_eq!(output.user_left_count(&j3, &j2).await, 1);

    // A newcomer never hears of J2.
    let j4 = connect(&rooms).await;
    let snapshot = rooms.join(j4, room("r1"), String::new(), "J4".into()).await.unwrap();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|m| m.socket_id != j2));

    assert_eq!(
        rooms
            .join(j2, room("r1"), String::new(), "J2".into())
            .await
            .unwrap_err(),
        RegistryError::Unreachable(j2)
    );

    // The late disconnect still tears the session down, without a second notice.
    assert!(rooms.disconnect(j2).await.unwrap());
    assert_eq!(output.user_left_count(&j1, &j2).await, 1);
    assert_eq!(output.user_left_count(&j4, &j2).await, 0);
}
