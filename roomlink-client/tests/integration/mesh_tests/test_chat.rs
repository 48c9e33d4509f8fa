use crate::integration::{create_test_service, init_tracing, room};
use crate::utils::Participant;
use roomlink_client::{MeshError, MeshEvent};

#[tokio::test]
async fn test_chat() {
    init_tracing();
    let service = create_test_service();
    let r = room("chat");

    let mut a = Participant::spawn(&service).await;
    assert!(matches!(
        a.client.send_chat("too early").await,
        Err(MeshError::NotJoined)
    ));

    a.join(&r, "A").await.unwrap();
    let mut b = Participant::spawn(&service).await;
    b.join(&r, "B").await.unwrap();

    a.client.send_chat("hello").await.unwrap();

    let event = b
        .expect(|e| matches!(e, MeshEvent::ChatMessage { .. }))
        .await
        .unwrap();
    let MeshEvent::ChatMessage {
        user_name,
        message,
        time,
    } = event
    else {
        unreachable!()
    };
    assert_eq!(user_name, "A");
    assert_eq!(message, "hello");
    assert_eq!(time.len(), 5);
    assert_eq!(&time[2..3], ":");
}
