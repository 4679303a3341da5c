//! End-to-end messaging workflows against mock collaborators.

mod support;

use assert_matches::assert_matches;
use murmur_app::workflows;
use murmur_app::{AppError, ErrorCategory, TransportCommand, UploadError, ViewDelta};
use murmur_chat::ConversationKey;
use murmur_core::UserId;
use murmur_testkit::{init_test_tracing, participant, rooms_event, users_event, RecordBuilder};
use support::{shared_session, MemoryUploader, RecordingTransport};

#[tokio::test]
async fn test_connect_joins_default_room() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();

    let key = workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();

    assert_eq!(key, Some(ConversationKey::default_room()));
    assert_eq!(transport.sent_names(), vec!["joinRoom"]);
    assert!(session.lock().activation().is_settled());
}

#[tokio::test]
async fn test_failed_join_is_retried_on_next_activation() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::failing_on("joinRoom");

    let err = workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Network);
    assert!(!session.lock().activation().is_settled());

    transport.heal();
    workflows::activate_conversation(&session, &transport, &ConversationKey::default_room())
        .await
        .unwrap();
    assert_eq!(transport.sent_names(), vec!["joinRoom"]);
    assert!(session.lock().activation().is_settled());
}

#[tokio::test]
async fn test_inbound_message_in_open_room_is_acknowledged() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    transport.clear();

    let delta = workflows::handle_event(
        &session,
        &transport,
        RecordBuilder::text("m1", "u2", "hello").event(),
    )
    .await
    .unwrap();

    assert_matches!(delta, ViewDelta::MessageAdded { unread: 0, .. });
    assert_eq!(
        transport.sent(),
        vec![TransportCommand::SendReadReceipt {
            message_id: "m1".into()
        }]
    );
}

#[tokio::test]
async fn test_switching_rooms_moves_unread_and_receipts() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    workflows::handle_event(&session, &transport, rooms_event(&["General", "Random", "dm_u1___u2"]))
        .await
        .unwrap();
    workflows::handle_event(
        &session,
        &transport,
        RecordBuilder::text("m1", "u2", "over here").in_room("Random").event(),
    )
    .await
    .unwrap();
    transport.clear();

    let random = ConversationKey::room("Random").unwrap();
    {
        let sidebar = session.lock().sidebar();
        let names: Vec<&str> = sidebar.rooms.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(names, vec!["General", "Random"]);
        assert_eq!(sidebar.rooms[1].unread, 1);
    }

    let activation = workflows::activate_conversation(&session, &transport, &random)
        .await
        .unwrap();
    assert_eq!(activation.label, "Random");
    assert_eq!(transport.sent_names(), vec!["joinRoom", "readReceipt"]);
    assert_eq!(session.lock().unread().get(&random), 0);
}

#[tokio::test]
async fn test_send_text_routes_and_reconciles() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    workflows::handle_event(
        &session,
        &transport,
        users_event(vec![
            participant("u1", "Ann", true),
            participant("u2", "Bob", false),
        ]),
    )
    .await
    .unwrap();

    let dm = session.lock().sidebar().direct[0].key.clone();
    let activation = workflows::activate_conversation(&session, &transport, &dm)
        .await
        .unwrap();
    assert_eq!(activation.label, "Bob");
    transport.clear();

    assert!(!workflows::send_text(&session, &transport, "  ").await.unwrap());
    assert!(workflows::send_text(&session, &transport, " hey Bob ").await.unwrap());

    let temp_id = assert_matches!(
        transport.sent().as_slice(),
        [TransportCommand::SendPrivateMessage { to, text, temp_id }]
            if to.as_str() == "u2" && text == "hey Bob" => temp_id.clone()
    );

    let echo = RecordBuilder::text("m7", "u1", "hey Bob")
        .direct_to("u2")
        .with_temp_id(temp_id.as_str())
        .event();
    let delta = workflows::handle_event(&session, &transport, echo)
        .await
        .unwrap();
    assert_matches!(delta, ViewDelta::MessageMerged { .. });

    let view = session.lock().view().unwrap();
    assert_eq!(view.label, "Bob");
    assert_eq!(view.len(), 1);
    assert_eq!(view.messages[0].render_key, "m7");
}

#[tokio::test]
async fn test_send_file_uploads_then_shares() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    let uploader = MemoryUploader::succeeding("https://files.test/cat.png");
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    transport.clear();

    let key = workflows::send_file(&session, &transport, &uploader, vec![1, 2, 3], "cat.png")
        .await
        .unwrap();

    assert_eq!(key, ConversationKey::default_room());
    assert_eq!(uploader.uploads(), vec![("cat.png".to_string(), 3)]);
    let descriptor = assert_matches!(
        transport.sent().as_slice(),
        [TransportCommand::SendFile(descriptor)] => descriptor.clone()
    );
    assert!(!descriptor.is_private);
    assert_eq!(descriptor.room.as_deref(), Some("General"));
    assert_eq!(descriptor.url, "https://files.test/cat.png");

    let view = session.lock().view().unwrap();
    assert_eq!(view.len(), 1);
    assert!(view.messages[0].is_image);
}

#[tokio::test]
async fn test_failed_upload_sends_and_logs_nothing() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    let uploader = MemoryUploader::failing(UploadError::Rejected { status: 500 });
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    transport.clear();

    let err = workflows::send_file(&session, &transport, &uploader, vec![0; 8], "big.bin")
        .await
        .unwrap_err();

    assert_matches!(err, AppError::Upload(UploadError::Rejected { status: 500 }));
    assert!(transport.sent().is_empty());
    assert!(session.lock().log().is_empty());
}

#[tokio::test]
async fn test_reaction_round_trip() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();
    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    workflows::handle_event(&session, &transport, RecordBuilder::text("m1", "u2", "nice").event())
        .await
        .unwrap();
    transport.clear();

    workflows::toggle_reaction(&session, &transport, "m1", "🔥")
        .await
        .unwrap();
    assert_eq!(transport.sent_names(), vec!["reaction"]);

    let toggle = murmur_chat::ChatEvent::ReactionToggle(murmur_chat::ReactionToggle {
        message_id: "m1".into(),
        emoji: "🔥".into(),
        user_id: UserId::from("u1"),
    });
    workflows::handle_event(&session, &transport, toggle)
        .await
        .unwrap();

    let view = session.lock().view().unwrap();
    assert_eq!(view.messages[0].reactions, vec![("🔥".to_string(), 1)]);
}

#[tokio::test]
async fn test_typing_without_conversation_is_noop() {
    init_test_tracing();
    let session = shared_session();
    let transport = RecordingTransport::new();

    workflows::set_typing(&session, &transport, true)
        .await
        .unwrap();
    assert!(transport.sent().is_empty());

    workflows::connect(&session, &transport, UserId::from("u1"))
        .await
        .unwrap();
    transport.clear();
    workflows::set_typing(&session, &transport, true)
        .await
        .unwrap();
    assert_eq!(transport.sent_names(), vec!["typing"]);
}
