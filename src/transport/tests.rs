use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::mpsc;
use tungstenite::protocol::Message as WsMessage;

use crate::broker::Broker;
use crate::broker::message::Message;
use crate::client::Client;
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::transport::websocket::dispatch;

fn broker_with_client() -> (
    Arc<Mutex<Broker>>,
    String,
    mpsc::UnboundedSender<WsMessage>,
    mpsc::UnboundedReceiver<WsMessage>,
) {
    let broker = Arc::new(Mutex::new(Broker::default()));
    let (tx, rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx.clone());
    let client_id = client.id.clone();
    broker.lock().unwrap().register_client(client);
    (broker, client_id, tx, rx)
}

fn next_frame(rx: &mut mpsc::UnboundedReceiver<WsMessage>) -> String {
    match rx.try_recv().expect("expected a frame") {
        WsMessage::Text(text) => text.to_string(),
        other => panic!("expected a text frame, got {:?}", other),
    }
}

#[test]
fn test_client_message_tags() {
    let frame: ClientMessage =
        serde_json::from_str(r#"{"type":"subscribe","topic":"releases"}"#).unwrap();
    assert!(matches!(frame, ClientMessage::Subscribe { topic } if topic == "releases"));

    // `persistent` is optional and defaults to false.
    let frame: ClientMessage = serde_json::from_str(
        r#"{"type":"publish","topic":"releases","payload":"{}","timestamp":1}"#,
    )
    .unwrap();
    match frame {
        ClientMessage::Publish { persistent, .. } => assert!(!persistent),
        other => panic!("expected publish, got {:?}", other),
    }
}

#[test]
fn test_server_message_round_trip() {
    let json = serde_json::to_string(&ServerMessage::Subscribed {
        topic: "releases".to_string(),
    })
    .unwrap();
    let back: ServerMessage = serde_json::from_str(&json).unwrap();
    assert!(matches!(back, ServerMessage::Subscribed { topic } if topic == "releases"));
}

#[test]
fn test_delivery_is_distinguishable_from_acks() {
    // A bare delivery has no `type` tag and must not parse as a ServerMessage.
    let delivery = serde_json::to_string(&Message {
        destination: "releases".to_string(),
        payload: "x".to_string(),
        timestamp: 1,
    })
    .unwrap();
    assert!(serde_json::from_str::<ServerMessage>(&delivery).is_err());
}

#[test]
fn test_dispatch_subscribe_registers_then_acks() {
    let (broker, client_id, tx, mut rx) = broker_with_client();

    let frame: ClientMessage = serde_json::from_str(
        &json!({"type": "subscribe", "topic": "releases"}).to_string(),
    )
    .unwrap();
    dispatch(frame, &broker, &client_id, &tx);

    let broker = broker.lock().unwrap();
    assert!(
        broker
            .topics
            .get("releases")
            .unwrap()
            .subscribers
            .contains(&client_id)
    );

    let ack: ServerMessage = serde_json::from_str(&next_frame(&mut rx)).unwrap();
    assert!(matches!(ack, ServerMessage::Subscribed { topic } if topic == "releases"));
}

#[test]
fn test_dispatch_publish_reaches_subscriber() {
    let (broker, client_id, tx, mut rx) = broker_with_client();

    dispatch(
        ClientMessage::Subscribe {
            topic: "releases".to_string(),
        },
        &broker,
        &client_id,
        &tx,
    );
    let _ack = next_frame(&mut rx);

    dispatch(
        ClientMessage::Publish {
            topic: "releases".to_string(),
            payload: "hello".to_string(),
            timestamp: 7,
            persistent: false,
        },
        &broker,
        &client_id,
        &tx,
    );

    let delivery: Message = serde_json::from_str(&next_frame(&mut rx)).unwrap();
    assert_eq!(delivery.destination, "releases");
    assert_eq!(delivery.payload, "hello");
}

#[test]
fn test_dispatch_receive_acks_before_delivery() {
    let (broker, client_id, tx, mut rx) = broker_with_client();

    dispatch(
        ClientMessage::Send {
            queue: "orders".to_string(),
            payload: "first".to_string(),
            timestamp: 1,
            persistent: false,
        },
        &broker,
        &client_id,
        &tx,
    );
    dispatch(
        ClientMessage::Receive {
            queue: "orders".to_string(),
        },
        &broker,
        &client_id,
        &tx,
    );

    let ack: ServerMessage = serde_json::from_str(&next_frame(&mut rx)).unwrap();
    assert!(matches!(ack, ServerMessage::Receiving { queue } if queue == "orders"));

    let delivery: Message = serde_json::from_str(&next_frame(&mut rx)).unwrap();
    assert_eq!(delivery.payload, "first");
}

#[test]
fn test_dispatch_unsubscribe_removes_subscriber() {
    let (broker, client_id, tx, mut rx) = broker_with_client();

    dispatch(
        ClientMessage::Subscribe {
            topic: "releases".to_string(),
        },
        &broker,
        &client_id,
        &tx,
    );
    let _ack = next_frame(&mut rx);

    dispatch(
        ClientMessage::Unsubscribe {
            topic: "releases".to_string(),
        },
        &broker,
        &client_id,
        &tx,
    );

    let broker = broker.lock().unwrap();
    assert!(
        !broker
            .topics
            .get("releases")
            .unwrap()
            .subscribers
            .contains(&client_id)
    );
}
