use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_tungstenite::accept_async;
use tracing::{error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use std::sync::{Arc, Mutex};

use crate::broker::{Broker, message::Message};
use crate::client::Client;
use crate::config::Settings;
use crate::transport::message::{ClientMessage, ServerMessage};

/// Accepts WebSocket connections and speaks the broker protocol with each
/// one. Every connection becomes one broker client; connections beyond
/// `broker.max_connections` are refused before the handshake.
pub async fn start_websocket_server(addr: String, broker: Arc<Mutex<Broker>>, settings: Settings) {
    let listener = TcpListener::bind(&addr).await.expect("can't bind");

    info!("broker listening on ws://{}", addr);

    while let Ok((stream, _)) = listener.accept().await {
        {
            let broker = broker.lock().unwrap();
            if broker.client_count() >= settings.broker.max_connections {
                warn!("connection limit reached, refusing new client");
                continue;
            }
        }

        let broker = broker.clone();
        tokio::spawn(async move {
            handle_connection(stream, broker).await;
        });
    }
}

async fn handle_connection(stream: TcpStream, broker: Arc<Mutex<Broker>>) {
    let ws_stream = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("websocket handshake error: {}", e);
            return;
        }
    };

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    // Channel the broker pushes frames for this client into.
    let (tx, mut rx) = mpsc::unbounded_channel::<WsMessage>();
    let client = Client::new(tx.clone());
    let client_id = client.id.clone();

    {
        let mut broker = broker.lock().unwrap();
        broker.register_client(client);
    }

    // Drain broker -> client.
    let writer_id = client_id.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = ws_sender.send(msg).await {
                warn!("failed to send to {}: {}", writer_id, e);
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        if !msg.is_text() {
            continue;
        }
        let Ok(text) = msg.to_text() else { continue };
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(frame) => dispatch(frame, &broker, &client_id, &tx),
            Err(err) => {
                warn!("invalid frame from {}: {}", client_id, err);
                reply(
                    &tx,
                    &ServerMessage::Error {
                        message: format!("invalid frame: {}", err),
                    },
                );
            }
        }
    }

    info!("{} disconnected", client_id);

    let mut broker = broker.lock().unwrap();
    broker.cleanup_client(&client_id);
}

pub(crate) fn dispatch(
    frame: ClientMessage,
    broker: &Arc<Mutex<Broker>>,
    client_id: &str,
    tx: &UnboundedSender<WsMessage>,
) {
    match frame {
        ClientMessage::Subscribe { topic } => {
            {
                let mut broker = broker.lock().unwrap();
                broker.subscribe(&topic, client_id.to_string());
                // Acked under the lock: no broadcast can land between the
                // registration and the ack.
                reply(
                    tx,
                    &ServerMessage::Subscribed {
                        topic: topic.clone(),
                    },
                );
            }
            info!("{} subscribed to {}", client_id, topic);
        }

        ClientMessage::Unsubscribe { topic } => {
            let mut broker = broker.lock().unwrap();
            broker.unsubscribe(&topic, &client_id.to_string());
            info!("{} unsubscribed from {}", client_id, topic);
        }

        ClientMessage::Publish {
            topic,
            payload,
            timestamp,
            persistent,
        } => {
            let mut broker = broker.lock().unwrap();
            broker.publish(
                Message {
                    destination: topic.clone(),
                    payload,
                    timestamp,
                },
                persistent,
            );
            info!("{} published to {}", client_id, topic);
        }

        ClientMessage::Send {
            queue,
            payload,
            timestamp,
            persistent,
        } => {
            let mut broker = broker.lock().unwrap();
            broker.send(
                Message {
                    destination: queue.clone(),
                    payload,
                    timestamp,
                },
                persistent,
            );
            info!("{} sent to queue {}", client_id, queue);
        }

        ClientMessage::Receive { queue } => {
            // The ack always precedes any delivery on the wire.
            reply(
                tx,
                &ServerMessage::Receiving {
                    queue: queue.clone(),
                },
            );
            let mut broker = broker.lock().unwrap();
            broker.receive(&queue, client_id.to_string());
            info!("{} receiving from queue {}", client_id, queue);
        }
    }
}

fn reply(tx: &UnboundedSender<WsMessage>, msg: &ServerMessage) {
    match serde_json::to_string(msg) {
        Ok(json) => {
            let _ = tx.send(WsMessage::text(json));
        }
        Err(e) => error!("failed to serialize server frame: {:?}", e),
    }
}
