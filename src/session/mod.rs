//! Client-side session against a running broker.
//!
//! A [`Session`] owns one WebSocket connection, the way the demo workloads
//! use the broker: open a session, perform a single operation, close it
//! again. Nothing is pooled or shared between sessions, and a session never
//! retries — failures bubble up to the caller.

use chrono::Utc;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::message::Message;
use crate::track::Track;
use crate::transport::message::{ClientMessage, ServerMessage};
use crate::utils::error::MessagingError;

pub struct Session {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl Session {
    /// Connects to the broker at `url`, e.g. `ws://127.0.0.1:8080`.
    pub async fn connect(url: &str) -> Result<Self, MessagingError> {
        let (ws, _) = connect_async(url).await?;
        Ok(Self { ws })
    }

    /// Subscribes to a topic and waits until the broker confirms the
    /// subscription is registered. Once this returns, a publish to the topic
    /// is guaranteed to reach this session.
    pub async fn subscribe(&mut self, topic: &str) -> Result<(), MessagingError> {
        self.send_frame(&ClientMessage::Subscribe {
            topic: topic.to_string(),
        })
        .await?;
        loop {
            let text = self.next_text().await?;
            match serde_json::from_str::<ServerMessage>(&text) {
                Ok(ServerMessage::Subscribed { topic: acked }) if acked == topic => {
                    return Ok(());
                }
                Ok(ServerMessage::Error { message }) => {
                    return Err(MessagingError::Broker(message));
                }
                _ => continue,
            }
        }
    }

    /// Unsubscribes from a topic. The broker sends no acknowledgment for
    /// unsubscribes.
    pub async fn unsubscribe(&mut self, topic: &str) -> Result<(), MessagingError> {
        self.send_frame(&ClientMessage::Unsubscribe {
            topic: topic.to_string(),
        })
        .await
    }

    /// Publishes a track to a topic. Fire-and-forget: the broker sends no
    /// acknowledgment for publishes.
    pub async fn publish(
        &mut self,
        topic: &str,
        track: &Track,
        persistent: bool,
    ) -> Result<(), MessagingError> {
        let payload = serde_json::to_string(track)?;
        self.send_frame(&ClientMessage::Publish {
            topic: topic.to_string(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
            persistent,
        })
        .await
    }

    /// Posts a track to a queue for exactly one consumer.
    pub async fn send(
        &mut self,
        queue: &str,
        track: &Track,
        persistent: bool,
    ) -> Result<(), MessagingError> {
        let payload = serde_json::to_string(track)?;
        self.send_frame(&ClientMessage::Send {
            queue: queue.to_string(),
            payload,
            timestamp: Utc::now().timestamp_millis(),
            persistent,
        })
        .await
    }

    /// Pulls exactly one message from a queue. Blocks until the broker hands
    /// one over; there is no timeout. Returns `None` when the payload does
    /// not decode as a [`Track`] — the message is consumed either way.
    pub async fn receive(&mut self, queue: &str) -> Result<Option<Track>, MessagingError> {
        self.send_frame(&ClientMessage::Receive {
            queue: queue.to_string(),
        })
        .await?;
        self.next_delivery().await
    }

    /// Waits for the next message broadcast on any topic this session is
    /// subscribed to. Same decode rule as [`Session::receive`].
    pub async fn next_track(&mut self) -> Result<Option<Track>, MessagingError> {
        self.next_delivery().await
    }

    pub async fn close(mut self) -> Result<(), MessagingError> {
        self.ws.close(None).await?;
        Ok(())
    }

    async fn send_frame(&mut self, frame: &ClientMessage) -> Result<(), MessagingError> {
        let json = serde_json::to_string(frame)?;
        self.ws.send(WsMessage::text(json)).await?;
        Ok(())
    }

    async fn next_text(&mut self) -> Result<String, MessagingError> {
        loop {
            match self.ws.next().await {
                Some(Ok(msg)) if msg.is_text() => return Ok(msg.to_text()?.to_string()),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => return Err(MessagingError::ConnectionClosed),
            }
        }
    }

    async fn next_delivery(&mut self) -> Result<Option<Track>, MessagingError> {
        loop {
            let text = self.next_text().await?;
            // Acks share the socket with deliveries; skip them, surface
            // errors.
            if let Ok(server_msg) = serde_json::from_str::<ServerMessage>(&text) {
                if let ServerMessage::Error { message } = server_msg {
                    return Err(MessagingError::Broker(message));
                }
                continue;
            }
            let msg: Message = serde_json::from_str(&text)?;
            return Ok(serde_json::from_str::<Track>(&msg.payload).ok());
        }
    }
}
