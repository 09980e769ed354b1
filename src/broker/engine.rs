use std::collections::HashMap;

use tracing::{debug, error, info, warn};
use tungstenite::protocol::Message as WsMessage;

use crate::broker::message::Message;
use crate::broker::queue::Queue;
use crate::broker::topic::{SubscriberId, Topic};
use crate::client::Client;
use crate::persistence::sled_store::Persistence;

/// The in-memory routing core.
///
/// Holds every known topic, queue and connected client. Topics broadcast to
/// all currently subscribed clients; queues hand each message to exactly one
/// consumer. The broker owns no sockets itself: delivering a message means
/// pushing a frame down the per-client channel the transport layer registered.
#[derive(Debug, Default)]
pub struct Broker {
    pub(crate) topics: HashMap<String, Topic>,
    pub(crate) queues: HashMap<String, Queue>,
    pub(crate) clients: HashMap<SubscriberId, Client>,
    store: Option<Persistence>,
}

impl Broker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a broker that writes persistent messages to `store`.
    pub fn new_with_persistence(store: Persistence) -> Self {
        Self {
            store: Some(store),
            ..Self::default()
        }
    }

    pub fn register_client(&mut self, client: Client) {
        self.clients.insert(client.id.clone(), client);
    }

    pub fn remove_client(&mut self, client_id: &SubscriberId) {
        self.clients.remove(client_id);
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    /// Subscribes a client to a topic, creating the topic on first use.
    pub fn subscribe(&mut self, topic: &str, subscriber: SubscriberId) {
        let topic = self
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| Topic::new(topic));
        topic.subscribe(subscriber);
    }

    /// Unsubscribes a client from a topic. Unknown topics are ignored.
    pub fn unsubscribe(&mut self, topic: &str, subscriber: &SubscriberId) {
        if let Some(t) = self.topics.get_mut(topic) {
            t.unsubscribe(subscriber);
        }
    }

    /// Broadcasts a message to every client currently subscribed to its
    /// destination. Clients that subscribe later never see it. With
    /// `persistent` set, the message is also written to the store.
    pub fn publish(&mut self, msg: Message, persistent: bool) {
        if persistent {
            self.store_message(&msg);
        }
        let Some(topic) = self.topics.get(&msg.destination) else {
            debug!("no subscribers registered for topic '{}'", msg.destination);
            return;
        };
        let Some(frame) = encode(&msg) else {
            return;
        };
        for sub_id in &topic.subscribers {
            match self.clients.get(sub_id) {
                Some(client) => {
                    if let Err(e) = client.sender.send(frame.clone()) {
                        warn!("failed to deliver to {}: {}", sub_id, e);
                    }
                }
                None => warn!("no client registered with id {}", sub_id),
            }
        }
    }

    /// Queue hand-off: delivers the message to the first live waiting
    /// consumer, or parks it until one asks. With `persistent` set, the
    /// message is also written to the store.
    pub fn send(&mut self, msg: Message, persistent: bool) {
        if persistent {
            self.store_message(&msg);
        }
        let Some(frame) = encode(&msg) else {
            return;
        };
        let queue = self
            .queues
            .entry(msg.destination.clone())
            .or_insert_with(|| Queue::new(&msg.destination));
        while let Some(receiver_id) = queue.waiting.pop_front() {
            let Some(client) = self.clients.get(&receiver_id) else {
                warn!(
                    "dropping stale receiver {} on queue '{}'",
                    receiver_id, msg.destination
                );
                continue;
            };
            match client.sender.send(frame.clone()) {
                Ok(()) => {
                    info!("handed queued message to {}", receiver_id);
                    return;
                }
                Err(e) => warn!("failed to deliver to {}: {}", receiver_id, e),
            }
        }
        queue.push_pending(msg);
    }

    /// Blocking receive: delivers a pending message right away if one exists,
    /// otherwise parks the consumer until the next send. There is no timeout;
    /// a parked consumer stays parked until a message arrives or it
    /// disconnects.
    pub fn receive(&mut self, queue_name: &str, subscriber: SubscriberId) {
        let queue = self
            .queues
            .entry(queue_name.to_string())
            .or_insert_with(|| Queue::new(queue_name));
        if let Some(msg) = queue.pending.pop_front() {
            let Some(frame) = encode(&msg) else {
                return;
            };
            match self.clients.get(&subscriber) {
                Some(client) => {
                    if let Err(e) = client.sender.send(frame) {
                        warn!("failed to deliver to {}: {}", subscriber, e);
                    }
                }
                None => warn!("no client registered with id {}", subscriber),
            }
        } else {
            queue.push_waiting(subscriber);
        }
    }

    /// Removes a client and clears every reference the routing tables hold
    /// to it.
    pub fn cleanup_client(&mut self, client_id: &SubscriberId) {
        self.remove_client(client_id);

        for topic in self.topics.values_mut() {
            topic.unsubscribe(client_id);
        }
        for queue in self.queues.values_mut() {
            queue.remove_waiting(client_id);
        }

        info!("cleaned up client {}", client_id);
    }

    fn store_message(&self, msg: &Message) {
        if let Some(store) = &self.store {
            store.store_message(&msg.destination, &msg.payload);
        }
    }
}

fn encode(msg: &Message) -> Option<WsMessage> {
    match serde_json::to_string(msg) {
        Ok(json) => Some(WsMessage::text(json)),
        Err(e) => {
            error!("failed to serialize message: {:?}", e);
            None
        }
    }
}
