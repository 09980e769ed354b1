use std::collections::VecDeque;

use super::message::Message;
use super::topic::SubscriberId;

/// A point-to-point destination.
///
/// Unlike a topic, a queue never broadcasts: each message is handed to at
/// most one consumer. Messages that arrive while nobody is asking are parked
/// in `pending`; consumers that ask while nothing is pending are parked in
/// `waiting`. Both sides drain in FIFO order.
#[derive(Debug, Default)]
pub struct Queue {
    pub name: String,
    pub pending: VecDeque<Message>,
    pub waiting: VecDeque<SubscriberId>,
}

impl Queue {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pending: VecDeque::new(),
            waiting: VecDeque::new(),
        }
    }

    /// Parks a message until a consumer asks for one.
    pub fn push_pending(&mut self, msg: Message) {
        self.pending.push_back(msg);
    }

    /// Parks a consumer until a message arrives.
    pub fn push_waiting(&mut self, id: SubscriberId) {
        self.waiting.push_back(id);
    }

    /// Drops a parked consumer, e.g. when its connection goes away.
    pub fn remove_waiting(&mut self, id: &SubscriberId) {
        self.waiting.retain(|w| w != id);
    }
}
