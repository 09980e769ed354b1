use std::collections::HashSet;

pub type SubscriberId = String;

/// A broadcast destination.
///
/// A topic only knows the set of currently subscribed clients. A message
/// published to it reaches every member of that set and nobody else; there is
/// no history, so a client that subscribes after a publish never sees it.
#[derive(Debug, Default)]
pub struct Topic {
    pub name: String,
    pub subscribers: HashSet<SubscriberId>,
}

impl Topic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Adds a subscriber. Subscribing twice has no effect.
    pub fn subscribe(&mut self, id: SubscriberId) {
        self.subscribers.insert(id);
    }

    /// Removes a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: &SubscriberId) {
        self.subscribers.remove(id);
    }
}
