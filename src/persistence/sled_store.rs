use chrono::Utc;
use serde::{Deserialize, Serialize};
use sled::Db;
use tracing::error;
use uuid::Uuid;

/// A message as written to disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredMessage {
    pub destination: String,
    pub payload: String,
    pub timestamp: i64,
}

/// Sled-backed store for persistent messages.
///
/// One tree per destination; keys are zero-padded millisecond timestamps with
/// a UUID suffix, so iteration order is chronological and same-millisecond
/// writes never collide. Cloning shares the underlying database handle.
#[derive(Clone)]
pub struct Persistence {
    db: Db,
    ttl_seconds: Option<i64>,
    max_messages_per_destination: Option<usize>,
}

impl Persistence {
    pub fn new(
        path: &str,
        ttl_seconds: Option<i64>,
        max_messages_per_destination: Option<usize>,
    ) -> Self {
        let db = sled::open(path).expect("failed to open sled db");
        Self {
            db,
            ttl_seconds,
            max_messages_per_destination,
        }
    }

    /// Stores a message under its destination, stamped with the current time.
    pub fn store_message(&self, destination: &str, payload: &str) {
        self.store_message_at(destination, payload, Utc::now().timestamp_millis());
    }

    fn store_message_at(&self, destination: &str, payload: &str, timestamp: i64) {
        let msg = StoredMessage {
            destination: destination.to_string(),
            payload: payload.to_string(),
            timestamp,
        };

        let serialized = match serde_json::to_vec(&msg) {
            Ok(data) => data,
            Err(e) => {
                error!("failed to serialize stored message: {:?}", e);
                return;
            }
        };
        let tree = match self.db.open_tree(destination) {
            Ok(tree) => tree,
            Err(e) => {
                error!("failed to open tree for '{}': {}", destination, e);
                return;
            }
        };
        if let Err(e) = tree.insert(key_for(timestamp), serialized) {
            error!("failed to store message for '{}': {}", destination, e);
            return;
        }
        self.enforce_cap(&tree);
    }

    /// Loads every live message for a destination, oldest first. Expired
    /// messages are removed on the way.
    pub fn load_messages(&self, destination: &str) -> Vec<StoredMessage> {
        self.cleanup_old_messages(destination);
        let tree = match self.db.open_tree(destination) {
            Ok(tree) => tree,
            Err(e) => {
                error!("failed to open tree for '{}': {}", destination, e);
                return Vec::new();
            }
        };
        tree.iter()
            .filter_map(|res| res.ok())
            .filter_map(|(_, val)| serde_json::from_slice(&val).ok())
            .collect()
    }

    fn cleanup_old_messages(&self, destination: &str) {
        let Some(ttl) = self.ttl_seconds else { return };
        let expiry_time = Utc::now().timestamp_millis() - ttl * 1000;

        let Ok(tree) = self.db.open_tree(destination) else {
            return;
        };
        let old_keys: Vec<_> = tree
            .iter()
            .filter_map(|res| res.ok())
            .filter_map(|(key, _)| match timestamp_of(&key) {
                Some(ts) if ts < expiry_time => Some(key),
                _ => None,
            })
            .collect();

        for key in old_keys {
            let _ = tree.remove(key);
        }
    }

    fn enforce_cap(&self, tree: &sled::Tree) {
        let Some(max) = self.max_messages_per_destination else {
            return;
        };
        while tree.len() > max {
            match tree.first() {
                Ok(Some((key, _))) => {
                    let _ = tree.remove(key);
                }
                _ => break,
            }
        }
    }
}

fn key_for(timestamp: i64) -> Vec<u8> {
    format!("{:020}:{}", timestamp, Uuid::new_v4()).into_bytes()
}

fn timestamp_of(key: &sled::IVec) -> Option<i64> {
    let text = std::str::from_utf8(key).ok()?;
    text.split(':').next()?.parse().ok()
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("db", &"sled::Db")
            .finish()
    }
}
