use std::fmt;

use serde::{Deserialize, Serialize};

/// The record exchanged through queues and topics: a single track descriptor.
///
/// All four fields are plain strings and none of them are validated; a wire
/// payload may omit any subset of them and still deserialize. Producers build
/// a track right before sending it, consumers rebuild it from the payload and
/// print it — the record itself never outlives one hand-off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
}

impl Track {
    pub fn new(id: &str, name: &str, artist: &str, album: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Track {{ id: '{}', name: '{}', artist: '{}', album: '{}' }}",
            self.id, self.name, self.artist, self.album
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Track;

    #[test]
    fn test_round_trip_preserves_fields() {
        let track = Track::new("42", "Paranoid Android", "Radiohead", "OK Computer");
        let json = serde_json::to_string(&track).unwrap();
        let back: Track = serde_json::from_str(&json).unwrap();
        assert_eq!(back, track);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let back: Track = serde_json::from_str(r#"{"id":"7"}"#).unwrap();
        assert_eq!(back.id, "7");
        assert!(back.name.is_empty());
        assert!(back.artist.is_empty());
        assert!(back.album.is_empty());
    }

    #[test]
    fn test_display_shows_all_fields() {
        let track = Track::new("1", "Creep", "Radiohead", "Pablo Honey");
        let printed = track.to_string();
        assert!(printed.contains("id: '1'"));
        assert!(printed.contains("name: 'Creep'"));
        assert!(printed.contains("album: 'Pablo Honey'"));
    }
}
