use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A playable item as surfaced by the catalog.
///
/// `id` is generated locally and stable for the lifetime of the value;
/// `uri` is the catalog provider's opaque identifier. Two tracks with the
/// same uri are the same track no matter when they were constructed, so
/// equality is defined on uri alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub uri: String,
    #[serde(default)]
    pub is_favorited: bool,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        album: impl Into<String>,
        artist: impl Into<String>,
        uri: impl Into<String>,
    ) -> Self {
        Track {
            id: Uuid::new_v4(),
            title: title.into(),
            album: album.into(),
            artist: artist.into(),
            uri: uri.into(),
            is_favorited: false,
        }
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.uri == other.uri
    }
}

impl Eq for Track {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_defined_by_uri() {
        let a = Track::new("Title A", "Album A", "Artist A", "catalog:track:1");
        let b = Track::new("Title B", "Album B", "Artist B", "catalog:track:1");
        let c = Track::new("Title A", "Album A", "Artist A", "catalog:track:2");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn favoriting_does_not_affect_identity() {
        let a = Track::new("Title", "Album", "Artist", "catalog:track:1");
        let mut b = a.clone();
        b.is_favorited = true;

        assert_eq!(a, b);
    }

    #[test]
    fn serde_round_trips_all_fields() {
        let mut track = Track::new("Title", "Album", "Artist", "catalog:track:1");
        track.is_favorited = true;

        let json = serde_json::to_string(&track).unwrap();
        let decoded: Track = serde_json::from_str(&json).unwrap();

        assert_eq!(decoded.id, track.id);
        assert_eq!(decoded.title, "Title");
        assert!(decoded.is_favorited);
    }
}
