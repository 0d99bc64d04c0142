use crate::catalog::Track;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-profile, per-mood durable collection of tracks, distinct from the
/// transient remote queue. `genres` is a snapshot of the owning profile's
/// favorite genres at creation or last update time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Uuid,
    pub mood: String,
    pub profile_id: Uuid,
    pub songs: Vec<Track>,
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub genres: Vec<String>,
}

impl Playlist {
    pub fn new(mood: String, profile_id: Uuid, songs: Vec<Track>, genres: Vec<String>) -> Self {
        Playlist {
            id: Uuid::new_v4(),
            mood,
            profile_id,
            songs,
            date_created: Utc::now(),
            genres,
        }
    }
}
