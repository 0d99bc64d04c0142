use super::Playlist;
use crate::catalog::Track;
use crate::mood::canonical_mood;
use crate::profile::Profile;
use crate::storage::KeyValueStore;
use chrono::Utc;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const SAVED_PLAYLISTS_KEY: &str = "saved_playlists";

/// Durable per-profile, per-mood playlists with favorite-promotion
/// ordering. The whole collection is persisted as one JSON snapshot on
/// every mutation; a corrupt or missing snapshot loads as an empty
/// collection rather than failing startup.
pub struct PlaylistStore {
    store: Arc<dyn KeyValueStore>,
    playlists: Mutex<Vec<Playlist>>,
}

impl PlaylistStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let playlists = load_playlists(store.as_ref());
        PlaylistStore {
            store,
            playlists: Mutex::new(playlists),
        }
    }

    /// Creates the playlist for (profile, mood) or replaces its songs,
    /// genre snapshot and creation date wholesale. The mood is collapsed to
    /// its canonical form first so e.g. "surprise" lands on the "happy"
    /// playlist. An empty song list never creates or updates anything.
    pub fn update_or_create(&self, mood: &str, profile: &Profile, songs: Vec<Track>) {
        if songs.is_empty() {
            info!("songs were empty, not creating a playlist");
            return;
        }

        let mood = canonical_mood(mood);
        let mut playlists = self.playlists.lock().unwrap();

        match playlists
            .iter_mut()
            .find(|p| p.profile_id == profile.id && p.mood == mood)
        {
            Some(existing) => {
                existing.songs = songs;
                existing.genres = profile.favorite_genres.clone();
                existing.date_created = Utc::now();
                info!("updated {} playlist for profile {}", mood, profile.name);
            }
            None => {
                playlists.push(Playlist::new(
                    mood.clone(),
                    profile.id,
                    songs,
                    profile.favorite_genres.clone(),
                ));
                info!("created {} playlist for profile {}", mood, profile.name);
            }
        }

        self.persist(&playlists);
    }

    /// All playlists belonging to a profile, in creation order.
    pub fn list_for(&self, profile_id: Uuid) -> Vec<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.profile_id == profile_id)
            .cloned()
            .collect()
    }

    pub fn get(&self, playlist_id: Uuid) -> Option<Playlist> {
        self.playlists
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == playlist_id)
            .cloned()
    }

    /// Flips a song's favorite flag and repositions it: newly favorited
    /// songs move to the very front, newly unfavorited songs move to just
    /// below the last remaining favorited song (or the end if none are
    /// left). Every other song keeps its relative order.
    pub fn toggle_favorite(&self, playlist_id: Uuid, song: &Track) {
        let mut playlists = self.playlists.lock().unwrap();

        let Some(playlist) = playlists.iter_mut().find(|p| p.id == playlist_id) else {
            warn!("playlist {} not found, cannot toggle favorite", playlist_id);
            return;
        };

        let Some(index) = playlist.songs.iter().position(|s| s.uri == song.uri) else {
            warn!(
                "song {} not found in playlist {}, cannot toggle favorite",
                song.uri, playlist_id
            );
            return;
        };

        let mut toggled = playlist.songs.remove(index);
        toggled.is_favorited = !toggled.is_favorited;

        if toggled.is_favorited {
            playlist.songs.insert(0, toggled);
        } else {
            let insert_at = playlist
                .songs
                .iter()
                .rposition(|s| s.is_favorited)
                .map(|i| i + 1)
                .unwrap_or(playlist.songs.len());
            playlist.songs.insert(insert_at, toggled);
        }

        self.persist(&playlists);
    }

    /// Removes a song from a playlist by uri identity. A miss is a logged
    /// no-op.
    pub fn remove_song(&self, playlist_id: Uuid, song: &Track) {
        let mut playlists = self.playlists.lock().unwrap();

        let Some(playlist) = playlists.iter_mut().find(|p| p.id == playlist_id) else {
            warn!("playlist {} not found, cannot remove song", playlist_id);
            return;
        };

        let before = playlist.songs.len();
        playlist.songs.retain(|s| s.uri != song.uri);

        if playlist.songs.len() == before {
            warn!("song {} not found in playlist {}", song.uri, playlist_id);
            return;
        }

        self.persist(&playlists);
    }

    fn persist(&self, playlists: &[Playlist]) {
        let encoded = match serde_json::to_vec(playlists) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to encode playlists: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(SAVED_PLAYLISTS_KEY, &encoded) {
            error!("failed to save playlists: {}", e);
        }
    }
}

fn load_playlists(store: &dyn KeyValueStore) -> Vec<Playlist> {
    let bytes = match store.get(SAVED_PLAYLISTS_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read saved playlists: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(playlists) => playlists,
        Err(e) => {
            // Accepting data loss over refusing to start
            warn!("failed to decode saved playlists, starting empty: {}", e);
            Vec::new()
        }
    }
}
