use crate::catalog::Track;
use tracing::{debug, info};

/// Local mirror of the remote queue: what the player is expected to play
/// next, in play order. The first entry, if present, is the track currently
/// confirmed playing or about to be. Duplicate uris are allowed, catalogs
/// may legitimately recommend the same track twice.
#[derive(Debug, Default)]
pub struct QueueState {
    entries: Vec<Track>,
}

impl QueueState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a track to the end of the queue and returns the new snapshot.
    pub fn append(&mut self, track: Track) -> &[Track] {
        self.entries.push(track);
        &self.entries
    }

    /// Removes the entry matching `uri` and everything before it, modeling
    /// the remote player having advanced past those tracks. A miss or an
    /// already empty queue is a logged no-op.
    pub fn drain_until(&mut self, uri: &str) -> &[Track] {
        if self.entries.is_empty() {
            debug!("queue is empty, nothing to drain");
            return &self.entries;
        }

        match self.position_of(uri) {
            Some(index) => {
                self.entries.drain(0..=index);
                info!(
                    "drained queue up to {}, {} entries remain",
                    uri,
                    self.entries.len()
                );
            }
            None => {
                debug!("track {} not found in queue", uri);
            }
        }

        &self.entries
    }

    /// Index of the first entry matching `uri`, if any.
    pub fn position_of(&self, uri: &str) -> Option<usize> {
        self.entries.iter().position(|t| t.uri == uri)
    }

    pub fn entries(&self) -> &[Track] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<Track> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Local wipe; only valid once the remote queue has been cleared too.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }
}
