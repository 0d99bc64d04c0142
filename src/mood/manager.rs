use super::target_for;
use crate::catalog::{Track, TrackCatalog};
use crate::profile::Profile;
use crate::queue::PlaybackQueueReconciler;
use anyhow::Result;
use std::sync::Arc;
use tracing::info;

/// Ties mood detection output to the playback queue: maps the mood to a
/// feature target, asks the catalog for candidates seeded by the profile's
/// genres, and hands the result to the reconciler.
pub struct MoodQueueManager {
    catalog: Arc<dyn TrackCatalog>,
    reconciler: Arc<PlaybackQueueReconciler>,
    recommendation_limit: usize,
}

impl MoodQueueManager {
    pub fn new(
        catalog: Arc<dyn TrackCatalog>,
        reconciler: Arc<PlaybackQueueReconciler>,
        recommendation_limit: usize,
    ) -> Self {
        Self {
            catalog,
            reconciler,
            recommendation_limit,
        }
    }

    /// Fetches recommendations for a mood and queues them on the remote
    /// player. Returns the tracks that were actually confirmed. An empty
    /// recommendation result queues nothing and creates no playlist.
    pub async fn queue_for_mood(&self, mood: &str, profile: &Profile) -> Result<Vec<Track>> {
        let target = target_for(mood);
        let tracks = self
            .catalog
            .recommendations(&profile.favorite_genres, &target, self.recommendation_limit)
            .await?;

        if tracks.is_empty() {
            info!("catalog returned no tracks for mood {}", mood);
            return Ok(Vec::new());
        }

        info!(
            "queueing {} recommendations for mood {} (profile {})",
            tracks.len(),
            mood,
            profile.name
        );
        let confirmed = self.reconciler.enqueue_batch(mood, profile, tracks).await?;
        Ok(confirmed)
    }
}
