mod client;
mod track;

pub use client::HttpTrackCatalog;
pub use track::Track;

use crate::mood::MoodFeatureTarget;
use anyhow::Result;
use async_trait::async_trait;

/// Source of candidate tracks for a feature/genre query.
///
/// The catalog itself is an external collaborator; this crate only consumes
/// it. Implementations must return tracks in the order the provider ranked
/// them, since that order becomes play order.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Fetches up to `limit` recommended tracks for the given genre seeds and
    /// acoustic feature target.
    async fn recommendations(
        &self,
        seed_genres: &[String],
        target: &MoodFeatureTarget,
        limit: usize,
    ) -> Result<Vec<Track>>;
}
