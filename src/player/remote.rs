//! Narrow boundary over the vendor's remote playback control SDK.
//!
//! The remote device only understands play-now, append-to-end, skip, seek
//! and pause/resume; there is no clear-queue or insert-at-position
//! primitive. Everything richer is synthesized on top of these calls by the
//! reconciler.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::broadcast;

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("remote player is not connected")]
    NotConnected,
    #[error("remote player call failed: {0}")]
    Remote(String),
}

/// Last known remote playback state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerState {
    pub track_uri: Option<String>,
    pub paused: bool,
}

/// State-change notifications pushed by the remote device.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// The remote moved to a new current track.
    TrackChanged { uri: String },
    /// The remote connection came up or went down.
    ConnectionChanged { connected: bool },
}

#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait RemotePlayer: Send + Sync {
    async fn connect(&self) -> Result<(), PlayerError>;

    async fn disconnect(&self) -> Result<(), PlayerError>;

    async fn is_connected(&self) -> bool;

    /// Starts playing `uri` immediately, replacing whatever is current.
    async fn play_now(&self, uri: &str) -> Result<(), PlayerError>;

    /// Appends `uri` to the end of the remote queue.
    async fn enqueue_at_end(&self, uri: &str) -> Result<(), PlayerError>;

    async fn skip_next(&self) -> Result<(), PlayerError>;

    async fn skip_previous(&self) -> Result<(), PlayerError>;

    async fn pause(&self) -> Result<(), PlayerError>;

    async fn resume(&self) -> Result<(), PlayerError>;

    async fn seek_to(&self, position_ms: u64) -> Result<(), PlayerError>;

    async fn playback_position_ms(&self) -> Result<u64, PlayerError>;

    async fn current_state(&self) -> Result<PlayerState, PlayerError>;

    /// Subscribes to remote state-change events.
    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent>;
}
