//! Reconciles desired play order against the remote playback queue.
//!
//! The remote device offers no clear-queue or insert primitive, so both are
//! synthesized: clearing is one skip per tracked entry, and playing from the
//! middle of the queue is a run of skips followed by a play-now. Batch
//! enqueues are paced with a fixed inter-call delay to stay under the
//! provider's rate limits.

use super::QueueState;
use crate::catalog::Track;
use crate::player::{PlayerError, PlayerEvent, RemotePlayer};
use crate::playlist::PlaylistStore;
use crate::profile::Profile;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct ReconcilerSettings {
    /// Delay between consecutive dispatches within a batch.
    pub enqueue_delay: Duration,
    /// How long to wait for the remote connection to come back before
    /// retrying a dropped action.
    pub reconnect_delay: Duration,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            enqueue_delay: Duration::from_millis(500),
            reconnect_delay: Duration::from_millis(2000),
        }
    }
}

pub struct PlaybackQueueReconciler {
    player: Arc<dyn RemotePlayer>,
    queue: Arc<Mutex<QueueState>>,
    playlists: Arc<PlaylistStore>,
    settings: ReconcilerSettings,
    /// Uri the remote last reported as current; draining happens against
    /// the track we just moved past, so the new current stays at the front.
    last_track_uri: Mutex<Option<String>>,
}

impl PlaybackQueueReconciler {
    pub fn new(
        player: Arc<dyn RemotePlayer>,
        queue: QueueState,
        playlists: Arc<PlaylistStore>,
        settings: ReconcilerSettings,
    ) -> Self {
        Self {
            player,
            queue: Arc::new(Mutex::new(queue)),
            playlists,
            settings,
            last_track_uri: Mutex::new(None),
        }
    }

    /// Snapshot of the locally tracked queue.
    pub fn queue_snapshot(&self) -> Vec<Track> {
        self.queue.lock().unwrap().snapshot()
    }

    /// Dispatches a fresh batch of recommendations: clears the remote queue,
    /// plays the first track immediately (otherwise the device auto-selects
    /// something unrelated), appends the rest with pacing, and once every
    /// dispatch has settled commits the confirmed tracks to the playlist
    /// store and the local queue. A failed first play fails the whole batch
    /// and nothing is committed.
    pub async fn enqueue_batch(
        &self,
        mood: &str,
        profile: &Profile,
        tracks: Vec<Track>,
    ) -> Result<Vec<Track>, PlayerError> {
        if tracks.is_empty() {
            debug!("no tracks to enqueue for mood {}", mood);
            return Ok(Vec::new());
        }

        self.ensure_connected().await?;
        self.clear_remote_queue().await;

        let confirmed = self.dispatch_batch(&tracks).await?;

        self.playlists
            .update_or_create(mood, profile, confirmed.clone());
        {
            let mut queue = self.queue.lock().unwrap();
            for track in &confirmed {
                queue.append(track.clone());
            }
        }

        info!(
            "enqueued {} of {} tracks for mood {}",
            confirmed.len(),
            tracks.len(),
            mood
        );
        Ok(confirmed)
    }

    /// Replays a stored playlist through the remote queue. Uses the same
    /// clear-then-pace dispatch as a fresh batch but does not rewrite the
    /// playlist itself.
    pub async fn play_playlist(&self, tracks: &[Track]) -> Result<Vec<Track>, PlayerError> {
        if tracks.is_empty() {
            debug!("playlist is empty, nothing to play");
            return Ok(Vec::new());
        }

        self.ensure_connected().await?;
        self.clear_remote_queue().await;

        let confirmed = self.dispatch_batch(tracks).await?;

        {
            let mut queue = self.queue.lock().unwrap();
            for track in &confirmed {
                queue.append(track.clone());
            }
        }

        Ok(confirmed)
    }

    /// Plays a track that is already somewhere in the tracked queue by
    /// fast-forwarding the remote past everything before it. A skip that
    /// fails is logged and tolerated; the closing play-now re-anchors the
    /// remote on the target either way.
    pub async fn play_from_queue(&self, track: &Track) -> Result<(), PlayerError> {
        self.ensure_connected().await?;

        let position = self.queue.lock().unwrap().position_of(&track.uri);
        let Some(index) = position else {
            warn!("track {} is not in the tracked queue", track.uri);
            return Ok(());
        };

        for _ in 0..index {
            if let Err(e) = self.player.skip_next().await {
                warn!("skip while seeking through queue failed: {}", e);
            }
        }

        self.player.play_now(&track.uri).await?;
        info!("playing {} from queue position {}", track.uri, index);
        Ok(())
    }

    /// Clears the remote queue, then the local mirror.
    pub async fn clear_queue(&self) {
        if let Err(e) = self.ensure_connected().await {
            warn!("cannot clear queue: {}", e);
            return;
        }
        self.clear_remote_queue().await;
    }

    /// The remote has no clear primitive, so clearing is one skip per
    /// tracked entry. This assumes each skip advances exactly one position;
    /// a failed skip is logged and the loop continues.
    async fn clear_remote_queue(&self) {
        let tracked = self.queue.lock().unwrap().len();
        if tracked == 0 {
            debug!("queue already empty, no need to clear");
            return;
        }

        for _ in 0..tracked {
            if let Err(e) = self.player.skip_next().await {
                warn!("skip during queue clear failed: {}", e);
            }
        }

        self.queue.lock().unwrap().clear_all();
        info!("cleared {} tracked queue entries", tracked);
    }

    async fn dispatch_batch(&self, tracks: &[Track]) -> Result<Vec<Track>, PlayerError> {
        let dispatches = tracks.iter().cloned().enumerate().map(|(index, track)| {
            let player = Arc::clone(&self.player);
            let delay = self.settings.enqueue_delay * index as u32;
            async move {
                tokio::time::sleep(delay).await;
                if index == 0 {
                    match player.play_now(&track.uri).await {
                        Ok(()) => {
                            info!("started playing first track {}", track.uri);
                            Ok(Some(track))
                        }
                        Err(e) => Err(e),
                    }
                } else {
                    match player.enqueue_at_end(&track.uri).await {
                        Ok(()) => {
                            debug!("enqueued track {}", track.uri);
                            Ok(Some(track))
                        }
                        Err(e) => {
                            warn!("failed to enqueue track {}: {}", track.uri, e);
                            Ok(None)
                        }
                    }
                }
            }
        });

        let results = futures::future::join_all(dispatches).await;

        let mut confirmed = Vec::new();
        for result in results {
            match result {
                Ok(Some(track)) => confirmed.push(track),
                Ok(None) => {}
                Err(e) => {
                    error!("first track play failed, dropping batch: {}", e);
                    return Err(e);
                }
            }
        }
        Ok(confirmed)
    }

    /// Pauses or resumes depending on the remote's last known state.
    pub async fn toggle_play_pause(&self) -> Result<(), PlayerError> {
        self.ensure_connected().await?;

        let state = self.player.current_state().await?;
        if state.paused {
            self.player.resume().await
        } else {
            self.player.pause().await
        }
    }

    pub async fn skip_next(&self) -> Result<(), PlayerError> {
        self.ensure_connected().await?;
        self.player.skip_next().await
    }

    pub async fn skip_previous(&self) -> Result<(), PlayerError> {
        self.ensure_connected().await?;
        self.player.skip_previous().await
    }

    /// Seeks relative to the current playback position, clamping at zero.
    pub async fn seek_by(&self, delta_ms: i64) -> Result<(), PlayerError> {
        self.ensure_connected().await?;

        let position = self.player.playback_position_ms().await?;
        let target = if delta_ms.is_negative() {
            position.saturating_sub(delta_ms.unsigned_abs())
        } else {
            position.saturating_add(delta_ms as u64)
        };
        self.player.seek_to(target).await
    }

    /// One bounded reconnect attempt: if the remote is down, ask it to
    /// connect, wait out the reconnect delay, and check again. Callers run
    /// their action exactly once after this resolves; there is no retry
    /// loop.
    async fn ensure_connected(&self) -> Result<(), PlayerError> {
        if self.player.is_connected().await {
            return Ok(());
        }

        info!("remote player not connected, attempting to reconnect");
        if let Err(e) = self.player.connect().await {
            warn!("reconnect attempt failed: {}", e);
        }
        tokio::time::sleep(self.settings.reconnect_delay).await;

        if self.player.is_connected().await {
            Ok(())
        } else {
            warn!("remote player still not connected, dropping action");
            Err(PlayerError::NotConnected)
        }
    }

    /// Feeds a remote state-change event into the local queue mirror. When
    /// the current track changes, everything up to and including the track
    /// we just moved past is drained, keeping the new current track at the
    /// front.
    pub fn on_player_event(&self, event: PlayerEvent) {
        match event {
            PlayerEvent::TrackChanged { uri } => {
                let previous = self.last_track_uri.lock().unwrap().replace(uri.clone());
                match previous {
                    Some(previous) if previous != uri => {
                        self.queue.lock().unwrap().drain_until(&previous);
                    }
                    _ => {}
                }
            }
            PlayerEvent::ConnectionChanged { connected } => {
                debug!("remote player connection changed: connected={}", connected);
            }
        }
    }

    /// Spawns the event loop that mirrors remote state changes into the
    /// local queue until the token is cancelled.
    pub fn spawn_event_loop(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        let reconciler = self;
        let mut events = reconciler.player.subscribe();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    event = events.recv() => {
                        match event {
                            Ok(event) => reconciler.on_player_event(event),
                            Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                                warn!("player event loop lagged, {} events dropped", skipped);
                            }
                            Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                                debug!("player event channel closed");
                                break;
                            }
                        }
                    }
                    _ = shutdown.cancelled() => {
                        debug!("player event loop shutting down");
                        break;
                    }
                }
            }
        })
    }
}
