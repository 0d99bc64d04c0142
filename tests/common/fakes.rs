use async_trait::async_trait;
use moodqueue::mood::MoodFeatureTarget;
use moodqueue::player::{PlayerError, PlayerEvent, PlayerState, RemotePlayer};
use moodqueue::{Track, TrackCatalog};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;

/// Every remote call a test fake has observed, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCall {
    Connect,
    Disconnect,
    PlayNow(String),
    EnqueueAtEnd(String),
    SkipNext,
    SkipPrevious,
    Pause,
    Resume,
    SeekTo(u64),
}

/// Scriptable RemotePlayer that records every call. Unlike the production
/// noop player it never emits events on its own; tests push events
/// explicitly so completion order stays deterministic.
pub struct FakeRemotePlayer {
    connected: AtomicBool,
    connect_succeeds: AtomicBool,
    skips_fail: AtomicBool,
    failing_uris: Mutex<HashSet<String>>,
    calls: Mutex<Vec<PlayerCall>>,
    events: broadcast::Sender<PlayerEvent>,
}

impl FakeRemotePlayer {
    /// A fake that starts out connected.
    pub fn connected() -> Self {
        let fake = Self::disconnected();
        fake.connected.store(true, Ordering::SeqCst);
        fake
    }

    /// A fake that starts out disconnected but will accept a connect call.
    pub fn disconnected() -> Self {
        let (events, _) = broadcast::channel(64);
        FakeRemotePlayer {
            connected: AtomicBool::new(false),
            connect_succeeds: AtomicBool::new(true),
            skips_fail: AtomicBool::new(false),
            failing_uris: Mutex::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Makes connect attempts fail from now on.
    pub fn refuse_connections(&self) {
        self.connect_succeeds.store(false, Ordering::SeqCst);
    }

    /// Makes play/enqueue calls for this uri fail.
    pub fn fail_uri(&self, uri: &str) {
        self.failing_uris.lock().unwrap().insert(uri.to_string());
    }

    /// Makes every skip call fail.
    pub fn fail_skips(&self) {
        self.skips_fail.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<PlayerCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    pub fn emit_track_changed(&self, uri: &str) {
        let _ = self.events.send(PlayerEvent::TrackChanged {
            uri: uri.to_string(),
        });
    }

    fn record(&self, call: PlayerCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn uri_fails(&self, uri: &str) -> bool {
        self.failing_uris.lock().unwrap().contains(uri)
    }
}

#[async_trait]
impl RemotePlayer for FakeRemotePlayer {
    async fn connect(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::Connect);
        if self.connect_succeeds.load(Ordering::SeqCst) {
            self.connected.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(PlayerError::Remote("connection refused".to_string()))
        }
    }

    async fn disconnect(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::Disconnect);
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn play_now(&self, uri: &str) -> Result<(), PlayerError> {
        self.record(PlayerCall::PlayNow(uri.to_string()));
        if self.uri_fails(uri) {
            Err(PlayerError::Remote(format!("cannot play {}", uri)))
        } else {
            Ok(())
        }
    }

    async fn enqueue_at_end(&self, uri: &str) -> Result<(), PlayerError> {
        self.record(PlayerCall::EnqueueAtEnd(uri.to_string()));
        if self.uri_fails(uri) {
            Err(PlayerError::Remote(format!("cannot enqueue {}", uri)))
        } else {
            Ok(())
        }
    }

    async fn skip_next(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::SkipNext);
        if self.skips_fail.load(Ordering::SeqCst) {
            Err(PlayerError::Remote("skip failed".to_string()))
        } else {
            Ok(())
        }
    }

    async fn skip_previous(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::SkipPrevious);
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::Pause);
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        self.record(PlayerCall::Resume);
        Ok(())
    }

    async fn seek_to(&self, position_ms: u64) -> Result<(), PlayerError> {
        self.record(PlayerCall::SeekTo(position_ms));
        Ok(())
    }

    async fn playback_position_ms(&self) -> Result<u64, PlayerError> {
        Ok(30_000)
    }

    async fn current_state(&self) -> Result<PlayerState, PlayerError> {
        Ok(PlayerState::default())
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

/// TrackCatalog returning a canned track list and recording each request.
pub struct FakeTrackCatalog {
    tracks: Mutex<Vec<Track>>,
    requests: Mutex<Vec<(Vec<String>, usize)>>,
}

impl FakeTrackCatalog {
    pub fn returning(tracks: Vec<Track>) -> Self {
        FakeTrackCatalog {
            tracks: Mutex::new(tracks),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn empty() -> Self {
        Self::returning(Vec::new())
    }

    pub fn requests(&self) -> Vec<(Vec<String>, usize)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TrackCatalog for FakeTrackCatalog {
    async fn recommendations(
        &self,
        seed_genres: &[String],
        _target: &MoodFeatureTarget,
        limit: usize,
    ) -> anyhow::Result<Vec<Track>> {
        self.requests
            .lock()
            .unwrap()
            .push((seed_genres.to_vec(), limit));
        Ok(self.tracks.lock().unwrap().clone())
    }
}
