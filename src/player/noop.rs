use super::{PlayerError, PlayerEvent, PlayerState, RemotePlayer};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::broadcast;
use tracing::info;

/// RemotePlayer that accepts every command and only logs it.
///
/// Stands in for the vendor SDK adapter when no device is paired; it still
/// emits TrackChanged events for play-now calls so the queue-draining path
/// stays exercised end to end.
pub struct NoopRemotePlayer {
    connected: AtomicBool,
    current_uri: Mutex<Option<String>>,
    paused: AtomicBool,
    events: broadcast::Sender<PlayerEvent>,
}

impl NoopRemotePlayer {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        NoopRemotePlayer {
            connected: AtomicBool::new(false),
            current_uri: Mutex::new(None),
            paused: AtomicBool::new(false),
            events,
        }
    }

    fn emit(&self, event: PlayerEvent) {
        // No receivers is fine, nobody has subscribed yet
        let _ = self.events.send(event);
    }
}

impl Default for NoopRemotePlayer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemotePlayer for NoopRemotePlayer {
    async fn connect(&self) -> Result<(), PlayerError> {
        self.connected.store(true, Ordering::SeqCst);
        info!("noop player connected");
        self.emit(PlayerEvent::ConnectionChanged { connected: true });
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), PlayerError> {
        self.connected.store(false, Ordering::SeqCst);
        info!("noop player disconnected");
        self.emit(PlayerEvent::ConnectionChanged { connected: false });
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn play_now(&self, uri: &str) -> Result<(), PlayerError> {
        info!("noop player: play {}", uri);
        *self.current_uri.lock().unwrap() = Some(uri.to_string());
        self.paused.store(false, Ordering::SeqCst);
        self.emit(PlayerEvent::TrackChanged {
            uri: uri.to_string(),
        });
        Ok(())
    }

    async fn enqueue_at_end(&self, uri: &str) -> Result<(), PlayerError> {
        info!("noop player: enqueue {}", uri);
        Ok(())
    }

    async fn skip_next(&self) -> Result<(), PlayerError> {
        info!("noop player: skip next");
        Ok(())
    }

    async fn skip_previous(&self) -> Result<(), PlayerError> {
        info!("noop player: skip previous");
        Ok(())
    }

    async fn pause(&self) -> Result<(), PlayerError> {
        info!("noop player: pause");
        self.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), PlayerError> {
        info!("noop player: resume");
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn seek_to(&self, position_ms: u64) -> Result<(), PlayerError> {
        info!("noop player: seek to {}ms", position_ms);
        Ok(())
    }

    async fn playback_position_ms(&self) -> Result<u64, PlayerError> {
        Ok(0)
    }

    async fn current_state(&self) -> Result<PlayerState, PlayerError> {
        Ok(PlayerState {
            track_uri: self.current_uri.lock().unwrap().clone(),
            paused: self.paused.load(Ordering::SeqCst),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn play_now_emits_a_track_changed_event() {
        let player = NoopRemotePlayer::new();
        let mut events = player.subscribe();

        player.connect().await.unwrap();
        player.play_now("catalog:track:1").await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            PlayerEvent::ConnectionChanged { connected: true }
        );
        assert_eq!(
            events.recv().await.unwrap(),
            PlayerEvent::TrackChanged {
                uri: "catalog:track:1".to_string()
            }
        );

        let state = player.current_state().await.unwrap();
        assert_eq!(state.track_uri.as_deref(), Some("catalog:track:1"));
        assert!(!state.paused);
    }
}
