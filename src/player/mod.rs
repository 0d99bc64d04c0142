mod noop;
mod remote;

pub use noop::NoopRemotePlayer;
pub use remote::{PlayerError, PlayerEvent, PlayerState, RemotePlayer};
