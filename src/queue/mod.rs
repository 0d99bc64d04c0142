mod reconciler;
mod state;

pub use reconciler::{PlaybackQueueReconciler, ReconcilerSettings};
pub use state::QueueState;
