mod models;
mod store;

pub use models::Playlist;
pub use store::PlaylistStore;
