//! Common test infrastructure
//!
//! Fakes for the two external collaborators (remote player and track
//! catalog) plus fixture helpers shared by the e2e tests.

// Not every test binary touches every helper
#![allow(dead_code)]

mod fakes;

pub use fakes::{FakeRemotePlayer, FakeTrackCatalog, PlayerCall};

use chrono::NaiveDate;
use moodqueue::{Profile, Track};

pub fn track(title: &str, uri: &str) -> Track {
    Track::new(title, "Album", "Artist", uri)
}

pub fn test_profile(name: &str, genres: &[&str]) -> Profile {
    Profile::new(
        name,
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        genres.iter().map(|g| g.to_string()).collect(),
        true,
    )
}
