//! HTTP client for the external recommendations catalog.

use super::{Track, TrackCatalog};
use crate::mood::{FeatureRange, MoodFeatureTarget};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Maximum number of genre seeds the recommendations endpoint accepts.
const MAX_SEED_GENRES: usize = 5;

/// HTTP client for the catalog's recommendations endpoint.
pub struct HttpTrackCatalog {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpTrackCatalog {
    /// Create a new catalog client.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the catalog service
    /// * `bearer_token` - Optional access token sent as a Bearer header
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(base_url: String, bearer_token: Option<String>, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        let base_url = base_url.trim_end_matches('/').to_string();

        Self {
            client,
            base_url,
            bearer_token,
        }
    }
}

#[async_trait]
impl TrackCatalog for HttpTrackCatalog {
    async fn recommendations(
        &self,
        seed_genres: &[String],
        target: &MoodFeatureTarget,
        limit: usize,
    ) -> Result<Vec<Track>> {
        let url = format!("{}/recommendations", self.base_url);
        let mut params = vec![
            ("seed_genres".to_string(), seed_param(seed_genres)),
            ("limit".to_string(), limit.to_string()),
        ];
        params.extend(feature_params(target));

        debug!("requesting recommendations: {:?}", params);

        let mut request = self.client.get(&url).query(&params);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .context("Failed to reach recommendations endpoint")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Recommendations request failed with status: {}",
                response.status()
            );
        }

        let body = response.bytes().await?;
        parse_recommendations(&body)
    }
}

/// Builds the seed_genres query value: caps the list at five seeds
/// (shuffling first when the profile selected more, so every genre gets a
/// chance over time) and maps display names to catalog genre ids.
pub fn seed_param(genres: &[String]) -> String {
    let mut genres = genres.to_vec();
    if genres.len() > MAX_SEED_GENRES {
        genres.shuffle(&mut rand::rng());
    }
    genres
        .iter()
        .take(MAX_SEED_GENRES)
        .map(|g| api_genre(g))
        .collect::<Vec<_>>()
        .join(",")
}

/// Converts a user-facing genre name to the catalog's genre id.
pub fn api_genre(genre: &str) -> String {
    match genre {
        "R&B" => "r-n-b".to_string(),
        "World Music" => "world-music".to_string(),
        "Film Scores" => "movies".to_string(),
        other => other.to_lowercase(),
    }
}

/// Expands a feature target into query parameters, skipping absent bounds.
pub fn feature_params(target: &MoodFeatureTarget) -> Vec<(String, String)> {
    let mut params = Vec::new();
    let mut push = |name: &str, range: &FeatureRange| {
        if let Some(min) = range.min {
            params.push((format!("min_{}", name), min.to_string()));
        }
        if let Some(max) = range.max {
            params.push((format!("max_{}", name), max.to_string()));
        }
    };

    push("valence", &target.valence);
    push("energy", &target.energy);
    push("loudness", &target.loudness);
    push("acousticness", &target.acousticness);
    push("danceability", &target.danceability);
    params
}

#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    tracks: Vec<RawTrack>,
}

#[derive(Debug, Deserialize)]
struct RawTrack {
    uri: Option<String>,
    name: Option<String>,
    album: Option<RawAlbum>,
    artists: Option<Vec<RawArtist>>,
}

#[derive(Debug, Deserialize)]
struct RawAlbum {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawArtist {
    name: Option<String>,
}

/// Parses a recommendations response body into tracks.
///
/// A track without a uri cannot be played or deduplicated, so it is dropped
/// with a warning; missing display fields degrade to placeholders.
pub fn parse_recommendations(body: &[u8]) -> Result<Vec<Track>> {
    let response: RecommendationsResponse =
        serde_json::from_slice(body).context("Failed to parse recommendations response")?;

    let tracks = response
        .tracks
        .into_iter()
        .filter_map(|raw| {
            let Some(uri) = raw.uri else {
                warn!("dropping recommended track without a uri");
                return None;
            };

            let title = raw.name.unwrap_or_else(|| "Unknown Track".to_string());
            let album = raw
                .album
                .and_then(|a| a.name)
                .unwrap_or_else(|| "Unknown Album".to_string());
            let artists = raw
                .artists
                .unwrap_or_default()
                .into_iter()
                .filter_map(|a| a.name)
                .collect::<Vec<_>>();
            let artist = if artists.is_empty() {
                "Unknown Artist".to_string()
            } else {
                artists.join(", ")
            };

            Some(Track::new(title, album, artist, uri))
        })
        .collect();

    Ok(tracks)
}
