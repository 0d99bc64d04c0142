//! HTTP client for the remote mood classification service.

use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("mood classification request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("mood classification service returned status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode mood classification response: {0}")]
    Decode(String),
}

/// The classifier's verdict: a mood label, optionally with the normalized
/// per-emotion confidence map some deployments return alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodDetection {
    pub mood: String,
    pub probabilities: Option<HashMap<String, f64>>,
}

/// The service has been observed answering in two shapes:
/// `{"mood": "..."}` and `{"emotion": "...", "probabilities": {...}}`.
#[derive(Debug, Deserialize)]
struct RawDetection {
    mood: Option<String>,
    emotion: Option<String>,
    probabilities: Option<HashMap<String, f64>>,
}

/// HTTP client for the mood detection endpoint.
pub struct MoodClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl MoodClassifier {
    /// Create a new classifier client.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the detection endpoint
    /// * `timeout_secs` - Request timeout in seconds; detection runs a deep
    ///   model server-side, so this is generous (60s in production)
    pub fn new(endpoint: String, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, endpoint }
    }

    /// Sends a JPEG to the classification service and returns the detected
    /// mood. Non-200 responses and malformed bodies are errors, never a
    /// silent default.
    pub async fn detect(&self, jpeg: Vec<u8>) -> Result<MoodDetection, ClassifierError> {
        let part = reqwest::multipart::Part::bytes(jpeg)
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifierError::Status(response.status()));
        }

        let body = response.bytes().await?;
        let detection = parse_detection(&body)?;
        info!("detected mood: {}", detection.mood);
        Ok(detection)
    }
}

/// Parses either observed response shape into a MoodDetection.
pub fn parse_detection(body: &[u8]) -> Result<MoodDetection, ClassifierError> {
    let raw: RawDetection = serde_json::from_slice(body)
        .map_err(|e| ClassifierError::Decode(e.to_string()))?;

    let mood = raw
        .mood
        .or(raw.emotion)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ClassifierError::Decode("response carries no mood label".to_string()))?;

    Ok(MoodDetection {
        mood,
        probabilities: raw.probabilities,
    })
}
