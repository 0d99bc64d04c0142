//! Mood to acoustic-feature mapping.
//!
//! The classifier emits fine-grained emotion labels; recommendations are
//! seeded from coarse feature ranges per mood. An unrecognized mood falls
//! back to a neutral mid-range target instead of failing, so recommendation
//! quality degrades gracefully.

/// An optional min/max bound over a single acoustic attribute.
/// An absent bound means the attribute is unconstrained on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl FeatureRange {
    pub fn between(min: f64, max: f64) -> Self {
        FeatureRange {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: f64) -> Self {
        FeatureRange {
            min: Some(min),
            max: None,
        }
    }

    pub fn unconstrained() -> Self {
        FeatureRange::default()
    }

    pub fn is_constrained(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

/// Target ranges over the acoustic attributes used to build a
/// recommendation query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MoodFeatureTarget {
    pub valence: FeatureRange,
    pub energy: FeatureRange,
    pub loudness: FeatureRange,
    pub acousticness: FeatureRange,
    pub danceability: FeatureRange,
}

/// Returns the feature target for a mood label, case-insensitively.
pub fn target_for(mood: &str) -> MoodFeatureTarget {
    match mood.to_lowercase().as_str() {
        "happy" | "surprise" => MoodFeatureTarget {
            valence: FeatureRange::between(0.7, 1.0),
            energy: FeatureRange::between(0.6, 0.9),
            ..MoodFeatureTarget::default()
        },
        // Softer, acoustic-leaning tracks
        "sad" | "disgust" | "fear" => MoodFeatureTarget {
            valence: FeatureRange::between(0.0, 0.3),
            energy: FeatureRange::between(0.3, 0.5),
            acousticness: FeatureRange::between(0.6, 1.0),
            ..MoodFeatureTarget::default()
        },
        // Low valence, high energy, with a loudness floor for intensity
        "angry" => MoodFeatureTarget {
            valence: FeatureRange::between(0.0, 0.3),
            energy: FeatureRange::between(0.8, 1.0),
            loudness: FeatureRange::at_least(-5.0),
            ..MoodFeatureTarget::default()
        },
        "neutral" | "chill" => MoodFeatureTarget {
            valence: FeatureRange::between(0.4, 0.6),
            energy: FeatureRange::between(0.4, 0.6),
            acousticness: FeatureRange::between(0.3, 0.6),
            ..MoodFeatureTarget::default()
        },
        other => {
            tracing::debug!("no feature mapping for mood '{}', using neutral fallback", other);
            MoodFeatureTarget {
                valence: FeatureRange::between(0.4, 0.6),
                energy: FeatureRange::between(0.4, 0.6),
                ..MoodFeatureTarget::default()
            }
        }
    }
}

/// Collapses a fine-grained emotion label to the coarse mood playlists are
/// keyed on: surprise counts as happy, disgust and fear count as sad.
pub fn canonical_mood(mood: &str) -> String {
    let lowered = mood.to_lowercase();
    match lowered.as_str() {
        "happy" | "surprise" => "happy".to_string(),
        "sad" | "disgust" | "fear" => "sad".to_string(),
        _ => lowered,
    }
}
