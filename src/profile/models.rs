use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local user profile. Playlists reference profiles by id; the profile
/// does not own them.
///
/// `user_pin` distinguishes three states: None means a pin was never set,
/// `Some("")` means a pin existed and was removed (the feature stays
/// available to re-enable), and a non-empty value is the active pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub favorite_genres: Vec<String>,
    pub has_agreed_to_terms: bool,
    #[serde(default)]
    pub user_pin: Option<String>,
    #[serde(default)]
    pub personal_security_question: Option<String>,
    #[serde(default)]
    pub security_question_answer: Option<String>,
}

impl Profile {
    pub fn new(
        name: impl Into<String>,
        date_of_birth: NaiveDate,
        favorite_genres: Vec<String>,
        has_agreed_to_terms: bool,
    ) -> Self {
        Profile {
            id: Uuid::new_v4(),
            name: name.into(),
            date_of_birth,
            favorite_genres,
            has_agreed_to_terms,
            user_pin: None,
            personal_security_question: None,
            security_question_answer: None,
        }
    }
}
