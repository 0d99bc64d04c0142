use super::Profile;
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};
use uuid::Uuid;

pub const SAVED_PROFILES_KEY: &str = "saved_profiles";

/// Durable collection of user profiles, persisted as one JSON snapshot on
/// every mutation, same scheme as the playlist store.
pub struct ProfileStore {
    store: Arc<dyn KeyValueStore>,
    profiles: Mutex<Vec<Profile>>,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let profiles = load_profiles(store.as_ref());
        ProfileStore {
            store,
            profiles: Mutex::new(profiles),
        }
    }

    pub fn create(
        &self,
        name: &str,
        date_of_birth: NaiveDate,
        favorite_genres: Vec<String>,
        has_agreed_to_terms: bool,
    ) -> Profile {
        let profile = Profile::new(name, date_of_birth, favorite_genres, has_agreed_to_terms);

        let mut profiles = self.profiles.lock().unwrap();
        profiles.push(profile.clone());
        self.persist(&profiles);
        info!("created profile {}", name);

        profile
    }

    /// Replaces every mutable field of an existing profile. A missing
    /// profile is a logged no-op.
    pub fn update(&self, updated: &Profile) {
        let mut profiles = self.profiles.lock().unwrap();

        let Some(existing) = profiles.iter_mut().find(|p| p.id == updated.id) else {
            warn!("profile {} not found, nothing to update", updated.id);
            return;
        };

        *existing = updated.clone();
        self.persist(&profiles);
    }

    /// Deletes a profile. Playlists referencing the profile are left in the
    /// playlist store as orphans; nothing prunes them.
    pub fn delete(&self, profile_id: Uuid) {
        let mut profiles = self.profiles.lock().unwrap();

        let before = profiles.len();
        profiles.retain(|p| p.id != profile_id);

        if profiles.len() == before {
            warn!("profile {} not found, no deletion performed", profile_id);
            return;
        }

        self.persist(&profiles);
        info!("deleted profile {}", profile_id);
    }

    /// Clears the profile's pin by setting it to the empty-string sentinel,
    /// which marks "pin removed" as distinct from "never had a pin".
    pub fn delete_pin(&self, profile_id: Uuid) {
        let mut profiles = self.profiles.lock().unwrap();

        let Some(profile) = profiles.iter_mut().find(|p| p.id == profile_id) else {
            warn!("profile {} not found, cannot delete pin", profile_id);
            return;
        };

        profile.user_pin = Some(String::new());
        self.persist(&profiles);
        info!("deleted pin for profile {}", profile_id);
    }

    pub fn get(&self, profile_id: Uuid) -> Option<Profile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == profile_id)
            .cloned()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Profile> {
        self.profiles
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.name == name)
            .cloned()
    }

    pub fn all(&self) -> Vec<Profile> {
        self.profiles.lock().unwrap().clone()
    }

    fn persist(&self, profiles: &[Profile]) {
        let encoded = match serde_json::to_vec(profiles) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("failed to encode profiles: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(SAVED_PROFILES_KEY, &encoded) {
            error!("failed to save profiles: {}", e);
        }
    }
}

fn load_profiles(store: &dyn KeyValueStore) -> Vec<Profile> {
    let bytes = match store.get(SAVED_PROFILES_KEY) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("failed to read saved profiles: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(profiles) => profiles,
        Err(e) => {
            warn!("failed to decode saved profiles, starting empty: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryKeyValueStore;

    fn dob() -> NaiveDate {
        NaiveDate::from_ymd_opt(1995, 6, 15).unwrap()
    }

    fn new_store() -> (ProfileStore, Arc<InMemoryKeyValueStore>) {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let store = ProfileStore::new(kv.clone());
        (store, kv)
    }

    #[test]
    fn create_and_lookup() {
        let (store, _kv) = new_store();

        let profile = store.create("ada", dob(), vec!["jazz".to_string()], true);

        assert_eq!(store.get(profile.id).unwrap().name, "ada");
        assert_eq!(store.find_by_name("ada").unwrap().id, profile.id);
        assert!(store.find_by_name("grace").is_none());
    }

    #[test]
    fn update_replaces_all_fields() {
        let (store, _kv) = new_store();

        let mut profile = store.create("ada", dob(), vec![], true);
        profile.favorite_genres = vec!["pop".to_string()];
        profile.user_pin = Some("1234".to_string());
        profile.personal_security_question = Some("first pet?".to_string());
        profile.security_question_answer = Some("rex".to_string());

        store.update(&profile);

        let stored = store.get(profile.id).unwrap();
        assert_eq!(stored.favorite_genres, vec!["pop"]);
        assert_eq!(stored.user_pin.as_deref(), Some("1234"));
    }

    #[test]
    fn updating_a_missing_profile_is_a_noop() {
        let (store, _kv) = new_store();
        let ghost = Profile::new("ghost", dob(), vec![], true);

        store.update(&ghost);

        assert!(store.all().is_empty());
    }

    #[test]
    fn delete_removes_the_profile() {
        let (store, _kv) = new_store();

        let profile = store.create("ada", dob(), vec![], true);
        store.delete(profile.id);

        assert!(store.get(profile.id).is_none());

        // Deleting again just logs
        store.delete(profile.id);
    }

    #[test]
    fn delete_pin_sets_the_empty_sentinel() {
        let (store, _kv) = new_store();

        let mut profile = store.create("ada", dob(), vec![], true);
        profile.user_pin = Some("1234".to_string());
        store.update(&profile);

        store.delete_pin(profile.id);

        let stored = store.get(profile.id).unwrap();
        assert_eq!(stored.user_pin.as_deref(), Some(""));
    }

    #[test]
    fn profiles_survive_a_store_reload() {
        let kv = Arc::new(InMemoryKeyValueStore::new());

        let id = {
            let store = ProfileStore::new(kv.clone());
            store.create("ada", dob(), vec!["jazz".to_string()], true).id
        };

        let reloaded = ProfileStore::new(kv);
        assert_eq!(reloaded.get(id).unwrap().name, "ada");
    }

    #[test]
    fn corrupt_snapshot_loads_as_empty_collection() {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        kv.set(SAVED_PROFILES_KEY, b"\xff\xfe not json").unwrap();

        let store = ProfileStore::new(kv);
        assert!(store.all().is_empty());
    }
}
