use super::Profile;

/// Gate deciding whether a user may operate on a profile's playlists and
/// queue. Pin verification is a plain string comparison with no hashing,
/// rate limiting or lockout; the pin protects profile switching on a shared
/// device, it is not an account credential.
pub struct ProfileAuthGate;

impl ProfileAuthGate {
    /// True iff the entered pin exactly equals the stored pin, including
    /// the empty-string "pin removed" sentinel. A profile that never had a
    /// pin verifies against nothing.
    pub fn verify_pin(profile: &Profile, entered_pin: &str) -> bool {
        profile.user_pin.as_deref() == Some(entered_pin)
    }

    /// Whether the profile currently has an active (non-empty) pin.
    pub fn has_pin(profile: &Profile) -> bool {
        matches!(profile.user_pin.as_deref(), Some(pin) if !pin.is_empty())
    }

    /// Recovery path: checks the security-question answer, ignoring case
    /// and surrounding whitespace.
    pub fn verify_security_answer(profile: &Profile, answer: &str) -> bool {
        profile
            .security_question_answer
            .as_deref()
            .map(|stored| stored.trim().eq_ignore_ascii_case(answer.trim()))
            .unwrap_or(false)
    }

    /// Whether the gate allows access to the profile: either no active pin,
    /// or the entered pin matches.
    pub fn allows(profile: &Profile, entered_pin: &str) -> bool {
        !Self::has_pin(profile) || Self::verify_pin(profile, entered_pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn profile_with_pin(pin: Option<&str>) -> Profile {
        let mut profile = Profile::new(
            "ada",
            NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            vec![],
            true,
        );
        profile.user_pin = pin.map(|p| p.to_string());
        profile
    }

    #[test]
    fn verify_pin_requires_exact_equality() {
        let profile = profile_with_pin(Some("1234"));

        assert!(ProfileAuthGate::verify_pin(&profile, "1234"));
        assert!(!ProfileAuthGate::verify_pin(&profile, "12345"));
        assert!(!ProfileAuthGate::verify_pin(&profile, "123"));
        assert!(!ProfileAuthGate::verify_pin(&profile, ""));
    }

    #[test]
    fn empty_pin_sentinel_verifies_against_empty_input() {
        let profile = profile_with_pin(Some(""));

        assert!(ProfileAuthGate::verify_pin(&profile, ""));
        assert!(!ProfileAuthGate::verify_pin(&profile, "1234"));
    }

    #[test]
    fn absent_pin_never_verifies() {
        let profile = profile_with_pin(None);

        assert!(!ProfileAuthGate::verify_pin(&profile, ""));
        assert!(!ProfileAuthGate::verify_pin(&profile, "1234"));
    }

    #[test]
    fn has_pin_distinguishes_removed_from_active() {
        assert!(ProfileAuthGate::has_pin(&profile_with_pin(Some("1234"))));
        assert!(!ProfileAuthGate::has_pin(&profile_with_pin(Some(""))));
        assert!(!ProfileAuthGate::has_pin(&profile_with_pin(None)));
    }

    #[test]
    fn allows_without_active_pin() {
        assert!(ProfileAuthGate::allows(&profile_with_pin(None), ""));
        assert!(ProfileAuthGate::allows(&profile_with_pin(Some("")), ""));
        assert!(!ProfileAuthGate::allows(&profile_with_pin(Some("1234")), ""));
        assert!(ProfileAuthGate::allows(
            &profile_with_pin(Some("1234")),
            "1234"
        ));
    }

    #[test]
    fn security_answer_ignores_case_and_whitespace() {
        let mut profile = profile_with_pin(Some("1234"));
        profile.security_question_answer = Some("Rex".to_string());

        assert!(ProfileAuthGate::verify_security_answer(&profile, "rex"));
        assert!(ProfileAuthGate::verify_security_answer(&profile, "  REX "));
        assert!(!ProfileAuthGate::verify_security_answer(&profile, "felix"));
    }

    #[test]
    fn missing_security_answer_never_verifies() {
        let profile = profile_with_pin(None);
        assert!(!ProfileAuthGate::verify_security_answer(&profile, ""));
    }
}
