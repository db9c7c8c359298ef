// User profile and onboarding.
// Validates form fields and persists the profile blob and onboarding flag in preferences.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::Preferences;
use crate::error::{LemonError, Result};

pub const ONBOARDING_KEY: &str = "@onboarding_complete";
pub const PROFILE_KEY: &str = "profileData";

static FIRST_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid first name regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(\d{3}\) \d{3}-\d{4}$").expect("valid phone regex"));

/// Email notification preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    #[serde(default)]
    pub promotions: bool,
    #[serde(default)]
    pub updates: bool,
}

/// Profile blob stored under `profileData`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    /// Avatar image URI, if one was chosen.
    pub avatar: Option<String>,
    pub notifications: NotificationPrefs,
}

impl Profile {
    /// Initials for the avatar placeholder.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|name| name.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Check every field, reporting the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.first_name.trim().is_empty() {
            return Err(LemonError::Validation("First name is required".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(LemonError::Validation(
                "Please enter a valid email address".into(),
            ));
        }
        if !self.phone_number.is_empty() && !is_valid_phone(&self.phone_number) {
            return Err(LemonError::Validation(
                "Please enter a valid phone number".into(),
            ));
        }
        Ok(())
    }
}

pub fn is_valid_first_name(name: &str) -> bool {
    !name.trim().is_empty() && FIRST_NAME_RE.is_match(name)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// US phone number in the form `(123) 456-7890`.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// Format typed input into the `(999) 999-9999` mask, keeping at most ten digits.
pub fn mask_phone(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(char::is_ascii_digit).take(10).collect();
    let mut out = String::new();

    for (i, digit) in digits.iter().enumerate() {
        match i {
            0 => out.push('('),
            3 => out.push_str(") "),
            6 => out.push('-'),
            _ => {}
        }
        out.push(*digit);
    }
    out
}

/// Profile and onboarding state on top of the preferences file.
pub struct ProfileStore {
    prefs: Preferences,
}

impl ProfileStore {
    pub fn new(prefs: Preferences) -> Self {
        Self { prefs }
    }

    pub fn is_onboarded(&self) -> bool {
        self.prefs.get(ONBOARDING_KEY) == Some("true")
    }

    /// Finish onboarding: validate, seed the profile, and set the flag.
    pub fn complete_onboarding(&mut self, first_name: &str, email: &str) -> Result<Profile> {
        if !is_valid_first_name(first_name) {
            return Err(LemonError::Validation(
                "First name must contain only letters and cannot be empty".into(),
            ));
        }
        if !is_valid_email(email) {
            return Err(LemonError::Validation(
                "Please enter a valid email address".into(),
            ));
        }

        let mut profile = self.load_profile()?;
        profile.first_name = first_name.trim().to_string();
        profile.email = email.trim().to_string();

        self.prefs.set_json(PROFILE_KEY, &profile)?;
        self.prefs.set(ONBOARDING_KEY, "true")?;
        info!("Onboarding complete");
        Ok(profile)
    }

    /// Stored profile, or an empty one if nothing was saved yet.
    pub fn load_profile(&self) -> Result<Profile> {
        Ok(self.prefs.get_json(PROFILE_KEY)?.unwrap_or_default())
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<()> {
        profile.validate()?;
        self.prefs.set_json(PROFILE_KEY, profile)?;
        info!("Profile saved");
        Ok(())
    }

    /// Forget everything stored for this user.
    pub fn logout(&mut self) -> Result<()> {
        self.prefs.clear()?;
        info!("Logged out");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> ProfileStore {
        ProfileStore::new(Preferences::open(dir.path().join("prefs.json")).unwrap())
    }

    #[test]
    fn test_validators() {
        assert!(is_valid_first_name("Mary Ann"));
        assert!(!is_valid_first_name("   "));
        assert!(!is_valid_first_name("R2D2"));

        assert!(is_valid_email("tilly@littlelemon.com"));
        assert!(!is_valid_email("tilly@littlelemon"));
        assert!(!is_valid_email("til ly@littlelemon.com"));

        assert!(is_valid_phone("(312) 555-0199"));
        assert!(!is_valid_phone("312-555-0199"));
    }

    #[test]
    fn test_mask_phone() {
        assert_eq!(mask_phone("3"), "(3");
        assert_eq!(mask_phone("3125"), "(312) 5");
        assert_eq!(mask_phone("3125550199"), "(312) 555-0199");
        assert_eq!(mask_phone("(312) 555-01999"), "(312) 555-0199");
        assert!(is_valid_phone(&mask_phone("312 555 0199")));
    }

    #[test]
    fn test_initials() {
        let profile = Profile {
            first_name: "tilly".into(),
            last_name: "Lemon".into(),
            ..Profile::default()
        };
        assert_eq!(profile.initials(), "TL");
        assert_eq!(Profile::default().initials(), "");
    }

    #[test]
    fn test_onboarding_flow() {
        let dir = TempDir::new().unwrap();
        let mut profiles = store(&dir);
        assert!(!profiles.is_onboarded());

        assert!(profiles.complete_onboarding("Tilly", "nope").is_err());
        assert!(!profiles.is_onboarded());

        let profile = profiles
            .complete_onboarding("Tilly", "tilly@littlelemon.com")
            .unwrap();
        assert_eq!(profile.first_name, "Tilly");

        let reopened = store(&dir);
        assert!(reopened.is_onboarded());
        assert_eq!(reopened.load_profile().unwrap().email, "tilly@littlelemon.com");
    }

    #[test]
    fn test_save_profile_validates() {
        let dir = TempDir::new().unwrap();
        let mut profiles = store(&dir);

        let mut profile = Profile {
            first_name: "Tilly".into(),
            email: "tilly@littlelemon.com".into(),
            phone_number: "555".into(),
            ..Profile::default()
        };
        assert!(matches!(
            profiles.save_profile(&profile),
            Err(LemonError::Validation(_))
        ));

        profile.phone_number = "(312) 555-0199".into();
        profile.notifications.promotions = true;
        profiles.save_profile(&profile).unwrap();
        assert_eq!(profiles.load_profile().unwrap(), profile);
    }

    #[test]
    fn test_profile_blob_uses_camel_case() {
        let profile = Profile {
            first_name: "Tilly".into(),
            phone_number: "(312) 555-0199".into(),
            ..Profile::default()
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["firstName"], "Tilly");
        assert_eq!(json["phoneNumber"], "(312) 555-0199");
        assert_eq!(json["notifications"]["promotions"], false);
    }

    #[test]
    fn test_logout_clears_everything() {
        let dir = TempDir::new().unwrap();
        let mut profiles = store(&dir);
        profiles
            .complete_onboarding("Tilly", "tilly@littlelemon.com")
            .unwrap();

        profiles.logout().unwrap();
        assert!(!profiles.is_onboarded());
        assert_eq!(profiles.load_profile().unwrap(), Profile::default());
    }
}
