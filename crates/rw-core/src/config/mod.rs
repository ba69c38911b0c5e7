//! Configuration data.
//!
//! `from_toml` maps whatever the file contains, missing keys become empty
//! values. Defaults are filled in separately by `with_defaults`, so a loader
//! never has to guess.

use crate::registration::rules::{DEFAULT_PASSWORD_PATTERN, DEFAULT_USERNAME_PATTERN};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1.0/registration";
pub const DEFAULT_PASSWORD_FORM: &str = "dialogs/registration_passwords.xhtml";

/// Wizard configuration DTO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardConfig {
    /// Scheme, host and port of the registration server.
    pub api_base_url: String,

    /// Path prefix the three registration endpoints live under.
    pub api_prefix: String,

    /// Request timeout in seconds, 0 disables it.
    pub timeout_secs: u64,

    pub username_pattern: String,

    pub password_pattern: String,

    /// Template the dialog host loads for the password fields.
    pub password_form: String,
}

impl WizardConfig {
    /// Create WizardConfig from a TOML value. No validation, no defaults.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        let get_str = |section: &str, key: &str| -> String {
            toml_value
                .get(section)
                .and_then(|s| s.get(key))
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string()
        };

        let timeout_secs = toml_value
            .get("api")
            .and_then(|a| a.get("timeout_secs"))
            .and_then(|v| v.as_integer())
            .unwrap_or(0);

        Ok(Self {
            api_base_url: get_str("api", "base_url"),
            api_prefix: get_str("api", "prefix"),
            timeout_secs: u64::try_from(timeout_secs).unwrap_or(0),
            username_pattern: get_str("rules", "username_pattern"),
            password_pattern: get_str("rules", "password_pattern"),
            password_form: get_str("dialog", "password_form"),
        })
    }

    /// All fields empty.
    pub fn empty() -> Self {
        Self {
            api_base_url: String::new(),
            api_prefix: String::new(),
            timeout_secs: 0,
            username_pattern: String::new(),
            password_pattern: String::new(),
            password_form: String::new(),
        }
    }

    /// Replace empty fields with the built-in defaults.
    pub fn with_defaults(mut self) -> Self {
        let fill = |value: &mut String, default: &str| {
            if value.is_empty() {
                *value = default.to_string();
            }
        };
        fill(&mut self.api_base_url, DEFAULT_API_BASE_URL);
        fill(&mut self.api_prefix, DEFAULT_API_PREFIX);
        fill(&mut self.username_pattern, DEFAULT_USERNAME_PATTERN);
        fill(&mut self.password_pattern, DEFAULT_PASSWORD_PATTERN);
        fill(&mut self.password_form, DEFAULT_PASSWORD_FORM);
        self
    }

    /// Full URL of one registration endpoint.
    pub fn endpoint(&self, name: &str) -> String {
        format!(
            "{}/{}/{}",
            self.api_base_url.trim_end_matches('/'),
            self.api_prefix.trim_matches('/'),
            name
        )
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self::empty().with_defaults()
    }
}
