//! Format rules for usernames and passwords.

use once_cell::sync::Lazy;
use regex::Regex;

/// Username rule enforced by the registration server.
pub const DEFAULT_USERNAME_PATTERN: &str = r"^[A-Za-z0-9]{3,32}$";

/// Password rule enforced by the registration server.
pub const DEFAULT_PASSWORD_PATTERN: &str = r"(?s)^.{8,255}$";

static DEFAULT_USERNAME_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_USERNAME_PATTERN).expect("default username rule compiles"));

static DEFAULT_PASSWORD_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(DEFAULT_PASSWORD_PATTERN).expect("default password rule compiles"));

/// Client-side format predicates consulted before any request is sent.
pub trait ValidationRules: Send + Sync {
    fn is_valid_username(&self, username: &str) -> bool;
    fn is_valid_password(&self, password: &str) -> bool;
}

/// Regex backed rules.
#[derive(Debug, Clone)]
pub struct RegexRules {
    username: Regex,
    password: Regex,
}

impl RegexRules {
    pub fn new(username_pattern: &str, password_pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            username: Regex::new(username_pattern)?,
            password: Regex::new(password_pattern)?,
        })
    }
}

impl Default for RegexRules {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME_RULE.clone(),
            password: DEFAULT_PASSWORD_RULE.clone(),
        }
    }
}

impl ValidationRules for RegexRules {
    fn is_valid_username(&self, username: &str) -> bool {
        self.username.is_match(username)
    }

    fn is_valid_password(&self, password: &str) -> bool {
        self.password.is_match(password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_username_rule() {
        let rules = RegexRules::default();
        assert!(rules.is_valid_username("alice"));
        assert!(rules.is_valid_username("abc"));
        assert!(rules.is_valid_username(&"a".repeat(32)));
        assert!(!rules.is_valid_username("ab"));
        assert!(!rules.is_valid_username(&"a".repeat(33)));
        assert!(!rules.is_valid_username("alice smith"));
        assert!(!rules.is_valid_username("alice\n"));
        assert!(!rules.is_valid_username(""));
    }

    #[test]
    fn test_default_password_rule() {
        let rules = RegexRules::default();
        assert!(rules.is_valid_password("Secret123"));
        assert!(rules.is_valid_password("test1234"));
        assert!(rules.is_valid_password("with\nnewline"));
        assert!(!rules.is_valid_password("123"));
        assert!(!rules.is_valid_password("1234567"));
        assert!(!rules.is_valid_password(&"x".repeat(256)));
    }

    #[test]
    fn test_custom_patterns() {
        let rules = RegexRules::new("^[a-z]+$", "^.{4,}$").unwrap();
        assert!(rules.is_valid_username("bob"));
        assert!(!rules.is_valid_username("Bob"));
        assert!(rules.is_valid_password("abcd"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(RegexRules::new("(", "^.+$").is_err());
    }
}
