//! Server-issued credentials.
//!
//! Both values are opaque: the wizard stores them and echoes them back on
//! the next request, nothing else.

use serde::{Deserialize, Serialize};

macro_rules! impl_credential {
    ($($name:ident),* $(,)?) => {
        $(
            impl $name {
                pub fn new(value: impl Into<String>) -> Self {
                    Self(value.into())
                }

                /// The verbatim value, for relaying to the server.
                pub fn expose(&self) -> &str {
                    &self.0
                }
            }

            impl std::fmt::Debug for $name {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    write!(f, "{}([REDACTED])", stringify!($name))
                }
            }

            impl From<&str> for $name {
                fn from(s: &str) -> Self {
                    Self(s.to_string())
                }
            }

            impl From<String> for $name {
                fn from(s: String) -> Self {
                    Self(s)
                }
            }
        )*
    };
}

/// Token proving continuity of one registration attempt.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

/// Correlation key, rotated by the server on every step.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegistrationKey(String);

impl_credential!(Token, RegistrationKey);

/// The pair that has to accompany every request after the first one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: Token,
    pub registration_key: RegistrationKey,
}

impl Credentials {
    pub fn new(token: impl Into<Token>, registration_key: impl Into<RegistrationKey>) -> Self {
        Self {
            token: token.into(),
            registration_key: registration_key.into(),
        }
    }

    /// Overwrite with whatever the server re-issued. A value the server left
    /// out keeps its previous content.
    pub fn rotate(&mut self, token: Option<Token>, registration_key: Option<RegistrationKey>) {
        if let Some(token) = token {
            self.token = token;
        }
        if let Some(registration_key) = registration_key {
            self.registration_key = registration_key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_is_redacted() {
        let credentials = Credentials::new("t1", "k1");
        let debug = format!("{:?}", credentials);
        assert!(!debug.contains("t1"));
        assert!(!debug.contains("k1"));
        assert!(debug.contains("Token([REDACTED])"));
    }

    #[test]
    fn test_rotate_overwrites_present_values_only() {
        let mut credentials = Credentials::new("t1", "k1");
        credentials.rotate(Some("t2".into()), None);
        assert_eq!(credentials.token.expose(), "t2");
        assert_eq!(credentials.registration_key.expose(), "k1");

        credentials.rotate(None, Some("k3".into()));
        assert_eq!(credentials, Credentials::new("t2", "k3"));
    }
}
