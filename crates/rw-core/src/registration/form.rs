use serde::{Deserialize, Serialize};

use crate::security::SecretString;

/// Input fields of the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FormField {
    Username,
    /// New password.
    Password1,
    /// Password confirmation.
    Password2,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Username, FormField::Password1, FormField::Password2];

    pub fn is_password(self) -> bool {
        matches!(self, FormField::Password1 | FormField::Password2)
    }

    /// Stable identifier used by hosts to address the field.
    pub fn id(self) -> &'static str {
        match self {
            FormField::Username => "registration_username",
            FormField::Password1 => "registration_password1",
            FormField::Password2 => "registration_password2",
        }
    }
}

/// Snapshot of the field contents at submit time.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FormValues {
    pub username: String,
    pub password1: SecretString,
    pub password2: SecretString,
}

impl FormValues {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    pub fn with_passwords(password1: &str, password2: &str) -> Self {
        Self {
            username: String::new(),
            password1: SecretString::new(password1),
            password2: SecretString::new(password2),
        }
    }
}
