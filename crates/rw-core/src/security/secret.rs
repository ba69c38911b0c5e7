use std::fmt;
use std::ops::Deref;

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A password that must never be logged, cloned, or serialized.
///
/// - not `Clone`
/// - no `Serialize` / `Deserialize`
/// - `Debug` / `Display` print `[REDACTED]`
/// - equality is constant time
/// - zeroed on drop
#[derive(Default)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// Borrow the inner secret as &str.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Copy the secret into a fresh `SecretString`.
    ///
    /// Explicit on purpose: the type is not `Clone`.
    pub fn duplicate(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.inner.as_bytes().ct_eq(other.inner.as_bytes()).into()
    }
}

impl Eq for SecretString {}

impl Deref for SecretString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.expose()
    }
}

impl From<&str> for SecretString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Drop for SecretString {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_redacted() {
        let secret = SecretString::new("Secret123");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "Secret123");
    }

    #[test]
    fn test_secret_equality() {
        assert_eq!(SecretString::new("Secret123"), SecretString::new("Secret123"));
        assert_ne!(SecretString::new("Secret123"), SecretString::new("Secret1234"));
        assert_ne!(SecretString::new("Secret123"), SecretString::new("Different1"));
    }
}
