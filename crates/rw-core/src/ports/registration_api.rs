use thiserror::Error;

use crate::registration::{Credentials, PasswordReply, UsernameReply};
use crate::security::SecretString;

/// Transport-level failures. Business errors travel inside the replies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationApiError {
    #[error("timeout")]
    Timeout,

    #[error("network error: {0}")]
    Transport(String),

    #[error("HTTP {status}")]
    Status { status: u16 },

    #[error("invalid response: {0}")]
    Decode(String),
}

/// Remote registration API.
#[async_trait::async_trait]
pub trait RegistrationApiPort: Send + Sync {
    /// Obtain a token and registration key for a new attempt.
    async fn prepare(&self) -> Result<Credentials, RegistrationApiError>;

    async fn choose_username(
        &self,
        username: &str,
        credentials: &Credentials,
    ) -> Result<UsernameReply, RegistrationApiError>;

    async fn set_password(
        &self,
        password: &SecretString,
        credentials: &Credentials,
    ) -> Result<PasswordReply, RegistrationApiError>;
}
