use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rw_core::config::WizardConfig;
use rw_core::ports::{RegistrationApiError, RegistrationApiPort};
use rw_core::registration::{PasswordReply, ServerError, UsernameReply};
use rw_core::{Credentials, RegistrationKey, SecretString, Token};

const JSON_UTF8: &str = "application/json; charset=utf-8";

#[derive(Debug, Deserialize)]
struct PrepareResponse {
    token: Token,
    registration_key: RegistrationKey,
}

#[derive(Serialize)]
struct ChooseUsernameRequest<'a> {
    username: &'a str,
    registration_key: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChooseUsernameResponse {
    token: Option<Token>,
    registration_key: Option<RegistrationKey>,
    username_message: Option<String>,
    error: Option<WireError>,
}

#[derive(Serialize)]
struct SetPasswordRequest<'a> {
    password: &'a str,
    registration_key: &'a str,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct SetPasswordResponse {
    error: Option<WireError>,
}

#[derive(Debug, Deserialize)]
struct WireError {
    code: i64,
    message: String,
}

impl From<WireError> for ServerError {
    fn from(error: WireError) -> Self {
        ServerError {
            code: error.code,
            message: error.message,
        }
    }
}

/// Registration API client talking JSON over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRegistrationApi {
    http: reqwest::Client,
    prepare_url: String,
    choose_username_url: String,
    set_password_url: String,
}

impl HttpRegistrationApi {
    pub fn new(config: &WizardConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }
        let http = builder
            .build()
            .context("Failed to build registration HTTP client")?;

        Ok(Self {
            http,
            prepare_url: config.endpoint("prepare"),
            choose_username_url: config.endpoint("choose_username"),
            set_password_url: config.endpoint("set_password"),
        })
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, RegistrationApiError> {
        let payload =
            serde_json::to_vec(body).map_err(|e| RegistrationApiError::Decode(e.to_string()))?;
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_UTF8)
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> RegistrationApiError {
    if err.is_timeout() {
        RegistrationApiError::Timeout
    } else {
        RegistrationApiError::Transport(err.to_string())
    }
}

async fn read_json<R: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<R, RegistrationApiError> {
    let status = response.status();
    if !status.is_success() {
        warn!(url = %response.url(), status = status.as_u16(), "registration endpoint returned an error status");
        return Err(RegistrationApiError::Status {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|e| RegistrationApiError::Decode(e.to_string()))
}

#[async_trait]
impl RegistrationApiPort for HttpRegistrationApi {
    async fn prepare(&self) -> Result<Credentials, RegistrationApiError> {
        debug!(url = %self.prepare_url, "requesting registration token");
        let response = self
            .http
            .get(&self.prepare_url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body: PrepareResponse = read_json(response).await?;
        Ok(Credentials::new(body.token, body.registration_key))
    }

    async fn choose_username(
        &self,
        username: &str,
        credentials: &Credentials,
    ) -> Result<UsernameReply, RegistrationApiError> {
        debug!(url = %self.choose_username_url, username, "checking username");
        let body: ChooseUsernameResponse = self
            .post_json(
                &self.choose_username_url,
                &ChooseUsernameRequest {
                    username,
                    registration_key: credentials.registration_key.expose(),
                    token: credentials.token.expose(),
                },
            )
            .await?;
        Ok(UsernameReply {
            token: body.token,
            registration_key: body.registration_key,
            username_message: body.username_message,
            error: body.error.map(ServerError::from),
        })
    }

    async fn set_password(
        &self,
        password: &SecretString,
        credentials: &Credentials,
    ) -> Result<PasswordReply, RegistrationApiError> {
        debug!(url = %self.set_password_url, "setting password");
        let body: SetPasswordResponse = self
            .post_json(
                &self.set_password_url,
                &SetPasswordRequest {
                    password: password.expose(),
                    registration_key: credentials.registration_key.expose(),
                    token: credentials.token.expose(),
                },
            )
            .await?;
        Ok(PasswordReply {
            error: body.error.map(ServerError::from),
        })
    }
}
