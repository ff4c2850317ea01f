use authentication_error::AuthenticationError;
use common::{LoginPayload, LogoutResult, SessionResult};
use credential_provider::CredentialProvider;
use log::{debug, error, warn};

pub mod authentication_error;
pub mod common;
pub mod credential_provider;
pub use credential_provider::{Credentials, EnvCredentialProvider};

use super::common::{
    http_client_factory::{http_client_factory, AuthenticatedHttpClientFactory},
    transport::{TransientNetworkError, VwsResponse, VwsResponseError},
};

pub struct Authenticator {
    console_url: String,
    timeout: u64,
    credentials: Box<dyn CredentialProvider>,
}

impl Authenticator {
    pub fn new(console_url: String, timeout: u64, credentials: Box<dyn CredentialProvider>) -> Self {
        Self {
            console_url,
            timeout,
            credentials,
        }
    }

    /// Logs in to the console and primes a client factory with the
    /// session token.
    ///
    /// # Errors
    ///
    /// `AuthenticationError` when the console rejects the credentials,
    /// `TransientNetworkError` when the console cannot be reached. The
    /// caller decides whether a transient failure is worth retrying.
    pub async fn login(
        &self,
    ) -> Result<AuthenticatedHttpClientFactory, Box<dyn std::error::Error + Send + Sync>> {
        debug!("logging in");

        let credentials = self.credentials.get().await?;

        let client = http_client_factory(self.timeout).unwrap();

        let payload = LoginPayload::new(credentials.email_address, credentials.password);

        let resp = match client
            .post(format!("{}vui/auth/login", self.console_url))
            .json(&payload)
            .send()
            .await
        {
            Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
            Ok(r) => r,
        };

        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Box::new(AuthenticationError::new(
                "the console rejected the credentials".to_string(),
            )));
        }

        let body = match resp.text().await {
            Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
            Ok(t) => t,
        };

        let res = match serde_json::from_str::<VwsResponse<SessionResult>>(&body) {
            Err(e) => return Err(Box::new(e)),
            Ok(r) => r,
        };

        if !res.success.unwrap_or(false) {
            error!("{}", res.message.clone().unwrap_or_default());
            return Err(Box::new(AuthenticationError::new(
                res.message
                    .unwrap_or_else(|| "the console rejected the credentials".to_string()),
            )));
        }

        if res.result.is_none() {
            return Err(Box::new(VwsResponseError::new(
                "vui/auth/login response was empty".to_string(),
            )));
        }

        match res.result.unwrap().session_token {
            Some(t) => Ok(AuthenticatedHttpClientFactory::new(
                self.console_url.clone(),
                t,
                self.timeout,
            )),
            None => Err(Box::new(AuthenticationError::new(
                "cannot get session token".to_string(),
            ))),
        }
    }

    /// Releases the session held by the factory.
    pub async fn logout(
        &self,
        factory: &AuthenticatedHttpClientFactory,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        debug!("logging out");

        let client = factory.create_client()?;

        let resp = match client
            .post(format!("{}vui/auth/logout", self.console_url))
            .send()
            .await
        {
            Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
            Ok(r) => r,
        };

        let body = match resp.text().await {
            Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
            Ok(b) => b,
        };

        let res = match serde_json::from_str::<VwsResponse<LogoutResult>>(&body) {
            Err(e) => return Err(Box::new(e)),
            Ok(r) => r,
        };

        if !res.success.unwrap_or(false) {
            warn!("{}", res.message.clone().unwrap_or_default());
            return Err(Box::new(VwsResponseError::new(
                "vui/auth/logout response was not success".to_string(),
            )));
        }

        Ok(())
    }
}
