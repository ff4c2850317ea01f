use std::time::Duration;

use log::debug;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
};

/// Header carrying the session token on every authenticated request.
pub const VWS_SESSION_HEADER: &str = "X-Vws-Session-Token";

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Builds the anonymous client used before a session exists.
pub fn http_client_factory(timeout: u64) -> Result<Client, ()> {
    debug!("creating HTTP client");

    let client = reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(timeout))
        .user_agent(APP_USER_AGENT)
        .build()
        .expect("cannot create HTTP Client");
    Ok(client)
}

/// Hands out HTTP clients bound to one authenticated console session.
///
/// The factory owns the session token for exactly one facade invocation;
/// it is dropped, after logout, when that invocation ends.
#[derive(Clone, Debug)]
pub struct AuthenticatedHttpClientFactory {
    pub console_url: String,
    session_token: String,
    timeout: u64,
}

impl AuthenticatedHttpClientFactory {
    pub fn new(console_url: String, session_token: String, timeout: u64) -> Self {
        Self {
            console_url,
            session_token,
            timeout,
        }
    }

    /// Creates a client with the session header attached.
    ///
    /// # Errors
    ///
    /// This function will return an error if the session token cannot be
    /// used as a header value.
    pub fn create_client(&self) -> Result<Client, Box<dyn std::error::Error + Send + Sync>> {
        debug!("creating authenticated HTTP client");

        let mut headers = HeaderMap::new();

        let value = match HeaderValue::from_str(self.session_token.as_str()) {
            Err(e) => return Err(Box::new(e)),
            Ok(v) => v,
        };

        headers.append(VWS_SESSION_HEADER, value);

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_secs(self.timeout))
            .user_agent(APP_USER_AGENT)
            .build()
            .expect("cannot create HTTP Client");

        Ok(client)
    }
}
