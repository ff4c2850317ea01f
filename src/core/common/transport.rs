use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Response envelope wrapping every payload returned by the console.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct VwsResponse<T: Clone> {
    pub message: Option<String>,
    pub success: Option<bool>,
    pub error_code: Option<String>,
    pub result: Option<T>,
}

/*
auth_required       Invalid session token, or no session token sent
invalid_credentials The email address / password pair was rejected
duplicate_name      A license or database with this name already exists
quota_exceeded      The account reached its license or database quota
not_found           The requested license, database or target does not exist
invalid_request     The request payload is malformed
internal_error      Internal error
 */

pub const AUTH_REQUIRED_ERROR_CODE: &str = "auth_required";

/// Unwraps an envelope into its result payload, translating console
/// rejections into the matching error kind.
pub fn into_result<T: Clone>(
    res: VwsResponse<T>,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>> {
    if !res.success.unwrap_or(false) {
        if res.error_code.as_deref() == Some(AUTH_REQUIRED_ERROR_CODE) {
            return Err(Box::new(SessionExpiredError::new(
                res.message
                    .unwrap_or_else(|| "session is no longer accepted".to_string()),
            )));
        }

        return Err(Box::new(VendorSiteError::new(
            res.message
                .unwrap_or_else(|| format!("{context} was rejected")),
        )));
    }

    match res.result {
        Some(r) => Ok(r),
        None => Err(Box::new(VwsResponseError::new(format!(
            "{context} response was empty"
        )))),
    }
}

/// Reads a console response body down to its result payload.
///
/// Status and envelope checks happen here so every action parses the
/// console's pages in one place only.
pub async fn read_result<T>(
    resp: reqwest::Response,
    context: &str,
) -> Result<T, Box<dyn std::error::Error + Send + Sync>>
where
    T: serde::de::DeserializeOwned + Clone,
{
    if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Box::new(SessionExpiredError::new(format!(
            "{context} no longer accepts the session"
        ))));
    }

    let body = match resp.text().await {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(b) => b,
    };

    let res = match serde_json::from_str::<VwsResponse<T>>(&body) {
        Err(e) => return Err(Box::new(e)),
        Ok(r) => r,
    };

    into_result(res, context)
}

/// The envelope was present but unusable, missing its result payload.
#[derive(Debug)]
pub struct VwsResponseError {
    pub reason: String,
}

impl VwsResponseError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for VwsResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for VwsResponseError {}

/// The console refused the action, message scraped from the envelope.
#[derive(Debug)]
pub struct VendorSiteError {
    pub reason: String,
}

impl VendorSiteError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for VendorSiteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for VendorSiteError {}

/// The session token stopped being accepted mid-sequence, the caller has
/// to authenticate again.
#[derive(Debug)]
pub struct SessionExpiredError {
    pub reason: String,
}

impl SessionExpiredError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for SessionExpiredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for SessionExpiredError {}

/// Connectivity failure, left to the caller to retry.
#[derive(Debug)]
pub struct TransientNetworkError {
    pub reason: String,
}

impl TransientNetworkError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl From<reqwest::Error> for TransientNetworkError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl Display for TransientNetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for TransientNetworkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_result_returns_payload_on_success() {
        let res = VwsResponse::<String> {
            message: None,
            success: Some(true),
            error_code: None,
            result: Some("payload".to_string()),
        };

        let value = into_result(res, "vui/develop/licenses").unwrap();

        assert_eq!("payload", value);
    }

    #[test]
    fn into_result_maps_rejection_to_vendor_site_error() {
        let res = VwsResponse::<String> {
            message: Some("license name already exists".to_string()),
            success: Some(false),
            error_code: Some("duplicate_name".to_string()),
            result: None,
        };

        let err = into_result(res, "vui/develop/licenses").unwrap_err();

        let vendor = err.downcast_ref::<VendorSiteError>().unwrap();
        assert_eq!("license name already exists", vendor.reason);
    }

    #[test]
    fn into_result_maps_auth_required_to_session_expired() {
        let res = VwsResponse::<String> {
            message: None,
            success: Some(false),
            error_code: Some(AUTH_REQUIRED_ERROR_CODE.to_string()),
            result: None,
        };

        let err = into_result(res, "vui/develop/databases").unwrap_err();

        assert!(err.downcast_ref::<SessionExpiredError>().is_some());
    }

    #[test]
    fn into_result_flags_empty_result() {
        let res = VwsResponse::<String> {
            message: None,
            success: Some(true),
            error_code: None,
            result: None,
        };

        let err = into_result(res, "vui/develop/databases").unwrap_err();

        assert!(err.downcast_ref::<VwsResponseError>().is_some());
    }
}
