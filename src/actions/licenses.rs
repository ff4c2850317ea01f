use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::common::{
    http_client_factory::AuthenticatedHttpClientFactory,
    transport::{read_result, TransientNetworkError},
};

#[derive(Serialize, Debug)]
struct CreateLicensePayload {
    license_name: String,
}

impl CreateLicensePayload {
    fn new(license_name: String) -> Self {
        CreateLicensePayload { license_name }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LicenseSummary {
    pub license_id: String,
    pub license_name: String,
}

/// Creates a license on the console and echoes back its summary row.
pub async fn create_license(
    factory: &AuthenticatedHttpClientFactory,
    license_name: &str,
) -> Result<LicenseSummary, Box<dyn std::error::Error + Send + Sync>> {
    debug!("creating license {license_name}");

    let client = factory.create_client()?;

    let payload = CreateLicensePayload::new(license_name.to_string());

    let resp = match client
        .post(format!("{}vui/develop/licenses", factory.console_url))
        .json(&payload)
        .send()
        .await
    {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(r) => r,
    };

    read_result::<LicenseSummary>(resp, "vui/develop/licenses").await
}
