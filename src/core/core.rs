use log::warn;

use crate::actions::{
    self,
    databases::models::{DatabaseDetails, DatabaseSummary},
    licenses::LicenseSummary,
    ActionRequest, ActionResult,
};

use super::{
    authenticator::{credential_provider::CredentialProvider, Authenticator},
    common::transport::VwsResponseError,
    configuration::Configuration,
};

/// ### Run one action against the console
/// This function logs in with the supplied credentials, performs the
/// requested action and releases the session.
/// ### Arguments
/// * `conf` - The configuration object
/// * `credentials` - The credential provider used for the login
/// * `request` - The action to perform
/// ### Returns
/// * `Result<ActionResult, Box<dyn std::error::Error + Send + Sync>>` - The structured action result
/// ### Notes
/// * Parameters are validated before any network call
/// * The session is used for this one call only and is logged out on
///   both the success and the failure path
/// * Nothing is retried, the caller decides what to do with transient
///   failures
pub async fn run(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    request: ActionRequest,
) -> Result<ActionResult, Box<dyn std::error::Error + Send + Sync>> {
    request.validate()?;

    let authenticator = Authenticator::new(conf.console_url(), conf.timeout(), credentials);

    let factory = authenticator.login().await?;

    let result = actions::execute(&factory, conf, &request).await;

    // the action outcome wins over a logout hiccup, the session expires
    // on its own anyway
    if let Err(e) = authenticator.logout(&factory).await {
        warn!("logout failed: {e}");
    }

    result
}

/// Creates a license, see the `create-vws-license` command.
pub async fn create_vws_license(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    license_name: &str,
) -> Result<LicenseSummary, Box<dyn std::error::Error + Send + Sync>> {
    let request = ActionRequest::CreateLicense {
        license_name: license_name.to_string(),
    };

    match run(conf, credentials, request).await? {
        ActionResult::License(license) => Ok(license),
        _ => Err(Box::new(VwsResponseError::new(
            "unexpected action result kind".to_string(),
        ))),
    }
}

/// Creates a cloud database, see the `create-vws-cloud-database` command.
pub async fn create_vws_cloud_database(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    license_name: &str,
    database_name: &str,
) -> Result<DatabaseSummary, Box<dyn std::error::Error + Send + Sync>> {
    let request = ActionRequest::CreateCloudDatabase {
        license_name: license_name.to_string(),
        database_name: database_name.to_string(),
    };

    match run(conf, credentials, request).await? {
        ActionResult::Database(database) => Ok(database),
        _ => Err(Box::new(VwsResponseError::new(
            "unexpected action result kind".to_string(),
        ))),
    }
}

/// Creates a VuMark database, see the `create-vws-vumark-database`
/// command.
pub async fn create_vws_vumark_database(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    database_name: &str,
) -> Result<DatabaseSummary, Box<dyn std::error::Error + Send + Sync>> {
    let request = ActionRequest::CreateVuMarkDatabase {
        database_name: database_name.to_string(),
    };

    match run(conf, credentials, request).await? {
        ActionResult::Database(database) => Ok(database),
        _ => Err(Box::new(VwsResponseError::new(
            "unexpected action result kind".to_string(),
        ))),
    }
}

/// Fetches a database's access keys, see the `show-database-details`
/// command.
pub async fn show_database_details(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    database_name: &str,
) -> Result<DatabaseDetails, Box<dyn std::error::Error + Send + Sync>> {
    let request = ActionRequest::ShowDatabaseDetails {
        database_name: database_name.to_string(),
    };

    match run(conf, credentials, request).await? {
        ActionResult::DatabaseDetails(details) => Ok(details),
        _ => Err(Box::new(VwsResponseError::new(
            "unexpected action result kind".to_string(),
        ))),
    }
}

/// Looks up a VuMark target id, see the `get-vumark-target-id` command.
pub async fn get_vumark_target_id(
    conf: &Configuration,
    credentials: Box<dyn CredentialProvider>,
    database_name: &str,
    target_name: &str,
    wait: Option<u64>,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let request = ActionRequest::GetVuMarkTargetId {
        database_name: database_name.to_string(),
        target_name: target_name.to_string(),
        wait,
    };

    match run(conf, credentials, request).await? {
        ActionResult::TargetId(target_id) => Ok(target_id),
        _ => Err(Box::new(VwsResponseError::new(
            "unexpected action result kind".to_string(),
        ))),
    }
}
