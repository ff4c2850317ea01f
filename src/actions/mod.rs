use std::fmt::Display;

use serde::Serialize;

use crate::core::{
    common::http_client_factory::AuthenticatedHttpClientFactory, configuration::Configuration,
};

pub mod databases;
pub mod licenses;
pub mod targets;

use databases::models::{DatabaseDetails, DatabaseSummary};
use licenses::LicenseSummary;

/// One bounded administrative operation against the console.
#[derive(Clone, Debug)]
pub enum ActionRequest {
    CreateLicense {
        license_name: String,
    },
    CreateCloudDatabase {
        license_name: String,
        database_name: String,
    },
    CreateVuMarkDatabase {
        database_name: String,
    },
    ShowDatabaseDetails {
        database_name: String,
    },
    GetVuMarkTargetId {
        database_name: String,
        target_name: String,
        /// seconds to wait for the target to finish processing
        wait: Option<u64>,
    },
}

impl ActionRequest {
    /// Rejects blank parameters before any request goes out.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        match self {
            ActionRequest::CreateLicense { license_name } => {
                ensure_not_blank(license_name, "license name")
            }
            ActionRequest::CreateCloudDatabase {
                license_name,
                database_name,
            } => {
                ensure_not_blank(license_name, "license name")?;
                ensure_not_blank(database_name, "database name")
            }
            ActionRequest::CreateVuMarkDatabase { database_name } => {
                ensure_not_blank(database_name, "database name")
            }
            ActionRequest::ShowDatabaseDetails { database_name } => {
                ensure_not_blank(database_name, "database name")
            }
            ActionRequest::GetVuMarkTargetId {
                database_name,
                target_name,
                ..
            } => {
                ensure_not_blank(database_name, "database name")?;
                ensure_not_blank(target_name, "target name")
            }
        }
    }
}

fn ensure_not_blank(
    value: &str,
    what: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if value.trim().is_empty() {
        return Err(Box::new(InvalidParameterError::new(format!(
            "{what} must not be empty"
        ))));
    }

    Ok(())
}

/// Structured data scraped from the console's response, shaped by the
/// request that produced it.
#[derive(Serialize, Clone, Debug)]
#[serde(untagged)]
pub enum ActionResult {
    License(LicenseSummary),
    Database(DatabaseSummary),
    DatabaseDetails(DatabaseDetails),
    TargetId(String),
}

/// Performs one action with the given authenticated session.
///
/// Each call is a single attempt; transient failures surface to the
/// caller instead of being retried here.
pub async fn execute(
    factory: &AuthenticatedHttpClientFactory,
    conf: &Configuration,
    request: &ActionRequest,
) -> Result<ActionResult, Box<dyn std::error::Error + Send + Sync>> {
    request.validate()?;

    match request {
        ActionRequest::CreateLicense { license_name } => Ok(ActionResult::License(
            licenses::create_license(factory, license_name).await?,
        )),
        ActionRequest::CreateCloudDatabase {
            license_name,
            database_name,
        } => Ok(ActionResult::Database(
            databases::create_cloud_database(factory, database_name, license_name).await?,
        )),
        ActionRequest::CreateVuMarkDatabase { database_name } => Ok(ActionResult::Database(
            databases::create_vumark_database(factory, database_name).await?,
        )),
        ActionRequest::ShowDatabaseDetails { database_name } => Ok(ActionResult::DatabaseDetails(
            databases::get_database_details(factory, database_name).await?,
        )),
        ActionRequest::GetVuMarkTargetId {
            database_name,
            target_name,
            wait,
        } => {
            if let Some(timeout) = wait {
                targets::wait_for_vumark_target_link(
                    factory,
                    database_name,
                    target_name,
                    conf.refresh(),
                    *timeout,
                )
                .await?;
            }

            Ok(ActionResult::TargetId(
                targets::get_vumark_target_id(factory, database_name, target_name).await?,
            ))
        }
    }
}

/// An action parameter failed validation before any network call.
#[derive(Debug)]
pub struct InvalidParameterError {
    reason: String,
}

impl InvalidParameterError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for InvalidParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for InvalidParameterError {}
