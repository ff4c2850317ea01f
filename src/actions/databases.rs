use log::debug;
use serde::Serialize;

pub mod models;

use models::{DatabaseDetails, DatabasePage, DatabaseSummary};

use crate::core::common::{
    http_client_factory::AuthenticatedHttpClientFactory,
    transport::{read_result, TransientNetworkError, VendorSiteError},
};

const CLOUD_DATABASE_TYPE: &str = "cloud";
const VUMARK_DATABASE_TYPE: &str = "vumark";

#[derive(Serialize, Debug)]
struct CreateDatabasePayload {
    database_name: String,
    database_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    license_name: Option<String>,
}

impl CreateDatabasePayload {
    fn cloud(database_name: String, license_name: String) -> Self {
        CreateDatabasePayload {
            database_name,
            database_type: CLOUD_DATABASE_TYPE.to_string(),
            license_name: Some(license_name),
        }
    }

    fn vumark(database_name: String) -> Self {
        CreateDatabasePayload {
            database_name,
            database_type: VUMARK_DATABASE_TYPE.to_string(),
            license_name: None,
        }
    }
}

/// Creates a cloud database backed by an existing license.
pub async fn create_cloud_database(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
    license_name: &str,
) -> Result<DatabaseSummary, Box<dyn std::error::Error + Send + Sync>> {
    debug!("creating cloud database {database_name} on license {license_name}");

    let payload =
        CreateDatabasePayload::cloud(database_name.to_string(), license_name.to_string());

    create_database(factory, payload).await
}

/// Creates a VuMark database. VuMark databases take no license.
pub async fn create_vumark_database(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
) -> Result<DatabaseSummary, Box<dyn std::error::Error + Send + Sync>> {
    debug!("creating vumark database {database_name}");

    let payload = CreateDatabasePayload::vumark(database_name.to_string());

    create_database(factory, payload).await
}

async fn create_database(
    factory: &AuthenticatedHttpClientFactory,
    payload: CreateDatabasePayload,
) -> Result<DatabaseSummary, Box<dyn std::error::Error + Send + Sync>> {
    let client = factory.create_client()?;

    let resp = match client
        .post(format!("{}vui/develop/databases", factory.console_url))
        .json(&payload)
        .send()
        .await
    {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(r) => r,
    };

    read_result::<DatabaseSummary>(resp, "vui/develop/databases").await
}

async fn get_database_page(
    factory: &AuthenticatedHttpClientFactory,
    page_no: u32,
) -> Result<DatabasePage, Box<dyn std::error::Error + Send + Sync>> {
    debug!("fetching database page {page_no}");

    let client = factory.create_client()?;

    let resp = match client
        .get(format!(
            "{}vui/develop/databases?page_no={page_no}",
            factory.console_url
        ))
        .send()
        .await
    {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(r) => r,
    };

    read_result::<DatabasePage>(resp, "vui/develop/databases").await
}

/// Resolves a database name to its id by walking the console's paginated
/// database table, the same way the details page is reached by hand.
pub async fn find_database_id(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    debug!("looking up database {database_name}");

    let mut page_no: u32 = 1;

    loop {
        let page = get_database_page(factory, page_no).await?;

        if let Some(database) = page
            .databases
            .iter()
            .find(|d| d.database_name == database_name)
        {
            return Ok(database.database_id.clone());
        }

        // no next page left to try
        if page_no >= page.page_count.unwrap_or(1) {
            return Err(Box::new(VendorSiteError::new(format!(
                "database {database_name} was not found"
            ))));
        }

        page_no += 1;
    }
}

/// Fetches the access keys of the named database.
pub async fn get_database_details(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
) -> Result<DatabaseDetails, Box<dyn std::error::Error + Send + Sync>> {
    let database_id = find_database_id(factory, database_name).await?;

    debug!("fetching access keys of database {database_id}");

    let client = factory.create_client()?;

    let resp = match client
        .get(format!(
            "{}vui/develop/databases/{database_id}/access-keys",
            factory.console_url
        ))
        .send()
        .await
    {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(r) => r,
    };

    read_result::<DatabaseDetails>(resp, "vui/develop/databases/access-keys").await
}
