use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DatabaseSummary {
    pub database_id: String,
    pub database_name: String,
}

/// One page of the console's database table.
#[derive(Deserialize, Clone, Debug)]
pub struct DatabasePage {
    pub databases: Vec<DatabaseSummary>,
    pub page_count: Option<u32>,
}

/// The access keys shown on a database's details page.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct DatabaseDetails {
    pub database_name: String,
    pub server_access_key: String,
    pub server_secret_key: String,
    pub client_access_key: String,
    pub client_secret_key: String,
}
