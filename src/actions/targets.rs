use std::fmt::Display;

use chrono::{TimeDelta, Utc};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use tokio::time::{sleep, Duration};

use super::databases;
use crate::core::common::{
    http_client_factory::AuthenticatedHttpClientFactory,
    transport::{read_result, TransientNetworkError},
};

lazy_static! {
    static ref TARGET_ID_REGEX: Regex =
        Regex::new("([0-9a-f]{32})$").expect("invalid target id pattern");
}

#[derive(Deserialize, Clone, Debug)]
pub struct TargetRow {
    pub target_name: String,
    // absent while the console is still processing the target
    pub link: Option<String>,
}

#[derive(Deserialize, Clone, Debug)]
struct TargetPage {
    targets: Vec<TargetRow>,
}

/// The target row exists but its name cell is not a link yet.
#[derive(Debug)]
pub struct VuMarkTargetNameNotLinkError {
    reason: String,
}

impl VuMarkTargetNameNotLinkError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for VuMarkTargetNameNotLinkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for VuMarkTargetNameNotLinkError {}

/// No row in the target table matches the requested name.
#[derive(Debug)]
pub struct VuMarkTargetLinkNotFoundError {
    reason: String,
}

impl VuMarkTargetLinkNotFoundError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for VuMarkTargetLinkNotFoundError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for VuMarkTargetLinkNotFoundError {}

/// The target id could not be resolved from the console's target table.
#[derive(Debug)]
pub struct VuMarkTargetIdLookupError {
    reason: String,
}

impl VuMarkTargetIdLookupError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl Display for VuMarkTargetIdLookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for VuMarkTargetIdLookupError {}

async fn find_vumark_target_link(
    factory: &AuthenticatedHttpClientFactory,
    database_id: &str,
    target_name: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    debug!("looking up target {target_name} in database {database_id}");

    let client = factory.create_client()?;

    let resp = match client
        .get(format!(
            "{}vui/develop/databases/{database_id}/targets",
            factory.console_url
        ))
        .send()
        .await
    {
        Err(e) => return Err(Box::new(TransientNetworkError::from(e))),
        Ok(r) => r,
    };

    let page = read_result::<TargetPage>(resp, "vui/develop/databases/targets").await?;

    let row = match page.targets.iter().find(|t| t.target_name == target_name) {
        None => {
            return Err(Box::new(VuMarkTargetLinkNotFoundError::new(format!(
                "target {target_name} row was not found"
            ))))
        }
        Some(r) => r,
    };

    match &row.link {
        Some(link) => Ok(link.clone()),
        None => Err(Box::new(VuMarkTargetNameNotLinkError::new(format!(
            "target {target_name} is present but its name is not a link yet"
        )))),
    }
}

/// Resolves the generated id of a VuMark target from its row link.
pub async fn get_vumark_target_id(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
    target_name: &str,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let database_id = databases::find_database_id(factory, database_name).await?;

    let link = match find_vumark_target_link(factory, &database_id, target_name).await {
        Ok(l) => l,
        Err(e) => {
            if e.downcast_ref::<VuMarkTargetNameNotLinkError>().is_some() {
                return Err(Box::new(VuMarkTargetIdLookupError::new(format!(
                    "the id of target {target_name} is only available once the target has finished processing"
                ))));
            }

            if e.downcast_ref::<VuMarkTargetLinkNotFoundError>().is_some() {
                return Err(Box::new(VuMarkTargetIdLookupError::new(format!(
                    "target {target_name} was not found in database {database_name}"
                ))));
            }

            return Err(e);
        }
    };

    match TARGET_ID_REGEX.captures(link.as_str()) {
        Some(captures) => Ok(captures[1].to_string()),
        None => Err(Box::new(VuMarkTargetIdLookupError::new(format!(
            "a target id was not found in the target link {link}"
        )))),
    }
}

/// Polls the target table until the named target's row link appears.
///
/// A row that is missing or not yet a link means the console is still
/// processing the target; any other failure aborts the wait.
pub async fn wait_for_vumark_target_link(
    factory: &AuthenticatedHttpClientFactory,
    database_name: &str,
    target_name: &str,
    refresh: u64,
    timeout: u64,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let deadline = Utc::now() + TimeDelta::seconds(timeout as i64);

    let database_id = databases::find_database_id(factory, database_name).await?;

    loop {
        match find_vumark_target_link(factory, &database_id, target_name).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                let still_processing = e.downcast_ref::<VuMarkTargetNameNotLinkError>().is_some()
                    || e.downcast_ref::<VuMarkTargetLinkNotFoundError>().is_some();

                if !still_processing {
                    return Err(e);
                }

                if Utc::now() >= deadline {
                    return Err(Box::new(VuMarkTargetIdLookupError::new(format!(
                        "target {target_name} row was not found within {timeout} seconds"
                    ))));
                }

                sleep(Duration::from_secs(refresh)).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer,
    };

    use crate::{
        actions::targets::{
            get_vumark_target_id, wait_for_vumark_target_link, VuMarkTargetIdLookupError,
        },
        core::common::http_client_factory::AuthenticatedHttpClientFactory,
    };

    fn factory_for(mock_server: &MockServer) -> AuthenticatedHttpClientFactory {
        AuthenticatedHttpClientFactory::new(format!("{}/", mock_server.uri()), "4321".to_string(), 30)
    }

    async fn mount_database_page(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/vui/develop/databases"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "databases": [
                        { "database_id": "11aa", "database_name": "my-database" }
                    ],
                    "page_count": 1,
                },
                "success": true,
            })))
            .mount(mock_server)
            .await;
    }

    fn target_page_with_link() -> serde_json::Value {
        json!({
            "result": {
                "targets": [{
                    "target_name": "my-target",
                    "link": "https://developer.vuforia.com/develop/databases/11aa/targets/44db1c5c467641328c98e485b7e61222",
                }],
            },
            "success": true,
        })
    }

    #[tokio::test]
    async fn get_vumark_target_id_extracts_id_from_link() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_json(target_page_with_link()),
            )
            .mount(&mock_server)
            .await;

        let target_id = get_vumark_target_id(&factory_for(&mock_server), "my-database", "my-target")
            .await
            .unwrap();

        assert_eq!("44db1c5c467641328c98e485b7e61222", target_id);
    }

    #[tokio::test]
    async fn target_still_processing_is_a_lookup_error() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "targets": [{ "target_name": "my-target", "link": null }],
                },
                "success": true,
            })))
            .mount(&mock_server)
            .await;

        let err = get_vumark_target_id(&factory_for(&mock_server), "my-database", "my-target")
            .await
            .unwrap_err();

        let lookup = err.downcast_ref::<VuMarkTargetIdLookupError>().unwrap();
        assert!(lookup.to_string().contains("only available"));
    }

    #[tokio::test]
    async fn missing_target_row_is_a_lookup_error() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": { "targets": [] },
                "success": true,
            })))
            .mount(&mock_server)
            .await;

        let err = get_vumark_target_id(&factory_for(&mock_server), "my-database", "my-target")
            .await
            .unwrap_err();

        let lookup = err.downcast_ref::<VuMarkTargetIdLookupError>().unwrap();
        assert!(lookup.to_string().contains("was not found"));
    }

    #[tokio::test]
    async fn malformed_link_is_a_lookup_error() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "targets": [{
                        "target_name": "my-target",
                        "link": "https://developer.vuforia.com/",
                    }],
                },
                "success": true,
            })))
            .mount(&mock_server)
            .await;

        let err = get_vumark_target_id(&factory_for(&mock_server), "my-database", "my-target")
            .await
            .unwrap_err();

        let lookup = err.downcast_ref::<VuMarkTargetIdLookupError>().unwrap();
        assert!(lookup.to_string().contains("not found in the target link"));
    }

    #[tokio::test]
    async fn wait_retries_until_the_link_appears() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        // first poll sees the row before its name became a link
        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": {
                    "targets": [{ "target_name": "my-target", "link": null }],
                },
                "success": true,
            })))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_json(target_page_with_link()),
            )
            .mount(&mock_server)
            .await;

        wait_for_vumark_target_link(&factory_for(&mock_server), "my-database", "my-target", 0, 60)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn wait_times_out_when_the_link_never_appears() {
        let mock_server = MockServer::start().await;
        mount_database_page(&mock_server).await;

        Mock::given(method("GET"))
            .and(path("/vui/develop/databases/11aa/targets"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_json(json!({
                "result": { "targets": [] },
                "success": true,
            })))
            .mount(&mock_server)
            .await;

        let err = wait_for_vumark_target_link(
            &factory_for(&mock_server),
            "my-database",
            "my-target",
            0,
            0,
        )
        .await
        .unwrap_err();

        let lookup = err.downcast_ref::<VuMarkTargetIdLookupError>().unwrap();
        assert!(lookup.to_string().contains("row was not found within"));
    }
}
