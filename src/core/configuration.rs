use std::path::Path;

use tokio::{fs::File, io::AsyncReadExt};

pub mod sections;
pub use sections::{ApiConfiguration, Configuration, LogConfiguration};


const DEFAULT_CONSOLE_URL: &str = "https://developer.vuforia.com/";
const DEFAULT_TIMEOUT: u64 = 30;
const DEFAULT_REFRESH: u64 = 2;
const DEFAULT_LOG_LEVEL: &str = "info";

impl Configuration {
    /// Console base URL, always with a trailing slash so endpoint paths
    /// can be appended directly.
    pub fn console_url(&self) -> String {
        let url = self
            .api
            .console_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CONSOLE_URL.to_string());

        if url.ends_with('/') {
            url
        } else {
            format!("{url}/")
        }
    }

    /// Per-request timeout in seconds.
    pub fn timeout(&self) -> u64 {
        self.api.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Poll interval in seconds for target readiness checks.
    pub fn refresh(&self) -> u64 {
        self.api.refresh.unwrap_or(DEFAULT_REFRESH)
    }

    pub fn log_level(&self) -> String {
        self.log
            .level
            .clone()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

/// The tool cannot run with the supplied configuration or environment.
#[derive(Debug)]
pub struct ConfigurationError {
    reason: String,
}

impl ConfigurationError {
    pub fn new(reason: String) -> Self {
        Self { reason }
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason)
    }
}

impl std::error::Error for ConfigurationError {}

/// Loads the configuration file when one is given, built-in defaults
/// otherwise.
pub async fn get_configuration(
    file_path: Option<String>,
) -> Result<Configuration, Box<dyn std::error::Error + Send + Sync>> {
    let file_path = match file_path {
        None => return Ok(Configuration::default()),
        Some(p) => p,
    };

    let path = Path::new(&file_path);

    if !path.exists() {
        return Err(Box::new(ConfigurationError::new(format!(
            "configuration file {file_path} is missing"
        ))));
    }

    let mut file = File::open(path).await?;
    let mut buffer = vec![];

    file.read_to_end(&mut buffer).await?;

    let result = String::from_utf8(buffer)?;

    match toml::from_str::<Configuration>(&result) {
        Ok(c) => Ok(c),
        Err(e) => Err(Box::new(ConfigurationError::new(format!(
            "configuration file {file_path} is corrupted: {e}"
        )))),
    }
}
