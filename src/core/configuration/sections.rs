use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Configuration {
    #[serde(default)]
    pub api: ApiConfiguration,
    #[serde(default)]
    pub log: LogConfiguration,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct ApiConfiguration {
    pub console_url: Option<String>,
    pub timeout: Option<u64>,
    pub refresh: Option<u64>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct LogConfiguration {
    pub level: Option<String>,
}
