use async_trait::async_trait;
use log::error;
use mockall::automock;

use crate::core::configuration::ConfigurationError;

pub const VWS_EMAIL_ADDRESS_VAR: &str = "VWS_EMAIL_ADDRESS";
pub const VWS_PASSWORD_VAR: &str = "VWS_PASSWORD";

/// Email address / password pair for the console.
///
/// Held only for the duration of a login round-trip, never persisted.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub email_address: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email_address: String, password: String) -> Self {
        Self {
            email_address,
            password,
        }
    }
}

#[automock]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn get(&self) -> Result<Credentials, Box<dyn std::error::Error + Send + Sync>>;
}

/// Reads credentials from the process environment.
///
/// This is the only place the environment is consulted, callers further
/// in receive explicit `Credentials`.
#[derive(Clone)]
pub struct EnvCredentialProvider {
    email_var: String,
    password_var: String,
}

impl EnvCredentialProvider {
    pub fn new() -> Self {
        Self::with_vars(VWS_EMAIL_ADDRESS_VAR, VWS_PASSWORD_VAR)
    }

    pub fn with_vars(email_var: &str, password_var: &str) -> Self {
        Self {
            email_var: email_var.to_string(),
            password_var: password_var.to_string(),
        }
    }

    fn read_var(name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        match std::env::var(name) {
            Ok(v) if !v.trim().is_empty() => Ok(v),
            _ => {
                error!("{name} is not set, the console credentials come from the environment");
                Err(Box::new(ConfigurationError::new(format!(
                    "{name} is not set"
                ))))
            }
        }
    }
}

impl Default for EnvCredentialProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get(&self) -> Result<Credentials, Box<dyn std::error::Error + Send + Sync>> {
        let email_address = Self::read_var(self.email_var.as_str())?;
        let password = Self::read_var(self.password_var.as_str())?;

        Ok(Credentials::new(email_address, password))
    }
}
