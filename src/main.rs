use clap::Parser;
use log::error;

use vws_web_tools::actions::{ActionRequest, InvalidParameterError};
use vws_web_tools::core::{
    authenticator::{authentication_error::AuthenticationError, EnvCredentialProvider},
    cli::{Cli, Command},
    common::transport::{SessionExpiredError, TransientNetworkError, VendorSiteError},
    configuration::{self, ConfigurationError},
    core, logger,
};

const EXIT_CONFIGURATION: i32 = 2;
const EXIT_INVALID_PARAMETER: i32 = 3;
const EXIT_AUTHENTICATION: i32 = 4;
const EXIT_SESSION_EXPIRED: i32 = 5;
const EXIT_VENDOR_SITE: i32 = 6;
const EXIT_TRANSIENT_NETWORK: i32 = 7;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let conf = match configuration::get_configuration(cli.configuration_file.clone()).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(EXIT_CONFIGURATION);
        }
    };

    let level = match &cli.verbosity {
        Some(l) => l.to_string(),
        None => conf.log_level(),
    };

    let _logger = flexi_logger::Logger::try_with_str(level)
        .expect("cannot parse log level")
        .filter(Box::new(logger::IgnoreReqwest))
        .start()
        .expect("cannot start logger");

    let request = match cli.command {
        Command::CreateVwsLicense { license_name } => ActionRequest::CreateLicense { license_name },
        Command::CreateVwsCloudDatabase {
            license_name,
            database_name,
        } => ActionRequest::CreateCloudDatabase {
            license_name,
            database_name,
        },
        Command::CreateVwsVumarkDatabase { database_name } => {
            ActionRequest::CreateVuMarkDatabase { database_name }
        }
        Command::ShowDatabaseDetails { database_name } => {
            ActionRequest::ShowDatabaseDetails { database_name }
        }
        Command::GetVumarkTargetId {
            database_name,
            target_name,
            wait,
        } => ActionRequest::GetVuMarkTargetId {
            database_name,
            target_name,
            wait,
        },
    };

    // the environment is only read here, the core gets explicit
    // credentials through the provider
    let credentials = Box::new(EnvCredentialProvider::new());

    match core::run(&conf, credentials, request).await {
        Ok(result) => {
            let output =
                serde_json::to_string_pretty(&result).expect("cannot serialize action result");
            println!("{output}");
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(exit_code_for(e.as_ref()));
        }
    }
}

fn exit_code_for(e: &(dyn std::error::Error + Send + Sync + 'static)) -> i32 {
    if e.downcast_ref::<ConfigurationError>().is_some() {
        return EXIT_CONFIGURATION;
    }

    if e.downcast_ref::<InvalidParameterError>().is_some() {
        return EXIT_INVALID_PARAMETER;
    }

    if e.downcast_ref::<AuthenticationError>().is_some() {
        return EXIT_AUTHENTICATION;
    }

    if e.downcast_ref::<SessionExpiredError>().is_some() {
        return EXIT_SESSION_EXPIRED;
    }

    if e.downcast_ref::<VendorSiteError>().is_some() {
        return EXIT_VENDOR_SITE;
    }

    if e.downcast_ref::<TransientNetworkError>().is_some() {
        return EXIT_TRANSIENT_NETWORK;
    }

    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed<E: std::error::Error + Send + Sync + 'static>(
        e: E,
    ) -> Box<dyn std::error::Error + Send + Sync> {
        Box::new(e)
    }

    #[test]
    fn each_error_kind_maps_to_its_own_exit_code() {
        let cases: Vec<(Box<dyn std::error::Error + Send + Sync>, i32)> = vec![
            (
                boxed(ConfigurationError::new("VWS_EMAIL_ADDRESS is not set".to_string())),
                EXIT_CONFIGURATION,
            ),
            (
                boxed(InvalidParameterError::new("database name must not be empty".to_string())),
                EXIT_INVALID_PARAMETER,
            ),
            (
                boxed(AuthenticationError::new("the console rejected the credentials".to_string())),
                EXIT_AUTHENTICATION,
            ),
            (
                boxed(SessionExpiredError::new("session is no longer accepted".to_string())),
                EXIT_SESSION_EXPIRED,
            ),
            (
                boxed(VendorSiteError::new("a license named lic-1 already exists".to_string())),
                EXIT_VENDOR_SITE,
            ),
            (
                boxed(TransientNetworkError::new("connection refused".to_string())),
                EXIT_TRANSIENT_NETWORK,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(expected, exit_code_for(err.as_ref()));
        }
    }
}
