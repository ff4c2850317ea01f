use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vws-web", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
    #[arg(short, long)]
    pub configuration_file: Option<String>,
    #[arg(short, long)]
    pub verbosity: Option<log::LevelFilter>,
}

#[derive(Subcommand)]
pub enum Command {
    /// creates a license on the console
    CreateVwsLicense {
        /// the name of the license to create
        #[arg(long)]
        license_name: String,
    },
    /// creates a cloud database backed by an existing license
    CreateVwsCloudDatabase {
        /// the name of the license backing the database
        #[arg(long)]
        license_name: String,
        /// the name of the database to create
        #[arg(long)]
        database_name: String,
    },
    /// creates a VuMark database, which takes no license
    CreateVwsVumarkDatabase {
        /// the name of the database to create
        #[arg(long)]
        database_name: String,
    },
    /// shows the access keys of a database
    ShowDatabaseDetails {
        /// the name of the database to look up
        #[arg(long)]
        database_name: String,
    },
    /// looks up the generated id of a VuMark target
    GetVumarkTargetId {
        /// the name of the database holding the target
        #[arg(long)]
        database_name: String,
        /// the name of the target to look up
        #[arg(long)]
        target_name: String,
        /// seconds to wait for the target to finish processing
        #[arg(long)]
        wait: Option<u64>,
    },
}
