pub mod commands;
pub mod output;
pub mod ux;

use crate::credentials::{CredentialResolver, EnvFile, SecretSheet};
use crate::error::PloverError;
use crate::Plover;
pub use crate::db::Engine;
pub use clap::{Parser, Subcommand};

use std::path::PathBuf;


#[derive(Parser)]
#[command(name = "plover", version, about = "Plover runs data-quality expectations against SQL results from a warehouse or a Spark cluster.")]
pub struct Cli {
    #[arg(
        long = "engine",
        value_enum,
        help = "Engine to run queries on. spark selects the cluster context, every other engine the warehouse context.",
        default_value_t = Engine::Postgres,
        env = "ENGINE",
    )]
    pub engine: Engine,

    #[arg(
        long = "db",
        help = "Connection string. When omitted, warehouse credentials are resolved from --env-file or the secret sheet, e.g.:
    postgresql://<username>:<password>@<host>:<port>/<database>
    sc://<host>:<port>\n",
        env = "DB_CONNECTION_STRING",
        hide_env_values = true
    )]
    pub db_connection_string: Option<String>,

    #[arg(
        long,
        help = "Env file holding DB_USER, DB_PASSWORD, DB_HOST, DB_PORT and DB_NAME.",
        default_value = ".env",
        env = "ENV_FILE",
    )]
    pub env_file: PathBuf,

    #[arg(
        long,
        help = "Name of the spreadsheet used as a credential store when the env file is absent.",
        default_value = "WarehouseAccess",
        env = "SECRET_SHEET",
    )]
    pub secret_sheet: String,

    #[arg(
        long,
        help = "OAuth access token for the Drive and Sheets APIs. The secret sheet is only consulted when this is set.",
        env = "SHEETS_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub sheets_token: Option<String>,

    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Set level of verbosity. [default: INFO]\n\t-v: DEBUG\n\t-vv: TRACE\n--quiet takes precedence over --verbose."
    )]
    pub verbose: u8,

    #[arg(
        short,
        long,
        action = clap::ArgAction::SetTrue,
        help = "Disable all information logs (only ERROR level logs are shown).\n--quiet takes precedence over --verbose."
    )]
    pub quiet: bool,

    #[arg(
        long,
        action = clap::ArgAction::SetTrue,
        help = "Enable JSON output format. Human readable output is disabled when this flag is set."
    )]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn credential_resolver(&self) -> CredentialResolver {
        let sheet = self.sheets_token
            .as_deref()
            .map(|token| SecretSheet::new(&self.secret_sheet, token));

        CredentialResolver::new(EnvFile::new(&self.env_file), sheet)
    }

    pub async fn connect(&self) -> Result<Plover, PloverError> {
        Plover::connect(
            self.engine,
            self.db_connection_string.as_deref(),
            &self.credential_resolver(),
        ).await
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Test connection to the database.")]
    Peck {},

    #[command(about = "Run a query and print its result.")]
    Query {
        #[arg(long, help = "SQL to run.")]
        sql: String,
    },

    #[command(about = "Run every check of a suite file and report the results.")]
    Check {
        #[arg(long, help = "TOML suite file with [vars] and [[check]] entries.")]
        suite: PathBuf,

        #[arg(
            long = "var",
            value_name = "KEY=VALUE",
            value_parser = crate::suite::parse_var,
            help = "Fill the {KEY} placeholder in check names and SQL. Overrides the suite's [vars]. Repeatable.",
        )]
        vars: Vec<(String, String)>,

        #[arg(long, help = "Only print failed checks.")]
        hide_success: bool,
    },
}

impl std::fmt::Display for Commands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Commands::Peck { .. } => "peck",
            Commands::Query { .. } => "query",
            Commands::Check { .. } => "check",
        };
        write!(f, "{name}")
    }
}
