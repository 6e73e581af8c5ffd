// medreg CLI - snapshot imports and registry inspection

mod config;
mod exit_codes;
mod fetch;
mod import;
mod inspect;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use medreg_ingest::{Family, IngestError};
use medreg_store::StoreError;

use config::Config;
use exit_codes::{import_exit_code, store_exit_code, EXIT_ERROR, EXIT_FETCH, EXIT_SUCCESS, EXIT_USAGE};
use import::ImportArgs;

#[derive(Parser)]
#[command(name = "medreg")]
#[command(about = "Temporal registry of medicinal reference datasets")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./medreg.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import one snapshot of a dataset family
    #[command(after_help = "\
Examples:
  medreg import --family dlp --file DLP20240301.zip
  medreg import --family distributors --url https://opendata.example.cz/distributori_2024-03-15.csv
  cat lekarny_2024_03.zip | medreg import --family pharmacies --stdin-name lekarny_2024_03.zip
  medreg import --family dlp --file snapshot.zip --period 2024-03 --valid-from 2024-03-01 --json

The period and validity date derive from the file name; pass --period and
--valid-from when the name carries no date (stdin, opaque names). A period
already in the ledger exits 0 without reading the data.")]
    Import {
        /// Dataset family: dlp, pharmacies, or distributors
        #[arg(long)]
        family: Family,

        /// Snapshot file to read (omit together with --url to read stdin)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Download the snapshot from this URL
        #[arg(long, conflicts_with = "file")]
        url: Option<String>,

        /// Name used for period derivation when reading stdin
        #[arg(long, value_name = "NAME")]
        stdin_name: Option<String>,

        /// Ledger period override (YYYY-MM)
        #[arg(long)]
        period: Option<String>,

        /// Validity date override (YYYY-MM-DD)
        #[arg(long)]
        valid_from: Option<NaiveDate>,

        /// Registry database path (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print the run report as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Active and missing record counts per dataset
    Status {
        /// Registry database path (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print counts as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// List currently active records of one dataset
    Active {
        /// Dataset code, e.g. medicinal-products
        #[arg(long)]
        dataset: String,

        /// Maximum records to print
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Registry database path (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print records as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Full provenance timeline of one record
    #[command(after_help = "\
Examples:
  medreg history --dataset medicinal-products --key 0001234
  medreg history --dataset organisations --key 'ZENT|CZ' --json")]
    History {
        /// Dataset code, e.g. medicinal-products
        #[arg(long)]
        dataset: String,

        /// Canonical business key (composite parts joined with '|')
        #[arg(long)]
        key: String,

        /// Registry database path (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print the timeline as JSON on stdout
        #[arg(long)]
        json: bool,
    },

    /// Recent import run summaries, newest first
    Runs {
        /// Maximum rows to print
        #[arg(long, default_value_t = 20)]
        limit: u32,

        /// Registry database path (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print run rows as JSON on stdout
        #[arg(long)]
        json: bool,
    },
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT_HASH"), ")")
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = Config::load(cli.config.as_deref()).and_then(|config| match cli.command {
        Commands::Import {
            family,
            file,
            url,
            stdin_name,
            period,
            valid_from,
            db,
            json,
        } => import::cmd_import(
            ImportArgs {
                family,
                file,
                url,
                stdin_name,
                period,
                valid_from,
                db,
                json,
            },
            &config,
        ),
        Commands::Status { db, json } => inspect::cmd_status(db, json, &config),
        Commands::Active {
            dataset,
            limit,
            db,
            json,
        } => inspect::cmd_active(dataset, limit, db, json, &config),
        Commands::History {
            dataset,
            key,
            db,
            json,
        } => inspect::cmd_history(dataset, key, db, json, &config),
        Commands::Runs { limit, db, json } => inspect::cmd_runs(limit, db, json, &config),
    });

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_USAGE,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_ERROR,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn fetch(msg: impl Into<String>) -> Self {
        Self {
            code: EXIT_FETCH,
            message: msg.into(),
            hint: None,
        }
    }

    pub fn store(err: StoreError) -> Self {
        Self {
            code: store_exit_code(&err),
            message: err.to_string(),
            hint: None,
        }
    }

    /// Import pipeline error with its registry exit code.
    pub fn ingest(err: IngestError) -> Self {
        let hint = match &err {
            IngestError::SourceUndated { .. } => Some(
                "pass --period and --valid-from when the filename carries no date".to_string(),
            ),
            _ => None,
        };
        Self {
            code: import_exit_code(&err),
            message: err.to_string(),
            hint,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
