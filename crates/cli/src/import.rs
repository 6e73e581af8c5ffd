//! `medreg import`: one snapshot through the full pipeline.

use std::fs;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;

use medreg_ingest::{run_import, Family, ImportSource, RunOptions, RunOutcome, RunReport};
use medreg_store::Store;

use crate::config::Config;
use crate::fetch::fetch_url;
use crate::CliError;

pub struct ImportArgs {
    pub family: Family,
    pub file: Option<PathBuf>,
    pub url: Option<String>,
    pub stdin_name: Option<String>,
    pub period: Option<String>,
    pub valid_from: Option<NaiveDate>,
    pub db: Option<PathBuf>,
    pub json: bool,
}

pub fn cmd_import(args: ImportArgs, config: &Config) -> Result<(), CliError> {
    let source = read_source(&args, config)?;

    let db = args.db.as_ref().unwrap_or(&config.store);
    let mut store = Store::open(db).map_err(CliError::store)?;

    let options = RunOptions {
        period: args.period,
        valid_from: args.valid_from,
        failure_log_cap: config.failure_log_cap,
    };
    let outcome =
        run_import(&mut store, args.family, &source, &options).map_err(CliError::ingest)?;

    match &outcome {
        RunOutcome::AlreadyProcessed { family, period } => {
            eprintln!("{} {} already processed, nothing to do", family, period);
        }
        RunOutcome::Completed(report) => print_report(report),
    }
    if args.json {
        let payload = serde_json::to_string_pretty(&outcome)
            .map_err(|e| CliError::general(format!("serializing report: {}", e)))?;
        println!("{}", payload);
    }
    Ok(())
}

fn read_source(args: &ImportArgs, config: &Config) -> Result<ImportSource, CliError> {
    if args.file.is_some() && args.url.is_some() {
        return Err(CliError::usage("--file and --url are mutually exclusive"));
    }
    if let Some(path) = &args.file {
        let bytes = fs::read(path)
            .map_err(|e| CliError::usage(format!("cannot read {}: {}", path.display(), e)))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        return Ok(ImportSource { name, bytes });
    }
    if let Some(url) = &args.url {
        let timeout = Duration::from_secs(config.fetch_timeout_secs);
        let (name, bytes) = fetch_url(url, timeout)?;
        return Ok(ImportSource { name, bytes });
    }

    // Neither flag: the snapshot arrives on stdin.
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .map_err(|e| CliError::usage(format!("reading stdin: {}", e)))?;
    let name = args.stdin_name.clone().unwrap_or_else(|| "-".to_string());
    Ok(ImportSource { name, bytes })
}

/// Human summary on stderr. Sections that did nothing print one quiet line;
/// anything that moved gets its counts spelled out.
fn print_report(report: &RunReport) {
    eprintln!(
        "imported {} {} (valid from {}, run {})",
        report.family, report.period, report.valid_from, report.run_id
    );
    for s in &report.sections {
        let failed = s.failed_missing + s.failed_reference + s.failed_format;
        if s.new == 0 && s.updated == 0 && s.reactivated == 0 && s.newly_missing == 0 && failed == 0
        {
            eprintln!("  {:<24} {} rows, unchanged", s.dataset, s.rows_read);
            continue;
        }
        eprintln!(
            "  {:<24} {} rows: {} new, {} updated, {} reactivated, {} newly missing, {} failed",
            s.dataset, s.rows_read, s.new, s.updated, s.reactivated, s.newly_missing, failed
        );
    }
    if report.is_noop() {
        eprintln!("no changes against the previous snapshot");
    }
}
