//! Read-only inspection commands: status, active, history, runs.

use std::path::PathBuf;

use medreg_domain::Dataset;
use medreg_store::Store;

use crate::config::Config;
use crate::CliError;

fn open(db: Option<&PathBuf>, config: &Config) -> Result<Store, CliError> {
    let path = db.unwrap_or(&config.store);
    Store::open(path).map_err(CliError::store)
}

fn parse_dataset(code: &str) -> Result<Dataset, CliError> {
    Dataset::from_code(code).ok_or_else(|| {
        CliError::usage(format!("unknown dataset '{}'", code))
            .with_hint("run `medreg status` to list dataset codes")
    })
}

pub fn cmd_status(db: Option<PathBuf>, json: bool, config: &Config) -> Result<(), CliError> {
    let store = open(db.as_ref(), config)?;
    let counts = store.dataset_counts().map_err(CliError::store)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&counts)
                .map_err(|e| CliError::general(e.to_string()))?
        );
        return Ok(());
    }
    if counts.is_empty() {
        eprintln!("registry is empty");
        return Ok(());
    }
    eprintln!("{:<26} {:>8} {:>8} {:>8}", "dataset", "active", "missing", "total");
    for row in &counts {
        eprintln!(
            "{:<26} {:>8} {:>8} {:>8}",
            row.dataset,
            row.active,
            row.missing,
            row.active + row.missing
        );
    }
    Ok(())
}

pub fn cmd_active(
    dataset: String,
    limit: usize,
    db: Option<PathBuf>,
    json: bool,
    config: &Config,
) -> Result<(), CliError> {
    let dataset = parse_dataset(&dataset)?;
    let store = open(db.as_ref(), config)?;
    let mut records = store.active_records(dataset).map_err(CliError::store)?;
    let total = records.len();
    records.truncate(limit);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records)
                .map_err(|e| CliError::general(e.to_string()))?
        );
        return Ok(());
    }
    for record in &records {
        eprintln!("{}  first seen {}", record.business_key, record.first_seen);
    }
    if total > records.len() {
        eprintln!("... and {} more (raise --limit)", total - records.len());
    }
    Ok(())
}

pub fn cmd_history(
    dataset: String,
    key: String,
    db: Option<PathBuf>,
    json: bool,
    config: &Config,
) -> Result<(), CliError> {
    let dataset = parse_dataset(&dataset)?;
    let store = open(db.as_ref(), config)?;
    let timeline = store
        .timeline(dataset, &key)
        .map_err(CliError::store)?
        .ok_or_else(|| CliError::general(format!("no {} record with key '{}'", dataset, key)))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&timeline)
                .map_err(|e| CliError::general(e.to_string()))?
        );
        return Ok(());
    }

    let record = &timeline.record;
    eprintln!("{} {}", record.dataset, record.business_key);
    eprintln!("  first seen {}", record.first_seen);
    match &record.missing_since {
        Some(date) => eprintln!("  missing since {}", date),
        None => eprintln!("  currently active"),
    }
    if !timeline.changes.is_empty() {
        eprintln!("  changes:");
        for change in &timeline.changes {
            eprintln!(
                "    {}  {}: '{}' -> '{}'",
                change.valid_from, change.attribute, change.old_value, change.new_value
            );
        }
    }
    if !timeline.absences.is_empty() {
        eprintln!("  absences:");
        for absence in &timeline.absences {
            eprintln!("    {} .. {}", absence.missing_from, absence.missing_to);
        }
    }
    Ok(())
}

pub fn cmd_runs(
    limit: u32,
    db: Option<PathBuf>,
    json: bool,
    config: &Config,
) -> Result<(), CliError> {
    let store = open(db.as_ref(), config)?;
    let runs = store.recent_runs(limit).map_err(CliError::store)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&runs).map_err(|e| CliError::general(e.to_string()))?
        );
        return Ok(());
    }
    if runs.is_empty() {
        eprintln!("no runs recorded");
        return Ok(());
    }
    for run in &runs {
        eprintln!(
            "{} {:<12} {:<24} read {:>6}  new {:>5}  updated {:>5}  missing {:>5}",
            run.valid_from,
            run.family,
            run.dataset,
            run.rows_read,
            run.new_count,
            run.updated_count,
            run.newly_missing_count
        );
    }
    Ok(())
}
