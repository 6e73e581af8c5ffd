use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use uuid::Uuid;

use medreg_domain::{Dataset, ReferenceEntity};
use medreg_import::mappers::{
    AdministrationRouteMapper, AtcGroupMapper, CompositionFlagMapper, CountryMapper,
    DataSourceMapper, DispenseModeMapper, DistributorMapper, DistrictMapper, DopingFlagMapper,
    DosageFormMapper, IndicationGroupMapper, LegalBasisMapper, MedicinalProductMapper,
    NarcoticCategoryMapper, OrganisationMapper, PackageTypeMapper, PharmacyMapper,
    ProductCompositionMapper, RegionMapper, RegistrationProcedureMapper,
    RegistrationStatusMapper, SaltFormMapper, SubstanceMapper, SubstanceSynonymMapper, UnitMapper,
};
use medreg_import::{
    decode_text, map_rows, parse_table, unzip_member, MapContext, ReferenceCache, RowMapper, Table,
};
use medreg_recon::reconcile;
use medreg_store::{RunRow, RunTxn, Store};

use crate::error::IngestError;
use crate::family::Family;
use crate::period::derive_period;
use crate::report::{RunOutcome, RunReport, SectionReport};

/// Raw snapshot bytes plus the name they were published under. The name is
/// what the period and validity date derive from.
pub struct ImportSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Knobs the CLI exposes; defaults match the unattended schedule.
pub struct RunOptions {
    /// Ledger period override, `YYYY-MM`.
    pub period: Option<String>,
    /// Validity date override.
    pub valid_from: Option<NaiveDate>,
    /// Row failures logged verbatim before the log falls back to counting.
    pub failure_log_cap: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            period: None,
            valid_from: None,
            failure_log_cap: 20,
        }
    }
}

/// Import one snapshot of one family: ledger check, decode, map, reconcile
/// each section in dependency order, audit, ledger mark. Everything commits
/// in a single transaction or not at all.
pub fn run_import(
    store: &mut Store,
    family: Family,
    source: &ImportSource,
    options: &RunOptions,
) -> Result<RunOutcome, IngestError> {
    let derived = derive_period(&source.name);
    let period = match (&options.period, &derived) {
        (Some(period), _) => period.clone(),
        (None, Some(derived)) => derived.period.clone(),
        (None, None) => {
            return Err(IngestError::SourceUndated {
                name: source.name.clone(),
            })
        }
    };
    let valid_from = match (options.valid_from, &derived) {
        (Some(date), _) => date,
        (None, Some(derived)) => derived.valid_from,
        (None, None) => {
            return Err(IngestError::SourceUndated {
                name: source.name.clone(),
            })
        }
    };

    if store.is_processed(family.code(), &period)? {
        info!(family = %family, %period, "snapshot already processed, skipping");
        return Ok(RunOutcome::AlreadyProcessed {
            family: family.code().to_string(),
            period,
        });
    }

    let digest: String = Sha256::digest(&source.bytes)
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now().to_rfc3339();

    info!(
        family = %family,
        %period,
        %valid_from,
        source = %source.name,
        %digest,
        "starting import run"
    );

    let txn = store.begin()?;
    let mut refs = ReferenceCache::new();
    let mut sections = Vec::with_capacity(family.sections().len());

    for section in family.sections() {
        let csv_bytes = match section.member {
            Some(member) => unzip_member(&source.bytes, member)?,
            None => source.bytes.clone(),
        };
        let text = decode_text(&csv_bytes, family.charset())?;
        let table = parse_table(&text)?;

        let mut run = SectionRun {
            txn: &txn,
            refs: &mut refs,
            valid_from,
            failure_cap: options.failure_log_cap,
            run_id: &run_id,
            family,
            started_at: &started_at,
        };
        let report = dispatch(section.dataset, &mut run, &table)?;
        info!(
            dataset = %section.dataset,
            new = report.new,
            unchanged = report.unchanged,
            updated = report.updated,
            reactivated = report.reactivated,
            newly_missing = report.newly_missing,
            failures = report.rows_read - report.rows_mapped,
            "section reconciled"
        );
        sections.push(report);
    }

    txn.mark_processed(family.code(), &period, &digest)?;
    txn.commit()?;

    let report = RunReport {
        run_id,
        family: family.code().to_string(),
        period,
        valid_from,
        digest,
        sections,
    };
    info!(run_id = %report.run_id, noop = report.is_noop(), "import run committed");
    Ok(RunOutcome::Completed(report))
}

struct SectionRun<'a, 'b> {
    txn: &'a RunTxn<'b>,
    refs: &'a mut ReferenceCache,
    valid_from: NaiveDate,
    failure_cap: usize,
    run_id: &'a str,
    family: Family,
    started_at: &'a str,
}

fn dispatch(
    dataset: Dataset,
    run: &mut SectionRun<'_, '_>,
    table: &Table,
) -> Result<SectionReport, IngestError> {
    match dataset {
        Dataset::Countries => reconcile_section(&CountryMapper, run, table),
        Dataset::Units => reconcile_section(&UnitMapper, run, table),
        Dataset::DosageForms => reconcile_section(&DosageFormMapper, run, table),
        Dataset::AdministrationRoutes => {
            reconcile_section(&AdministrationRouteMapper, run, table)
        }
        Dataset::PackageTypes => reconcile_section(&PackageTypeMapper, run, table),
        Dataset::AtcGroups => reconcile_section(&AtcGroupMapper, run, table),
        Dataset::IndicationGroups => reconcile_section(&IndicationGroupMapper, run, table),
        Dataset::DispenseModes => reconcile_section(&DispenseModeMapper, run, table),
        Dataset::RegistrationStatuses => {
            reconcile_section(&RegistrationStatusMapper, run, table)
        }
        Dataset::RegistrationProcedures => {
            reconcile_section(&RegistrationProcedureMapper, run, table)
        }
        Dataset::LegalBases => reconcile_section(&LegalBasisMapper, run, table),
        Dataset::DopingFlags => reconcile_section(&DopingFlagMapper, run, table),
        Dataset::NarcoticCategories => reconcile_section(&NarcoticCategoryMapper, run, table),
        Dataset::DataSources => reconcile_section(&DataSourceMapper, run, table),
        Dataset::CompositionFlags => reconcile_section(&CompositionFlagMapper, run, table),
        Dataset::SaltForms => reconcile_section(&SaltFormMapper, run, table),
        Dataset::Regions => reconcile_section(&RegionMapper, run, table),
        Dataset::Districts => reconcile_section(&DistrictMapper, run, table),
        Dataset::Substances => reconcile_section(&SubstanceMapper, run, table),
        Dataset::SubstanceSynonyms => reconcile_section(&SubstanceSynonymMapper, run, table),
        Dataset::Organisations => reconcile_section(&OrganisationMapper, run, table),
        Dataset::MedicinalProducts => reconcile_section(&MedicinalProductMapper, run, table),
        Dataset::ProductCompositions => {
            reconcile_section(&ProductCompositionMapper, run, table)
        }
        Dataset::Pharmacies => reconcile_section(&PharmacyMapper, run, table),
        Dataset::Distributors => reconcile_section(&DistributorMapper, run, table),
    }
}

/// One dataset end to end: load the reference keys its mapper needs, map
/// every row, reconcile against persisted state, persist the write-set and
/// the audit batches, record the run counts.
fn reconcile_section<M>(
    mapper: &M,
    run: &mut SectionRun<'_, '_>,
    table: &Table,
) -> Result<SectionReport, IngestError>
where
    M: RowMapper,
    M::Entity: Serialize + DeserializeOwned,
{
    let dataset = M::Entity::DATASET;

    // Lazy cache loads go through the run's transaction, so a dependency
    // reconciled earlier in this same run is already visible.
    for dep in mapper.references() {
        run.refs.ensure_loaded(*dep, || run.txn.record_keys(*dep))?;
    }

    let mapped = map_rows(mapper, table, &MapContext { refs: &*run.refs })?;

    for failure in mapped.failures.iter().take(run.failure_cap) {
        warn!(
            dataset = %failure.dataset,
            line = failure.line,
            kind = %failure.kind,
            column = %failure.column,
            detail = %failure.detail,
            raw = %failure.raw_line,
            "row rejected"
        );
    }
    if mapped.failures.len() > run.failure_cap {
        warn!(
            dataset = %dataset,
            suppressed = mapped.failures.len() - run.failure_cap,
            "further row failures suppressed"
        );
    }

    let existing = run.txn.load_dataset::<M::Entity>()?;
    let outcome = reconcile(existing, mapped.entities, run.valid_from)?;

    run.txn.insert_records(&outcome.inserts)?;
    run.txn.update_records(&outcome.updates)?;
    run.txn.log_attribute_changes(&outcome.attribute_changes)?;
    run.txn.log_absences(&outcome.absences)?;

    let report = SectionReport::new(
        dataset.code().to_string(),
        mapped.rows_read,
        &mapped.failures,
        &outcome.summary,
    );
    run.txn.record_run(&RunRow {
        run_id: run.run_id.to_string(),
        family: run.family.code().to_string(),
        dataset: report.dataset.clone(),
        valid_from: run.valid_from.to_string(),
        started_at: run.started_at.to_string(),
        rows_read: report.rows_read as i64,
        rows_mapped: report.rows_mapped as i64,
        failed_missing: report.failed_missing as i64,
        failed_reference: report.failed_reference as i64,
        failed_format: report.failed_format as i64,
        new_count: report.new as i64,
        unchanged_count: report.unchanged as i64,
        updated_count: report.updated as i64,
        reactivated_count: report.reactivated as i64,
        newly_missing_count: report.newly_missing as i64,
        already_missing_count: report.already_missing as i64,
        change_count: report.attribute_changes as i64,
        absence_count: report.absences as i64,
    })?;

    Ok(report)
}
