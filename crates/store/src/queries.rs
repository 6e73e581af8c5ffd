//! Read side: committed state for the CLI and for operators. Everything
//! here returns the untyped rows from [`crate::rows`].

use rusqlite::{params, OptionalExtension};

use medreg_domain::Dataset;

use crate::error::StoreError;
use crate::rows::{AbsenceRow, ChangeRow, DatasetCount, LedgerRow, RunRow, StoredRecord, Timeline};
use crate::store::Store;

fn to_stored(
    dataset: Dataset,
    raw: (i64, String, String, Option<String>),
    key: &str,
) -> Result<StoredRecord, StoreError> {
    let (id, attrs, first_seen, missing_since) = raw;
    let attributes = serde_json::from_str(&attrs).map_err(|e| StoreError::Codec {
        dataset,
        key: key.to_string(),
        detail: e.to_string(),
    })?;
    Ok(StoredRecord {
        id,
        dataset: dataset.code().to_string(),
        business_key: key.to_string(),
        attributes,
        first_seen,
        missing_since,
    })
}

impl Store {
    pub fn find_record(
        &self,
        dataset: Dataset,
        key: &str,
    ) -> Result<Option<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, attrs, first_seen, missing_since
             FROM records WHERE dataset = ?1 AND business_key = ?2",
        )?;
        let raw = stmt
            .query_row(params![dataset.code(), key], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            })
            .optional()?;
        raw.map(|raw| to_stored(dataset, raw, key)).transpose()
    }

    /// Records of one dataset that appeared in its latest snapshot.
    pub fn active_records(&self, dataset: Dataset) -> Result<Vec<StoredRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, business_key, attrs, first_seen, missing_since
             FROM records WHERE dataset = ?1 AND missing_since IS NULL
             ORDER BY business_key",
        )?;
        let raw = stmt
            .query_map(params![dataset.code()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(id, key, attrs, first_seen, missing_since)| {
                to_stored(dataset, (id, attrs, first_seen, missing_since), &key)
            })
            .collect()
    }

    /// Full provenance of one record: current state, audited attribute
    /// changes in validity order, closed absence windows.
    pub fn timeline(&self, dataset: Dataset, key: &str) -> Result<Option<Timeline>, StoreError> {
        let record = match self.find_record(dataset, key)? {
            Some(record) => record,
            None => return Ok(None),
        };

        let mut stmt = self.conn.prepare(
            "SELECT attribute, old_value, new_value, valid_from
             FROM attribute_changes WHERE record_id = ?1 ORDER BY valid_from, id",
        )?;
        let changes = stmt
            .query_map(params![record.id], |row| {
                Ok(ChangeRow {
                    attribute: row.get(0)?,
                    old_value: row.get(1)?,
                    new_value: row.get(2)?,
                    valid_from: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT missing_from, missing_to
             FROM absences WHERE record_id = ?1 ORDER BY missing_from, id",
        )?;
        let absences = stmt
            .query_map(params![record.id], |row| {
                Ok(AbsenceRow {
                    missing_from: row.get(0)?,
                    missing_to: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(Timeline {
            record,
            changes,
            absences,
        }))
    }

    pub fn recent_runs(&self, limit: u32) -> Result<Vec<RunRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT run_id, family, dataset, valid_from, started_at,
                    rows_read, rows_mapped, failed_missing, failed_reference, failed_format,
                    new_count, unchanged_count, updated_count, reactivated_count,
                    newly_missing_count, already_missing_count, change_count, absence_count
             FROM runs ORDER BY id DESC LIMIT ?1",
        )?;
        let runs = stmt
            .query_map(params![limit], |row| {
                Ok(RunRow {
                    run_id: row.get(0)?,
                    family: row.get(1)?,
                    dataset: row.get(2)?,
                    valid_from: row.get(3)?,
                    started_at: row.get(4)?,
                    rows_read: row.get(5)?,
                    rows_mapped: row.get(6)?,
                    failed_missing: row.get(7)?,
                    failed_reference: row.get(8)?,
                    failed_format: row.get(9)?,
                    new_count: row.get(10)?,
                    unchanged_count: row.get(11)?,
                    updated_count: row.get(12)?,
                    reactivated_count: row.get(13)?,
                    newly_missing_count: row.get(14)?,
                    already_missing_count: row.get(15)?,
                    change_count: row.get(16)?,
                    absence_count: row.get(17)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(runs)
    }

    pub fn dataset_counts(&self) -> Result<Vec<DatasetCount>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT dataset,
                    SUM(CASE WHEN missing_since IS NULL THEN 1 ELSE 0 END),
                    SUM(CASE WHEN missing_since IS NULL THEN 0 ELSE 1 END)
             FROM records GROUP BY dataset ORDER BY dataset",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(DatasetCount {
                    dataset: row.get(0)?,
                    active: row.get(1)?,
                    missing: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    pub fn ledger(&self) -> Result<Vec<LedgerRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT family, period, digest, processed_at
             FROM processed_imports ORDER BY processed_at DESC, family, period",
        )?;
        let entries = stmt
            .query_map([], |row| {
                Ok(LedgerRow {
                    family: row.get(0)?,
                    period: row.get(1)?,
                    digest: row.get(2)?,
                    processed_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}
