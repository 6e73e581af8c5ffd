use std::collections::HashSet;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use medreg_domain::{
    AttributeChange, Dataset, NewRecord, Persisted, RecordId, ReferenceEntity, TemporaryAbsence,
};

use crate::error::StoreError;
use crate::rows::RunRow;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    id INTEGER PRIMARY KEY,
    dataset TEXT NOT NULL,
    business_key TEXT NOT NULL,   -- canonical form, composite parts joined with '|'
    attrs TEXT NOT NULL,          -- business attributes as a JSON object
    first_seen TEXT NOT NULL,     -- ISO date, immutable after insert
    missing_since TEXT,           -- NULL while present in the latest snapshot
    UNIQUE (dataset, business_key)
);

CREATE TABLE IF NOT EXISTS attribute_changes (
    id INTEGER PRIMARY KEY,
    dataset TEXT NOT NULL,
    record_id INTEGER NOT NULL REFERENCES records(id),
    attribute TEXT NOT NULL,
    old_value TEXT NOT NULL,
    new_value TEXT NOT NULL,
    valid_from TEXT NOT NULL      -- validity date of the import that observed the change
);

CREATE TABLE IF NOT EXISTS absences (
    id INTEGER PRIMARY KEY,
    dataset TEXT NOT NULL,
    record_id INTEGER NOT NULL REFERENCES records(id),
    missing_from TEXT NOT NULL,
    missing_to TEXT NOT NULL      -- last day of the gap, day before reappearance
);

CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY,
    run_id TEXT NOT NULL,
    family TEXT NOT NULL,
    dataset TEXT NOT NULL,
    valid_from TEXT NOT NULL,
    started_at TEXT NOT NULL,
    rows_read INTEGER NOT NULL,
    rows_mapped INTEGER NOT NULL,
    failed_missing INTEGER NOT NULL,
    failed_reference INTEGER NOT NULL,
    failed_format INTEGER NOT NULL,
    new_count INTEGER NOT NULL,
    unchanged_count INTEGER NOT NULL,
    updated_count INTEGER NOT NULL,
    reactivated_count INTEGER NOT NULL,
    newly_missing_count INTEGER NOT NULL,
    already_missing_count INTEGER NOT NULL,
    change_count INTEGER NOT NULL,
    absence_count INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS processed_imports (
    family TEXT NOT NULL,
    period TEXT NOT NULL,
    digest TEXT NOT NULL,
    processed_at TEXT NOT NULL,
    PRIMARY KEY (family, period)
);

CREATE INDEX IF NOT EXISTS idx_records_dataset ON records (dataset, missing_since);
CREATE INDEX IF NOT EXISTS idx_changes_record ON attribute_changes (record_id);
CREATE INDEX IF NOT EXISTS idx_absences_record ON absences (record_id);
"#;

/// Handle on the registry database. All run writes go through [`RunTxn`];
/// the inspection queries in this crate read committed state directly.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Store, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    pub fn open_in_memory() -> Result<Store, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Store { conn })
    }

    /// Ledger check. True once an import of this family+period committed.
    pub fn is_processed(&self, family: &str, period: &str) -> Result<bool, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM processed_imports WHERE family = ?1 AND period = ?2")?;
        let found = stmt
            .query_row(params![family, period], |_| Ok(()))
            .optional()?;
        Ok(found.is_some())
    }

    /// Start one import run. Everything the run writes commits or rolls
    /// back as a unit, the ledger mark included.
    pub fn begin(&mut self) -> Result<RunTxn<'_>, StoreError> {
        Ok(RunTxn {
            txn: self.conn.transaction()?,
        })
    }
}

pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, StoreError> {
    value.parse().map_err(|_| StoreError::BadDate {
        value: value.to_string(),
    })
}

/// One import run's view of the database. Dropping it without
/// [`commit`](RunTxn::commit) rolls every write back.
pub struct RunTxn<'a> {
    txn: rusqlite::Transaction<'a>,
}

impl RunTxn<'_> {
    /// Every persisted record of one dataset, ordered by business key.
    pub fn load_dataset<T>(&self) -> Result<Vec<Persisted<T>>, StoreError>
    where
        T: ReferenceEntity + DeserializeOwned,
    {
        let mut stmt = self.txn.prepare(
            "SELECT id, business_key, attrs, first_seen, missing_since
             FROM records WHERE dataset = ?1 ORDER BY business_key",
        )?;
        let raw = stmt
            .query_map(params![T::DATASET.code()], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<String>>(4)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::with_capacity(raw.len());
        for (id, key, attrs, first_seen, missing_since) in raw {
            let entity: T = serde_json::from_str(&attrs).map_err(|e| StoreError::Codec {
                dataset: T::DATASET,
                key: key.clone(),
                detail: e.to_string(),
            })?;
            records.push(Persisted {
                id: RecordId(id),
                entity,
                first_seen: parse_date(&first_seen)?,
                missing_since: missing_since.as_deref().map(parse_date).transpose()?,
            });
        }
        Ok(records)
    }

    /// Canonical business keys of one dataset, for the reference cache.
    pub fn record_keys(&self, dataset: Dataset) -> Result<HashSet<String>, StoreError> {
        let mut stmt = self
            .txn
            .prepare("SELECT business_key FROM records WHERE dataset = ?1")?;
        let keys = stmt
            .query_map(params![dataset.code()], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(keys)
    }

    pub fn insert_records<T>(&self, records: &[NewRecord<T>]) -> Result<Vec<RecordId>, StoreError>
    where
        T: ReferenceEntity + Serialize,
    {
        let mut stmt = self.txn.prepare(
            "INSERT INTO records (dataset, business_key, attrs, first_seen, missing_since)
             VALUES (?1, ?2, ?3, ?4, NULL)",
        )?;
        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let key = record.entity.business_key().canonical();
            let attrs = encode(&record.entity, &key)?;
            stmt.execute(params![
                T::DATASET.code(),
                key,
                attrs,
                record.first_seen.to_string(),
            ])?;
            ids.push(RecordId(self.txn.last_insert_rowid()));
        }
        Ok(ids)
    }

    /// Write back updated records. `first_seen` is immutable after insert;
    /// only the attribute blob and the absence marker move.
    pub fn update_records<T>(&self, records: &[Persisted<T>]) -> Result<(), StoreError>
    where
        T: ReferenceEntity + Serialize,
    {
        let mut stmt = self
            .txn
            .prepare("UPDATE records SET attrs = ?1, missing_since = ?2 WHERE id = ?3")?;
        for record in records {
            let key = record.entity.business_key().canonical();
            let attrs = encode(&record.entity, &key)?;
            stmt.execute(params![
                attrs,
                record.missing_since.map(|d| d.to_string()),
                record.id.0,
            ])?;
        }
        Ok(())
    }

    pub fn log_attribute_changes(&self, changes: &[AttributeChange]) -> Result<(), StoreError> {
        let mut stmt = self.txn.prepare(
            "INSERT INTO attribute_changes
             (dataset, record_id, attribute, old_value, new_value, valid_from)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )?;
        for change in changes {
            stmt.execute(params![
                change.dataset.code(),
                change.record.0,
                change.attribute,
                change.old_value,
                change.new_value,
                change.valid_from.to_string(),
            ])?;
        }
        Ok(())
    }

    pub fn log_absences(&self, absences: &[TemporaryAbsence]) -> Result<(), StoreError> {
        let mut stmt = self.txn.prepare(
            "INSERT INTO absences (dataset, record_id, missing_from, missing_to)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        for absence in absences {
            stmt.execute(params![
                absence.dataset.code(),
                absence.record.0,
                absence.missing_from.to_string(),
                absence.missing_to.to_string(),
            ])?;
        }
        Ok(())
    }

    pub fn record_run(&self, run: &RunRow) -> Result<(), StoreError> {
        self.txn.execute(
            "INSERT INTO runs
             (run_id, family, dataset, valid_from, started_at,
              rows_read, rows_mapped, failed_missing, failed_reference, failed_format,
              new_count, unchanged_count, updated_count, reactivated_count,
              newly_missing_count, already_missing_count, change_count, absence_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
            params![
                run.run_id,
                run.family,
                run.dataset,
                run.valid_from,
                run.started_at,
                run.rows_read,
                run.rows_mapped,
                run.failed_missing,
                run.failed_reference,
                run.failed_format,
                run.new_count,
                run.unchanged_count,
                run.updated_count,
                run.reactivated_count,
                run.newly_missing_count,
                run.already_missing_count,
                run.change_count,
                run.absence_count,
            ],
        )?;
        Ok(())
    }

    /// Ledger write. Last statement of a successful run, before commit.
    pub fn mark_processed(
        &self,
        family: &str,
        period: &str,
        digest: &str,
    ) -> Result<(), StoreError> {
        self.txn.execute(
            "INSERT INTO processed_imports (family, period, digest, processed_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![family, period, digest, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn commit(self) -> Result<(), StoreError> {
        self.txn.commit()?;
        Ok(())
    }
}

fn encode<T: ReferenceEntity + Serialize>(entity: &T, key: &str) -> Result<String, StoreError> {
    serde_json::to_string(entity).map_err(|e| StoreError::Codec {
        dataset: T::DATASET,
        key: key.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use medreg_domain::entities::Unit;

    fn unit(code: &str, name: &str) -> NewRecord<Unit> {
        NewRecord {
            entity: Unit {
                code: code.to_string(),
                name: name.to_string(),
            },
            first_seen: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    #[test]
    fn inserted_records_load_back_in_key_order() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = store.begin().unwrap();
        let ids = txn
            .insert_records(&[unit("MG", "miligram"), unit("KS", "kus")])
            .unwrap();
        assert_eq!(ids.len(), 2);

        let loaded = txn.load_dataset::<Unit>().unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].entity.code, "KS");
        assert_eq!(loaded[1].entity.code, "MG");
        assert!(loaded.iter().all(|r| r.missing_since.is_none()));
        assert_eq!(
            loaded[0].first_seen,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn updates_move_attrs_and_the_absence_marker_only() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = store.begin().unwrap();
        let ids = txn.insert_records(&[unit("MG", "miligram")]).unwrap();

        let mut record = txn.load_dataset::<Unit>().unwrap().remove(0);
        assert_eq!(record.id, ids[0]);
        record.entity.name = "milligram".to_string();
        record.missing_since = NaiveDate::from_ymd_opt(2024, 2, 1);
        txn.update_records(&[record]).unwrap();

        let reloaded = txn.load_dataset::<Unit>().unwrap().remove(0);
        assert_eq!(reloaded.entity.name, "milligram");
        assert_eq!(reloaded.missing_since, NaiveDate::from_ymd_opt(2024, 2, 1));
        // first_seen untouched by the update
        assert_eq!(
            reloaded.first_seen,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn a_duplicate_business_key_violates_the_unique_constraint() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = store.begin().unwrap();
        txn.insert_records(&[unit("MG", "miligram")]).unwrap();
        let err = txn
            .insert_records(&[unit("MG", "miligram znovu")])
            .unwrap_err();
        assert!(matches!(err, StoreError::Sqlite(_)));
    }

    #[test]
    fn dropping_the_txn_rolls_everything_back() {
        let mut store = Store::open_in_memory().unwrap();
        {
            let txn = store.begin().unwrap();
            txn.insert_records(&[unit("MG", "miligram")]).unwrap();
            // no commit
        }
        let txn = store.begin().unwrap();
        assert!(txn.load_dataset::<Unit>().unwrap().is_empty());
    }

    #[test]
    fn committed_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("medreg.db");

        {
            let mut store = Store::open(&path).unwrap();
            let txn = store.begin().unwrap();
            txn.insert_records(&[unit("MG", "miligram")]).unwrap();
            txn.mark_processed("dlp", "2024-01", "abc123").unwrap();
            txn.commit().unwrap();
        }

        let mut store = Store::open(&path).unwrap();
        assert!(store.is_processed("dlp", "2024-01").unwrap());
        assert!(!store.is_processed("dlp", "2024-02").unwrap());
        let txn = store.begin().unwrap();
        assert_eq!(txn.load_dataset::<Unit>().unwrap().len(), 1);
    }

    #[test]
    fn record_keys_returns_canonical_keys() {
        let mut store = Store::open_in_memory().unwrap();
        let txn = store.begin().unwrap();
        txn.insert_records(&[unit("MG", "miligram"), unit("KS", "kus")])
            .unwrap();
        let keys = txn.record_keys(Dataset::Units).unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys.contains("MG"));
        assert!(txn.record_keys(Dataset::Countries).unwrap().is_empty());
    }
}
