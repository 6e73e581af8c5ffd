use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use medreg_domain::{AttributeChange, NewRecord, Persisted, ReferenceEntity, TemporaryAbsence};

use crate::error::ReconError;
use crate::outcome::{ReconOutcome, ReconSummary};

/// Diff one freshly imported snapshot against the full persisted set of the
/// same entity type.
///
/// Classifies every business key as new, unchanged, updated, reactivated,
/// newly-missing, or already-missing, and emits one AttributeChange per
/// differing business attribute plus one TemporaryAbsence per reactivation.
/// The engine is the sole writer of `first_seen` and `missing_since`:
/// inserts get `first_seen = valid_from`, updates keep identity from the
/// persisted record.
pub fn reconcile<T: ReferenceEntity>(
    existing: Vec<Persisted<T>>,
    imported: Vec<T>,
    valid_from: NaiveDate,
) -> Result<ReconOutcome<T>, ReconError> {
    // The day every reactivated record was last absent.
    let last_absent_day = valid_from.pred_opt().ok_or(ReconError::ValidFromOutOfRange {
        dataset: T::DATASET,
        valid_from,
    })?;

    // Index the persisted set by canonical key. BTreeMap keeps the leftover
    // pass (and therefore the write order) deterministic.
    let mut remaining: BTreeMap<String, Persisted<T>> = BTreeMap::new();
    for record in existing {
        let key = record.entity.business_key().canonical();
        if remaining.insert(key.clone(), record).is_some() {
            return Err(ReconError::DuplicatePersistedKey {
                dataset: T::DATASET,
                key,
            });
        }
    }

    let mut inserts: Vec<NewRecord<T>> = Vec::new();
    let mut updates: Vec<Persisted<T>> = Vec::new();
    let mut attribute_changes: Vec<AttributeChange> = Vec::new();
    let mut absences: Vec<TemporaryAbsence> = Vec::new();
    let mut summary = ReconSummary::default();
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for entity in imported {
        let key = entity.business_key().canonical();
        if !seen.insert(key.clone()) {
            return Err(ReconError::DuplicateImportedKey {
                dataset: T::DATASET,
                key,
            });
        }

        let mut record = match remaining.remove(&key) {
            None => {
                summary.new += 1;
                inserts.push(NewRecord {
                    entity,
                    first_seen: valid_from,
                });
                continue;
            }
            Some(record) => record,
        };

        let changes = record.entity.diff(&entity);
        if changes.is_empty() && record.missing_since.is_none() {
            summary.unchanged += 1;
            continue;
        }

        if !changes.is_empty() {
            summary.updated += 1;
            for change in changes {
                attribute_changes.push(AttributeChange {
                    dataset: T::DATASET,
                    record: record.id,
                    attribute: change.field,
                    old_value: change.old,
                    new_value: change.new,
                    valid_from,
                });
            }
        }

        // Reactivation applies with or without attribute changes.
        if let Some(missing_since) = record.missing_since.take() {
            if missing_since > last_absent_day {
                return Err(ReconError::OutOfOrderSnapshot {
                    dataset: T::DATASET,
                    key,
                    missing_since,
                    valid_from,
                });
            }
            summary.reactivated += 1;
            absences.push(TemporaryAbsence {
                dataset: T::DATASET,
                record: record.id,
                missing_from: missing_since,
                missing_to: last_absent_day,
            });
        }

        record.entity = entity;
        updates.push(record);
    }

    // Keys never visited by the loop above: present in the store, absent
    // from the snapshot.
    for (_, mut record) in remaining {
        if record.missing_since.is_none() {
            record.missing_since = Some(valid_from);
            summary.newly_missing += 1;
            updates.push(record);
        } else {
            summary.already_missing += 1;
        }
    }

    summary.attribute_changes = attribute_changes.len();
    summary.absences = absences.len();

    Ok(ReconOutcome {
        inserts,
        updates,
        attribute_changes,
        absences,
        summary,
    })
}
