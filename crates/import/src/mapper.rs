use medreg_domain::{Dataset, ReferenceEntity};

use crate::cache::ReferenceCache;
use crate::decode::Table;
use crate::error::ImportError;
use crate::row::{RowFailure, RowView};
use crate::schema::{resolve_header, ColumnSpec};

/// What a mapper can see besides its own row: the persisted business keys
/// of the datasets it validates references against.
pub struct MapContext<'a> {
    pub refs: &'a ReferenceCache,
}

/// One per dataset: declares the columns and reference targets, and turns a
/// resolved row into a bare entity. Temporal bookkeeping is none of its
/// business; the reconciliation engine owns that.
pub trait RowMapper {
    type Entity: ReferenceEntity;

    fn columns(&self) -> &'static [ColumnSpec];

    /// Datasets this mapper resolves foreign keys against. The orchestrator
    /// loads these into the cache before the first row is mapped.
    fn references(&self) -> &'static [Dataset] {
        &[]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<Self::Entity, RowFailure>;
}

/// Outcome of mapping one file: the entities that parsed, the rows that did
/// not, and the raw row count for the run summary.
#[derive(Debug)]
pub struct MappedTable<T> {
    pub entities: Vec<T>,
    pub failures: Vec<RowFailure>,
    pub rows_read: usize,
}

/// Resolve the header once, then map every data row. Row failures are
/// collected, not fatal; a required column missing from the header fails
/// the whole dataset before any row is looked at.
pub fn map_rows<M: RowMapper>(
    mapper: &M,
    table: &Table,
    ctx: &MapContext<'_>,
) -> Result<MappedTable<M::Entity>, ImportError> {
    let header = resolve_header(M::Entity::DATASET, &table.header, mapper.columns())?;

    let mut entities = Vec::with_capacity(table.rows.len());
    let mut failures = Vec::new();
    for (offset, record) in table.rows.iter().enumerate() {
        // Header occupies line 1 of the file.
        let view = RowView::new(M::Entity::DATASET, &header, record, offset + 2);
        match mapper.map(&view, ctx) {
            Ok(entity) => entities.push(entity),
            Err(failure) => failures.push(failure),
        }
    }

    Ok(MappedTable {
        entities,
        failures,
        rows_read: table.rows.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::parse_table;
    use crate::row::FailureKind;
    use medreg_domain::entities::Unit;

    struct UnitColumns;

    impl RowMapper for UnitColumns {
        type Entity = Unit;

        fn columns(&self) -> &'static [ColumnSpec] {
            const COLUMNS: &[ColumnSpec] = &[
                ColumnSpec::required("code", &["UN", "KOD"]),
                ColumnSpec::required("name", &["NAZEV"]),
            ];
            COLUMNS
        }

        fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<Unit, RowFailure> {
            Ok(Unit {
                code: row.require_text("code")?,
                name: row.require_text("name")?,
            })
        }
    }

    #[test]
    fn bad_rows_are_collected_and_good_rows_survive() {
        let table = parse_table("UN;NAZEV\nMG;miligram\n;bez kodu\nKS;kus\n").unwrap();
        let refs = ReferenceCache::new();
        let mapped = map_rows(&UnitColumns, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.rows_read, 3);
        assert_eq!(mapped.entities.len(), 2);
        assert_eq!(mapped.entities[1].code, "KS");
        assert_eq!(mapped.failures.len(), 1);
        assert_eq!(mapped.failures[0].kind, FailureKind::MissingAttribute);
        assert_eq!(mapped.failures[0].line, 3);
        assert_eq!(mapped.failures[0].raw_line, ";bez kodu");
    }

    #[test]
    fn missing_required_column_fails_before_any_row() {
        let table = parse_table("NAZEV\nmiligram\n").unwrap();
        let refs = ReferenceCache::new();
        let err = map_rows(&UnitColumns, &table, &MapContext { refs: &refs }).unwrap_err();
        assert!(matches!(err, ImportError::RequiredColumnMissing { column: "code", .. }));
    }
}
