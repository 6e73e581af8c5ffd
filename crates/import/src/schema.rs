use std::collections::HashMap;

use medreg_domain::Dataset;

use crate::error::ImportError;

/// One logical column of a dataset: the name mappers address it by, plus
/// every header spelling the publisher has used for it over the years.
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub required: bool,
}

impl ColumnSpec {
    pub const fn required(name: &'static str, aliases: &'static [&'static str]) -> Self {
        ColumnSpec { name, aliases, required: true }
    }

    pub const fn optional(name: &'static str, aliases: &'static [&'static str]) -> Self {
        ColumnSpec { name, aliases, required: false }
    }
}

/// Logical column name to physical index, resolved once per file and shared
/// by every row of that file.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    indexes: HashMap<&'static str, usize>,
}

impl HeaderMap {
    pub fn index_of(&self, logical: &str) -> Option<usize> {
        self.indexes.get(logical).copied()
    }
}

fn normalize(cell: &str) -> &str {
    cell.trim_start_matches('\u{feff}').trim()
}

/// Match each logical column against the physical header. The earliest
/// header cell matching any alias wins, so the order of the alias list
/// never changes the outcome. A required column with no matching alias
/// fails the whole dataset.
pub fn resolve_header(
    dataset: Dataset,
    header: &csv::StringRecord,
    columns: &[ColumnSpec],
) -> Result<HeaderMap, ImportError> {
    let cells: Vec<&str> = header.iter().map(normalize).collect();

    let mut map = HeaderMap::default();
    for column in columns {
        let found = cells.iter().position(|cell| {
            column
                .aliases
                .iter()
                .any(|alias| cell.eq_ignore_ascii_case(alias))
        });
        match found {
            Some(index) => {
                map.indexes.insert(column.name, index);
            }
            None if column.required => {
                return Err(ImportError::RequiredColumnMissing {
                    dataset,
                    column: column.name,
                    aliases: column.aliases,
                    header: cells.iter().map(|c| c.to_string()).collect(),
                });
            }
            None => {}
        }
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::required("code", &["KOD_ZEME", "ZEME", "KOD"]),
        ColumnSpec::required("name", &["NAZEV", "NAZEV_ZEME"]),
        ColumnSpec::optional("name_en", &["NAZEV_EN", "NAZEV_ANGL"]),
    ];

    fn header(cells: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cells.to_vec())
    }

    #[test]
    fn earliest_matching_header_cell_wins() {
        // Two aliases of the same column present: the one at the lower
        // physical index wins regardless of alias list order.
        let map = resolve_header(
            Dataset::Countries,
            &header(&["KOD", "NAZEV", "ZEME"]),
            COLUMNS,
        )
        .unwrap();
        assert_eq!(map.index_of("code"), Some(0));
        assert_eq!(map.index_of("name"), Some(1));
    }

    #[test]
    fn alias_list_order_does_not_matter() {
        let reversed: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD", "ZEME", "KOD_ZEME"]),
            ColumnSpec::required("name", &["NAZEV_ZEME", "NAZEV"]),
        ];
        let cells = header(&["ZEME", "NAZEV"]);
        let a = resolve_header(Dataset::Countries, &cells, COLUMNS).unwrap();
        let b = resolve_header(Dataset::Countries, &cells, reversed).unwrap();
        assert_eq!(a.index_of("code"), b.index_of("code"));
        assert_eq!(a.index_of("name"), b.index_of("name"));
    }

    #[test]
    fn matching_ignores_case_bom_and_padding() {
        let map = resolve_header(
            Dataset::Countries,
            &header(&["\u{feff}zeme", " Nazev ", "nazev_en"]),
            COLUMNS,
        )
        .unwrap();
        assert_eq!(map.index_of("code"), Some(0));
        assert_eq!(map.index_of("name"), Some(1));
        assert_eq!(map.index_of("name_en"), Some(2));
    }

    #[test]
    fn missing_optional_column_resolves_to_none() {
        let map = resolve_header(Dataset::Countries, &header(&["ZEME", "NAZEV"]), COLUMNS).unwrap();
        assert_eq!(map.index_of("name_en"), None);
    }

    #[test]
    fn missing_required_column_names_every_alias() {
        let err = resolve_header(Dataset::Countries, &header(&["NAZEV"]), COLUMNS).unwrap_err();
        match err {
            ImportError::RequiredColumnMissing { dataset, column, aliases, header } => {
                assert_eq!(dataset, Dataset::Countries);
                assert_eq!(column, "code");
                assert_eq!(aliases, &["KOD_ZEME", "ZEME", "KOD"]);
                assert_eq!(header, vec!["NAZEV".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unknown_logical_name_is_none() {
        let map = resolve_header(Dataset::Countries, &header(&["ZEME", "NAZEV"]), COLUMNS).unwrap();
        assert_eq!(map.index_of("registered_since"), None);
    }
}
