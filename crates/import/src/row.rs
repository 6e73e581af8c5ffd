use std::fmt;

use chrono::NaiveDate;
use medreg_domain::Dataset;

use crate::cache::ReferenceCache;
use crate::schema::HeaderMap;

/// Why a single row was rejected. Rejection skips the row and the import
/// carries on; these codes end up in the run summary and the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required attribute is blank or its column is absent from the file.
    MissingAttribute,
    /// The row points at a business key no persisted dataset contains.
    UnknownReference,
    /// A mandatory cell is present but does not parse as its declared type.
    InvalidFormat,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureKind::MissingAttribute => "MISSING_ATTRIBUTE",
            FailureKind::UnknownReference => "UNKNOWN_REFERENCE",
            FailureKind::InvalidFormat => "INVALID_FORMAT",
        })
    }
}

/// One rejected row, with enough context to chase it back to the file.
#[derive(Debug, Clone, PartialEq)]
pub struct RowFailure {
    pub dataset: Dataset,
    /// Physical line in the file; the header is line 1.
    pub line: usize,
    pub kind: FailureKind,
    /// Logical column name, not the physical header spelling.
    pub column: String,
    pub detail: String,
    pub raw_line: String,
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} line {}: {} on '{}': {}",
            self.dataset, self.line, self.kind, self.column, self.detail
        )
    }
}

/// One CSV record seen through the resolved header. All typed access and
/// all failure construction goes through here so every failure carries the
/// same line number and raw text.
pub struct RowView<'a> {
    dataset: Dataset,
    header: &'a HeaderMap,
    record: &'a csv::StringRecord,
    line: usize,
}

impl<'a> RowView<'a> {
    pub fn new(
        dataset: Dataset,
        header: &'a HeaderMap,
        record: &'a csv::StringRecord,
        line: usize,
    ) -> Self {
        RowView { dataset, header, record, line }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn raw_line(&self) -> String {
        self.record.iter().collect::<Vec<_>>().join(";")
    }

    // -----------------------------------------------------------------------
    // Failure constructors
    // -----------------------------------------------------------------------

    fn failure(&self, kind: FailureKind, column: &str, detail: String) -> RowFailure {
        RowFailure {
            dataset: self.dataset,
            line: self.line,
            kind,
            column: column.to_string(),
            detail,
            raw_line: self.raw_line(),
        }
    }

    pub fn missing(&self, column: &str) -> RowFailure {
        self.failure(
            FailureKind::MissingAttribute,
            column,
            "required value is blank".to_string(),
        )
    }

    pub fn invalid(&self, column: &str, detail: impl Into<String>) -> RowFailure {
        self.failure(FailureKind::InvalidFormat, column, detail.into())
    }

    pub fn unknown_reference(&self, column: &str, target: Dataset, key: &str) -> RowFailure {
        self.failure(
            FailureKind::UnknownReference,
            column,
            format!("no {} record with key '{}'", target, key),
        )
    }

    // -----------------------------------------------------------------------
    // Typed accessors. Blank or absent cells read as None, and an optional
    // cell that does not parse reads as None too; `require_` turns a blank
    // into MISSING_ATTRIBUTE and an unparsable value into INVALID_FORMAT.
    // -----------------------------------------------------------------------

    pub fn text(&self, column: &str) -> Option<String> {
        let index = self.header.index_of(column)?;
        let cell = self.record.get(index)?.trim();
        if cell.is_empty() {
            None
        } else {
            Some(cell.to_string())
        }
    }

    pub fn require_text(&self, column: &str) -> Result<String, RowFailure> {
        self.text(column).ok_or_else(|| self.missing(column))
    }

    pub fn decimal(&self, column: &str) -> Option<f64> {
        self.text(column)?.replace(',', ".").parse().ok()
    }

    pub fn require_decimal(&self, column: &str) -> Result<f64, RowFailure> {
        let cell = self.require_text(column)?;
        cell.replace(',', ".")
            .parse()
            .map_err(|_| self.invalid(column, format!("'{}' is not a decimal number", cell)))
    }

    pub fn integer(&self, column: &str) -> Option<i64> {
        self.text(column)?.parse().ok()
    }

    pub fn require_integer(&self, column: &str) -> Result<i64, RowFailure> {
        let cell = self.require_text(column)?;
        cell.parse()
            .map_err(|_| self.invalid(column, format!("'{}' is not an integer", cell)))
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        parse_national_date(&self.text(column)?)
    }

    pub fn require_date(&self, column: &str) -> Result<NaiveDate, RowFailure> {
        let cell = self.require_text(column)?;
        parse_national_date(&cell)
            .ok_or_else(|| self.invalid(column, format!("'{}' is not a date", cell)))
    }

    /// Boolean markers: the files write X, A or 1 for yes and leave the
    /// cell blank (or write anything else) for no.
    pub fn flag(&self, column: &str) -> bool {
        match self.text(column) {
            Some(cell) => ["X", "A", "1"]
                .iter()
                .any(|yes| cell.eq_ignore_ascii_case(yes)),
            None => false,
        }
    }

    /// A required foreign key: must be present and must exist in the
    /// persisted target dataset.
    pub fn reference(
        &self,
        column: &str,
        target: Dataset,
        refs: &ReferenceCache,
    ) -> Result<String, RowFailure> {
        let key = self.require_text(column)?;
        if refs.contains(target, &key) {
            Ok(key)
        } else {
            Err(self.unknown_reference(column, target, &key))
        }
    }

    /// An optional foreign key: blank reads as None, but a present value
    /// still has to resolve.
    pub fn opt_reference(
        &self,
        column: &str,
        target: Dataset,
        refs: &ReferenceCache,
    ) -> Result<Option<String>, RowFailure> {
        match self.text(column) {
            None => Ok(None),
            Some(key) => {
                if refs.contains(target, &key) {
                    Ok(Some(key))
                } else {
                    Err(self.unknown_reference(column, target, &key))
                }
            }
        }
    }
}

/// Dates arrive as dd.MM.yyyy; a few republished files use ISO dates, so
/// that shape is accepted too.
fn parse_national_date(cell: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(cell, "%d.%m.%Y")
        .or_else(|_| NaiveDate::parse_from_str(cell, "%Y-%m-%d"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{resolve_header, ColumnSpec};

    const COLUMNS: &[ColumnSpec] = &[
        ColumnSpec::required("code", &["KOD"]),
        ColumnSpec::required("name", &["NAZEV"]),
        ColumnSpec::optional("amount", &["MNOZSTVI"]),
        ColumnSpec::optional("since", &["PLATNOST_OD"]),
        ColumnSpec::optional("active", &["AKTIVNI"]),
        ColumnSpec::optional("country", &["ZEME"]),
    ];

    fn view_over<'a>(
        header: &'a HeaderMap,
        record: &'a csv::StringRecord,
    ) -> RowView<'a> {
        RowView::new(Dataset::Countries, header, record, 2)
    }

    fn resolved() -> HeaderMap {
        let header = csv::StringRecord::from(vec![
            "KOD", "NAZEV", "MNOZSTVI", "PLATNOST_OD", "AKTIVNI", "ZEME",
        ]);
        resolve_header(Dataset::Countries, &header, COLUMNS).unwrap()
    }

    #[test]
    fn blank_and_padded_cells_read_as_absent() {
        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ", "  ", "", "", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(view.text("code").as_deref(), Some("CZ"));
        assert_eq!(view.text("name"), None);
        let failure = view.require_text("name").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingAttribute);
        assert_eq!(failure.column, "name");
        assert_eq!(failure.line, 2);
    }

    #[test]
    fn optional_decimal_parses_the_comma_and_ignores_garbage() {
        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "12,5", "", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(view.decimal("amount"), Some(12.5));

        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "12,5,0", "", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(view.decimal("amount"), None);
    }

    #[test]
    fn mandatory_values_that_do_not_parse_fail_the_row() {
        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "12,5,0", "3/1/2024", "", ""]);
        let view = view_over(&header, &record);

        let failure = view.require_decimal("amount").unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidFormat);
        assert_eq!(failure.column, "amount");

        let failure = view.require_date("since").unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidFormat);

        // Blank stays a different failure: absent, not malformed.
        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "", "", ""]);
        let view = view_over(&header, &record);
        let failure = view.require_decimal("amount").unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingAttribute);
    }

    #[test]
    fn both_date_shapes_parse() {
        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "03.01.2024", "", ""]);
        let view = view_over(&header, &record);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        assert_eq!(view.date("since"), Some(expected));

        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "2024-01-03", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(view.date("since"), Some(expected));

        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "3/1/2024", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(view.date("since"), None);
    }

    #[test]
    fn flags_accept_the_three_yes_markers() {
        let header = resolved();
        for (cell, expected) in [("X", true), ("a", true), ("1", true), ("", false), ("N", false)] {
            let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "", cell, ""]);
            let view = view_over(&header, &record);
            assert_eq!(view.flag("active"), expected, "marker {cell:?}");
        }
    }

    #[test]
    fn references_resolve_against_the_cache() {
        let mut refs = ReferenceCache::new();
        refs.ensure_loaded(Dataset::Countries, || {
            Ok::<_, ()>(["CZ".to_string()].into_iter().collect())
        })
        .unwrap();

        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "", "", "CZ"]);
        let view = view_over(&header, &record);
        assert_eq!(view.reference("country", Dataset::Countries, &refs).unwrap(), "CZ");

        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "", "", "XX"]);
        let view = view_over(&header, &record);
        let failure = view
            .reference("country", Dataset::Countries, &refs)
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::UnknownReference);
        assert!(failure.detail.contains("XX"));

        let record = csv::StringRecord::from(vec!["CZ", "Cesko", "", "", "", ""]);
        let view = view_over(&header, &record);
        assert_eq!(
            view.opt_reference("country", Dataset::Countries, &refs).unwrap(),
            None
        );
    }

    #[test]
    fn short_records_read_missing_columns_as_absent() {
        let header = resolved();
        let record = csv::StringRecord::from(vec!["CZ"]);
        let view = view_over(&header, &record);
        assert_eq!(view.text("name"), None);
        assert_eq!(view.raw_line(), "CZ");
    }
}
