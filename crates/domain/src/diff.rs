use std::fmt;

use serde::Serialize;

/// One business attribute whose value differs between the persisted and the
/// imported version of a record. Values arrive stringified; comparison has
/// already happened on the typed values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub field: &'static str,
    pub old: String,
    pub new: String,
}

/// Builder used by `ReferenceEntity::diff` implementations: push each
/// attribute pair, keep only the ones that actually differ.
#[derive(Debug, Default)]
pub struct FieldDiff {
    changes: Vec<FieldChange>,
}

impl FieldDiff {
    pub fn new() -> FieldDiff {
        FieldDiff::default()
    }

    /// Mandatory attribute: compared by value, stringified on difference.
    pub fn field<T>(&mut self, field: &'static str, old: &T, new: &T) -> &mut FieldDiff
    where
        T: PartialEq + fmt::Display,
    {
        if old != new {
            self.changes.push(FieldChange {
                field,
                old: old.to_string(),
                new: new.to_string(),
            });
        }
        self
    }

    /// Optional attribute: absent values render as the empty string, which
    /// is stable because row mapping already normalizes blank to absent.
    pub fn opt<T>(&mut self, field: &'static str, old: &Option<T>, new: &Option<T>) -> &mut FieldDiff
    where
        T: PartialEq + fmt::Display,
    {
        if old != new {
            self.changes.push(FieldChange {
                field,
                old: render_opt(old),
                new: render_opt(new),
            });
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn into_changes(self) -> Vec<FieldChange> {
        self.changes
    }
}

fn render_opt<T: fmt::Display>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_produce_no_change() {
        let mut diff = FieldDiff::new();
        diff.field("name", &"Tablet", &"Tablet");
        diff.opt("name_en", &Some("Tablet"), &Some("Tablet"));
        diff.opt::<String>("edqm", &None, &None);
        assert!(diff.is_empty());
    }

    #[test]
    fn differing_values_are_stringified() {
        let mut diff = FieldDiff::new();
        diff.field("name", &"Tablet", &"Tablets");
        let changes = diff.into_changes();
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "name");
        assert_eq!(changes[0].old, "Tablet");
        assert_eq!(changes[0].new, "Tablets");
    }

    #[test]
    fn absent_renders_as_empty_string() {
        let mut diff = FieldDiff::new();
        diff.opt("inn", &None, &Some("paracetamolum"));
        let changes = diff.into_changes();
        assert_eq!(changes[0].old, "");
        assert_eq!(changes[0].new, "paracetamolum");
    }

    #[test]
    fn numbers_compare_by_value_not_by_source_formatting() {
        // "0,10" and "0,1" map to the same f64, so no spurious change.
        let mut diff = FieldDiff::new();
        diff.opt("amount", &Some(0.10_f64), &Some(0.1_f64));
        assert!(diff.is_empty());
    }
}
