use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::{FieldChange, FieldDiff};
use crate::key::BusinessKey;
use crate::record::ReferenceEntity;

/// Manufacturer or marketing-authorisation holder (`dlp_organizace`).
///
/// Organisation codes are only unique within a country, so the business key
/// is the code+country pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub code: String,
    pub country_code: String,
    pub name: String,
    pub is_manufacturer: bool,
    pub is_mah: bool,
}

impl ReferenceEntity for Organisation {
    const DATASET: Dataset = Dataset::Organisations;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::pair(&self.code, &self.country_code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.field("is_manufacturer", &self.is_manufacturer, &next.is_manufacturer);
        d.field("is_mah", &self.is_mah, &next.is_mah);
        d.into_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_code_different_country_is_a_different_key() {
        let at = Organisation {
            code: "GNP".into(),
            country_code: "AT".into(),
            name: "G.N. Pharm".into(),
            is_manufacturer: true,
            is_mah: false,
        };
        let mut cz = at.clone();
        cz.country_code = "CZ".into();
        assert_ne!(at.business_key(), cz.business_key());
    }

    #[test]
    fn role_flags_are_business_attributes() {
        let old = Organisation {
            code: "GNP".into(),
            country_code: "AT".into(),
            name: "G.N. Pharm".into(),
            is_manufacturer: true,
            is_mah: false,
        };
        let mut new = old.clone();
        new.is_mah = true;
        let changes = old.diff(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "is_mah");
        assert_eq!(changes[0].old, "false");
        assert_eq!(changes[0].new, "true");
    }
}
