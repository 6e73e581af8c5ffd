use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::{FieldChange, FieldDiff};
use crate::key::BusinessKey;
use crate::record::ReferenceEntity;

/// Active or auxiliary substance (`dlp_latky`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substance {
    pub code: String,
    pub name: String,
    /// International nonproprietary name, where assigned.
    pub inn: Option<String>,
    pub addiction_code: Option<String>,
    pub doping_code: Option<String>,
    pub source_code: Option<String>,
}

impl ReferenceEntity for Substance {
    const DATASET: Dataset = Dataset::Substances;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("inn", &self.inn, &next.inn);
        d.opt("addiction_code", &self.addiction_code, &next.addiction_code);
        d.opt("doping_code", &self.doping_code, &next.doping_code);
        d.opt("source_code", &self.source_code, &next.source_code);
        d.into_changes()
    }
}

/// Alternative substance name (`dlp_synonyma`). One substance carries a
/// numbered list of synonyms, so the key is substance + sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstanceSynonym {
    pub substance_code: String,
    pub sequence: String,
    pub name: String,
    pub source_code: Option<String>,
}

impl ReferenceEntity for SubstanceSynonym {
    const DATASET: Dataset = Dataset::SubstanceSynonyms;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::pair(&self.substance_code, &self.sequence)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("source_code", &self.source_code, &next.source_code);
        d.into_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonym_key_is_composite() {
        let synonym = SubstanceSynonym {
            substance_code: "S00123".into(),
            sequence: "2".into(),
            name: "acidum acetylsalicylicum".into(),
            source_code: None,
        };
        assert_eq!(synonym.business_key().canonical(), "S00123|2");
    }

    #[test]
    fn reference_codes_participate_in_the_diff() {
        let old = Substance {
            code: "S00123".into(),
            name: "Kyselina acetylsalicylová".into(),
            inn: None,
            addiction_code: None,
            doping_code: None,
            source_code: Some("EU".into()),
        };
        let mut new = old.clone();
        new.doping_code = Some("ZAK".into());
        let changes = old.diff(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "doping_code");
    }
}
