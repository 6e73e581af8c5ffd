use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::{FieldChange, FieldDiff};
use crate::key::BusinessKey;
use crate::record::ReferenceEntity;

/// One marketed package of a medicinal product (`dlp_lecivepripravky`),
/// keyed by the seven-digit registry code. The widest entity in the bundle;
/// most attributes are codes into the codebook datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicinalProduct {
    pub code: String,
    pub name: String,
    pub strength: Option<String>,
    pub form_code: Option<String>,
    pub route_code: Option<String>,
    pub package: Option<String>,
    pub package_type_code: Option<String>,
    pub mah_code: Option<String>,
    pub mah_country_code: Option<String>,
    pub registration_status_code: Option<String>,
    pub registration_number: Option<String>,
    pub registration_valid_to: Option<NaiveDate>,
    pub registration_procedure_code: Option<String>,
    pub legal_basis_code: Option<String>,
    pub indication_group_code: Option<String>,
    pub atc_code: Option<String>,
    pub dispense_mode_code: Option<String>,
    pub doping_code: Option<String>,
    pub narcotic_code: Option<String>,
    pub ean: Option<String>,
    pub is_supplied: bool,
    pub daily_dose_amount: Option<f64>,
    pub daily_dose_unit_code: Option<String>,
    pub daily_dose_packs: Option<f64>,
}

impl ReferenceEntity for MedicinalProduct {
    const DATASET: Dataset = Dataset::MedicinalProducts;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("strength", &self.strength, &next.strength);
        d.opt("form_code", &self.form_code, &next.form_code);
        d.opt("route_code", &self.route_code, &next.route_code);
        d.opt("package", &self.package, &next.package);
        d.opt("package_type_code", &self.package_type_code, &next.package_type_code);
        d.opt("mah_code", &self.mah_code, &next.mah_code);
        d.opt("mah_country_code", &self.mah_country_code, &next.mah_country_code);
        d.opt(
            "registration_status_code",
            &self.registration_status_code,
            &next.registration_status_code,
        );
        d.opt(
            "registration_number",
            &self.registration_number,
            &next.registration_number,
        );
        d.opt(
            "registration_valid_to",
            &self.registration_valid_to,
            &next.registration_valid_to,
        );
        d.opt(
            "registration_procedure_code",
            &self.registration_procedure_code,
            &next.registration_procedure_code,
        );
        d.opt("legal_basis_code", &self.legal_basis_code, &next.legal_basis_code);
        d.opt(
            "indication_group_code",
            &self.indication_group_code,
            &next.indication_group_code,
        );
        d.opt("atc_code", &self.atc_code, &next.atc_code);
        d.opt("dispense_mode_code", &self.dispense_mode_code, &next.dispense_mode_code);
        d.opt("doping_code", &self.doping_code, &next.doping_code);
        d.opt("narcotic_code", &self.narcotic_code, &next.narcotic_code);
        d.opt("ean", &self.ean, &next.ean);
        d.field("is_supplied", &self.is_supplied, &next.is_supplied);
        d.opt("daily_dose_amount", &self.daily_dose_amount, &next.daily_dose_amount);
        d.opt(
            "daily_dose_unit_code",
            &self.daily_dose_unit_code,
            &next.daily_dose_unit_code,
        );
        d.opt("daily_dose_packs", &self.daily_dose_packs, &next.daily_dose_packs);
        d.into_changes()
    }
}

/// One substance line of a product's composition (`dlp_slozeni`). A product
/// lists its substances as numbered lines, so the key is
/// product + substance + sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductComposition {
    pub product_code: String,
    pub substance_code: String,
    pub sequence: String,
    pub flag_code: Option<String>,
    pub salt_code: Option<String>,
    pub amount: Option<f64>,
    pub amount_unit_code: Option<String>,
    pub per_amount: Option<f64>,
    pub per_unit_code: Option<String>,
}

impl ReferenceEntity for ProductComposition {
    const DATASET: Dataset = Dataset::ProductCompositions;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::triple(&self.product_code, &self.substance_code, &self.sequence)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.opt("flag_code", &self.flag_code, &next.flag_code);
        d.opt("salt_code", &self.salt_code, &next.salt_code);
        d.opt("amount", &self.amount, &next.amount);
        d.opt("amount_unit_code", &self.amount_unit_code, &next.amount_unit_code);
        d.opt("per_amount", &self.per_amount, &next.per_amount);
        d.opt("per_unit_code", &self.per_unit_code, &next.per_unit_code);
        d.into_changes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(code: &str, name: &str) -> MedicinalProduct {
        MedicinalProduct {
            code: code.into(),
            name: name.into(),
            strength: None,
            form_code: None,
            route_code: None,
            package: None,
            package_type_code: None,
            mah_code: None,
            mah_country_code: None,
            registration_status_code: None,
            registration_number: None,
            registration_valid_to: None,
            registration_procedure_code: None,
            legal_basis_code: None,
            indication_group_code: None,
            atc_code: None,
            dispense_mode_code: None,
            doping_code: None,
            narcotic_code: None,
            ean: None,
            is_supplied: false,
            daily_dose_amount: None,
            daily_dose_unit_code: None,
            daily_dose_packs: None,
        }
    }

    #[test]
    fn date_attributes_render_iso_in_audit_entries() {
        let mut old = product("0254045", "PARALEN 500");
        let mut new = old.clone();
        old.registration_valid_to = NaiveDate::from_ymd_opt(2024, 12, 31);
        new.registration_valid_to = NaiveDate::from_ymd_opt(2026, 12, 31);
        let changes = old.diff(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, "registration_valid_to");
        assert_eq!(changes[0].old, "2024-12-31");
        assert_eq!(changes[0].new, "2026-12-31");
    }

    #[test]
    fn composition_key_is_product_substance_sequence() {
        let line = ProductComposition {
            product_code: "0254045".into(),
            substance_code: "S00123".into(),
            sequence: "1".into(),
            flag_code: None,
            salt_code: None,
            amount: Some(500.0),
            amount_unit_code: Some("MG".into()),
            per_amount: Some(1.0),
            per_unit_code: Some("TBL".into()),
        };
        assert_eq!(line.business_key().canonical(), "0254045|S00123|1");
    }

    #[test]
    fn amount_change_is_one_audit_entry() {
        let old = ProductComposition {
            product_code: "0254045".into(),
            substance_code: "S00123".into(),
            sequence: "1".into(),
            flag_code: None,
            salt_code: None,
            amount: Some(500.0),
            amount_unit_code: Some("MG".into()),
            per_amount: None,
            per_unit_code: None,
        };
        let mut new = old.clone();
        new.amount = Some(650.0);
        let changes = old.diff(&new);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].old, "500");
        assert_eq!(changes[0].new, "650");
    }
}
