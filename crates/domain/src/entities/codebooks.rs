//! Registry codebooks: small code+name tables the complex entities refer to.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::{FieldChange, FieldDiff};
use crate::key::BusinessKey;
use crate::record::ReferenceEntity;

/// Country of origin (`dlp_zeme`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
    pub edqm_code: Option<String>,
}

impl ReferenceEntity for Country {
    const DATASET: Dataset = Dataset::Countries;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("name_en", &self.name_en, &next.name_en);
        d.opt("edqm_code", &self.edqm_code, &next.edqm_code);
        d.into_changes()
    }
}

/// Measurement unit (`dlp_jednotky`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for Unit {
    const DATASET: Dataset = Dataset::Units;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Dosage form (`dlp_formy`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DosageForm {
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
    pub is_cannabis: bool,
}

impl ReferenceEntity for DosageForm {
    const DATASET: Dataset = Dataset::DosageForms;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("name_en", &self.name_en, &next.name_en);
        d.field("is_cannabis", &self.is_cannabis, &next.is_cannabis);
        d.into_changes()
    }
}

/// Route of administration (`dlp_cesty`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrationRoute {
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
}

impl ReferenceEntity for AdministrationRoute {
    const DATASET: Dataset = Dataset::AdministrationRoutes;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("name_en", &self.name_en, &next.name_en);
        d.into_changes()
    }
}

/// Package type (`dlp_obaly`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageType {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for PackageType {
    const DATASET: Dataset = Dataset::PackageTypes;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Anatomical-therapeutic-chemical group (`dlp_atc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtcGroup {
    pub code: String,
    pub name: String,
    pub name_en: Option<String>,
}

impl ReferenceEntity for AtcGroup {
    const DATASET: Dataset = Dataset::AtcGroups;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("name_en", &self.name_en, &next.name_en);
        d.into_changes()
    }
}

/// Indication group (`dlp_indikacni_skupiny`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicationGroup {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for IndicationGroup {
    const DATASET: Dataset = Dataset::IndicationGroups;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Dispense mode, e.g. prescription-only (`dlp_vydej`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispenseMode {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for DispenseMode {
    const DATASET: Dataset = Dataset::DispenseModes;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Registration status (`dlp_stavy_registrace`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationStatus {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for RegistrationStatus {
    const DATASET: Dataset = Dataset::RegistrationStatuses;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Registration procedure (`dlp_regproc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationProcedure {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for RegistrationProcedure {
    const DATASET: Dataset = Dataset::RegistrationProcedures;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Legal basis of registration (`dlp_pravni_zaklad`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalBasis {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for LegalBasis {
    const DATASET: Dataset = Dataset::LegalBases;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Anti-doping classification (`dlp_doping`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DopingFlag {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for DopingFlag {
    const DATASET: Dataset = Dataset::DopingFlags;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Controlled-substance category with the decree that lists it
/// (`dlp_narvla`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarcoticCategory {
    pub code: String,
    pub name: String,
    pub decree: Option<String>,
}

impl ReferenceEntity for NarcoticCategory {
    const DATASET: Dataset = Dataset::NarcoticCategories;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("decree", &self.decree, &next.decree);
        d.into_changes()
    }
}

/// Provenance of substance data (`dlp_zdroje`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSource {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for DataSource {
    const DATASET: Dataset = Dataset::DataSources;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Composition-line qualifier (`dlp_slozeni_priznak`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionFlag {
    pub code: String,
    pub meaning: String,
}

impl ReferenceEntity for CompositionFlag {
    const DATASET: Dataset = Dataset::CompositionFlags;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("meaning", &self.meaning, &next.meaning);
        d.into_changes()
    }
}

/// Salt form of a substance (`dlp_soli`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaltForm {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for SaltForm {
    const DATASET: Dataset = Dataset::SaltForms;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// Administrative region (`kraje`), referenced by districts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub code: String,
    pub name: String,
}

impl ReferenceEntity for Region {
    const DATASET: Dataset = Dataset::Regions;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.into_changes()
    }
}

/// District (`okresy`), referenced by pharmacies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct District {
    pub code: String,
    pub name: String,
    pub region_code: String,
}

impl ReferenceEntity for District {
    const DATASET: Dataset = Dataset::Districts;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.field("region_code", &self.region_code, &next.region_code);
        d.into_changes()
    }
}
