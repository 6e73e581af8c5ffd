use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// One reference-entity type with its own table, alias lists, and
/// reconciliation cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dataset {
    Countries,
    Units,
    DosageForms,
    AdministrationRoutes,
    PackageTypes,
    AtcGroups,
    IndicationGroups,
    DispenseModes,
    RegistrationStatuses,
    RegistrationProcedures,
    LegalBases,
    DopingFlags,
    NarcoticCategories,
    DataSources,
    CompositionFlags,
    SaltForms,
    Regions,
    Districts,
    Substances,
    SubstanceSynonyms,
    Organisations,
    MedicinalProducts,
    ProductCompositions,
    Pharmacies,
    Distributors,
}

/// Every dataset, in no particular order. Processing order is a property of
/// the dataset family, not of this list.
pub const ALL_DATASETS: [Dataset; 25] = [
    Dataset::Countries,
    Dataset::Units,
    Dataset::DosageForms,
    Dataset::AdministrationRoutes,
    Dataset::PackageTypes,
    Dataset::AtcGroups,
    Dataset::IndicationGroups,
    Dataset::DispenseModes,
    Dataset::RegistrationStatuses,
    Dataset::RegistrationProcedures,
    Dataset::LegalBases,
    Dataset::DopingFlags,
    Dataset::NarcoticCategories,
    Dataset::DataSources,
    Dataset::CompositionFlags,
    Dataset::SaltForms,
    Dataset::Regions,
    Dataset::Districts,
    Dataset::Substances,
    Dataset::SubstanceSynonyms,
    Dataset::Organisations,
    Dataset::MedicinalProducts,
    Dataset::ProductCompositions,
    Dataset::Pharmacies,
    Dataset::Distributors,
];

impl Dataset {
    /// Stable identifier used in the database, logs, JSON output, and on the
    /// command line.
    pub fn code(&self) -> &'static str {
        match self {
            Dataset::Countries => "countries",
            Dataset::Units => "units",
            Dataset::DosageForms => "dosage-forms",
            Dataset::AdministrationRoutes => "administration-routes",
            Dataset::PackageTypes => "package-types",
            Dataset::AtcGroups => "atc-groups",
            Dataset::IndicationGroups => "indication-groups",
            Dataset::DispenseModes => "dispense-modes",
            Dataset::RegistrationStatuses => "registration-statuses",
            Dataset::RegistrationProcedures => "registration-procedures",
            Dataset::LegalBases => "legal-bases",
            Dataset::DopingFlags => "doping-flags",
            Dataset::NarcoticCategories => "narcotic-categories",
            Dataset::DataSources => "data-sources",
            Dataset::CompositionFlags => "composition-flags",
            Dataset::SaltForms => "salt-forms",
            Dataset::Regions => "regions",
            Dataset::Districts => "districts",
            Dataset::Substances => "substances",
            Dataset::SubstanceSynonyms => "substance-synonyms",
            Dataset::Organisations => "organisations",
            Dataset::MedicinalProducts => "medicinal-products",
            Dataset::ProductCompositions => "product-compositions",
            Dataset::Pharmacies => "pharmacies",
            Dataset::Distributors => "distributors",
        }
    }

    pub fn from_code(code: &str) -> Option<Dataset> {
        ALL_DATASETS.iter().copied().find(|d| d.code() == code)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Dataset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dataset::from_code(s).ok_or_else(|| format!("unknown dataset '{}'", s))
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}
