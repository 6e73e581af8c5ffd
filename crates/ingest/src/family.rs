use std::fmt;
use std::str::FromStr;

use medreg_domain::Dataset;
use medreg_import::Charset;

use crate::error::IngestError;

/// How a family's bytes arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// One ZIP with a fixed set of member CSVs.
    Zip,
    /// A single bare CSV.
    Csv,
}

/// One CSV inside a family's snapshot: which dataset it feeds and, for ZIP
/// families, the member name it is published under.
#[derive(Debug, Clone, Copy)]
pub struct Section {
    pub dataset: Dataset,
    pub member: Option<&'static str>,
}

const fn member(dataset: Dataset, name: &'static str) -> Section {
    Section {
        dataset,
        member: Some(name),
    }
}

/// A dataset family: one published snapshot artifact with a fixed charset,
/// container, and section list. The family is the unit of scheduling and of
/// the idempotency ledger; each section is reconciled on its own.
///
/// Sections are ordered so that every dataset precedes the datasets that
/// reference it. That ordering is what lets the lazily loaded reference
/// cache see sibling sections of the same snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    /// Monthly registry bundle: codebooks, substances, organisations,
    /// products, compositions.
    Dlp,
    /// Pharmacy register with its region and district codebooks.
    Pharmacies,
    /// Wholesale distributor list.
    Distributors,
}

pub const ALL_FAMILIES: [Family; 3] = [Family::Dlp, Family::Pharmacies, Family::Distributors];

impl Family {
    pub fn code(&self) -> &'static str {
        match self {
            Family::Dlp => "dlp",
            Family::Pharmacies => "pharmacies",
            Family::Distributors => "distributors",
        }
    }

    pub fn from_code(code: &str) -> Option<Family> {
        ALL_FAMILIES.into_iter().find(|f| f.code() == code)
    }

    /// Charset is a property of the family, never sniffed from the bytes.
    pub fn charset(&self) -> Charset {
        match self {
            Family::Dlp => Charset::Windows1250,
            Family::Pharmacies | Family::Distributors => Charset::Utf8,
        }
    }

    pub fn container(&self) -> Container {
        match self {
            Family::Dlp | Family::Pharmacies => Container::Zip,
            Family::Distributors => Container::Csv,
        }
    }

    pub fn sections(&self) -> &'static [Section] {
        match self {
            Family::Dlp => {
                const SECTIONS: &[Section] = &[
                    member(Dataset::Units, "dlp_jednotky.csv"),
                    member(Dataset::Countries, "dlp_zeme.csv"),
                    member(Dataset::AtcGroups, "dlp_atc.csv"),
                    member(Dataset::DosageForms, "dlp_formy.csv"),
                    member(Dataset::AdministrationRoutes, "dlp_cesty.csv"),
                    member(Dataset::PackageTypes, "dlp_obaly.csv"),
                    member(Dataset::IndicationGroups, "dlp_indikacni_skupiny.csv"),
                    member(Dataset::DispenseModes, "dlp_vydej.csv"),
                    member(Dataset::RegistrationStatuses, "dlp_stavy_registrace.csv"),
                    member(Dataset::RegistrationProcedures, "dlp_regproc.csv"),
                    member(Dataset::LegalBases, "dlp_pravni_zaklad.csv"),
                    member(Dataset::DopingFlags, "dlp_doping.csv"),
                    member(Dataset::NarcoticCategories, "dlp_narvla.csv"),
                    member(Dataset::DataSources, "dlp_zdroje.csv"),
                    member(Dataset::CompositionFlags, "dlp_slozeni_priznak.csv"),
                    member(Dataset::SaltForms, "dlp_soli.csv"),
                    member(Dataset::Substances, "dlp_latky.csv"),
                    member(Dataset::SubstanceSynonyms, "dlp_synonyma.csv"),
                    member(Dataset::Organisations, "dlp_organizace.csv"),
                    member(Dataset::MedicinalProducts, "dlp_lecivepripravky.csv"),
                    member(Dataset::ProductCompositions, "dlp_slozeni.csv"),
                ];
                SECTIONS
            }
            Family::Pharmacies => {
                const SECTIONS: &[Section] = &[
                    member(Dataset::Regions, "kraje.csv"),
                    member(Dataset::Districts, "okresy.csv"),
                    member(Dataset::Pharmacies, "lekarny.csv"),
                ];
                SECTIONS
            }
            Family::Distributors => &[Section {
                dataset: Dataset::Distributors,
                member: None,
            }],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Family {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::from_code(s).ok_or_else(|| IngestError::UnknownFamily {
            code: s.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use medreg_domain::ALL_DATASETS;

    #[test]
    fn every_dataset_belongs_to_exactly_one_family() {
        let mut seen = HashSet::new();
        for family in ALL_FAMILIES {
            for section in family.sections() {
                assert!(
                    seen.insert(section.dataset),
                    "{} scheduled twice",
                    section.dataset
                );
            }
        }
        assert_eq!(seen.len(), ALL_DATASETS.len());
    }

    #[test]
    fn zip_families_name_every_member() {
        for family in ALL_FAMILIES {
            for section in family.sections() {
                match family.container() {
                    Container::Zip => assert!(section.member.is_some()),
                    Container::Csv => assert!(section.member.is_none()),
                }
            }
        }
    }

    #[test]
    fn family_codes_round_trip() {
        for family in ALL_FAMILIES {
            assert_eq!(family.code().parse::<Family>().unwrap(), family);
        }
        assert!("dpl".parse::<Family>().is_err());
    }
}
