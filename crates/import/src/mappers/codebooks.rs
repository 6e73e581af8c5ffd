//! Mappers for the registry codebooks. All of them are small code+name
//! tables; a handful carry an English name, a decree reference, or a flag.

use medreg_domain::entities::{
    AdministrationRoute, AtcGroup, CompositionFlag, Country, DataSource, DispenseMode, District,
    DopingFlag, DosageForm, IndicationGroup, LegalBasis, NarcoticCategory, PackageType, Region,
    RegistrationProcedure, RegistrationStatus, SaltForm, Unit,
};
use medreg_domain::Dataset;

use crate::mapper::{MapContext, RowMapper};
use crate::row::{RowFailure, RowView};
use crate::schema::ColumnSpec;

// ---------------------------------------------------------------------------
// Countries
// ---------------------------------------------------------------------------

pub struct CountryMapper;

impl RowMapper for CountryMapper {
    type Entity = Country;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["ZEM", "ZEME", "KOD_ZEME"]),
            ColumnSpec::required("name", &["NAZEV", "NAZEV_ZEME"]),
            ColumnSpec::optional("name_en", &["NAZEV_EN", "NAZEV_ANGL"]),
            ColumnSpec::optional("edqm_code", &["KOD_EDQM", "EDQM"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<Country, RowFailure> {
        Ok(Country {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            name_en: row.text("name_en"),
            edqm_code: row.text("edqm_code"),
        })
    }
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

pub struct UnitMapper;

impl RowMapper for UnitMapper {
    type Entity = Unit;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["UN", "JEDNOTKA", "KOD"]),
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

// ---------------------------------------------------------------------------
// Dosage forms
// ---------------------------------------------------------------------------

pub struct DosageFormMapper;

impl RowMapper for DosageFormMapper {
    type Entity = DosageForm;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["FORMA", "LEKOVA_FORMA", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("name_en", &["NAZEV_EN", "NAZEV_ANGL"]),
            ColumnSpec::optional("is_cannabis", &["JE_KONOPI", "KONOPI"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<DosageForm, RowFailure> {
        Ok(DosageForm {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            name_en: row.text("name_en"),
            is_cannabis: row.flag("is_cannabis"),
        })
    }
}

// ---------------------------------------------------------------------------
// Administration routes
// ---------------------------------------------------------------------------

pub struct AdministrationRouteMapper;

impl RowMapper for AdministrationRouteMapper {
    type Entity = AdministrationRoute;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["CESTA", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("name_en", &["NAZEV_EN", "NAZEV_ANGL"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<AdministrationRoute, RowFailure> {
        Ok(AdministrationRoute {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            name_en: row.text("name_en"),
        })
    }
}

// ---------------------------------------------------------------------------
// Package types
// ---------------------------------------------------------------------------

pub struct PackageTypeMapper;

impl RowMapper for PackageTypeMapper {
    type Entity = PackageType;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["OBAL", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<PackageType, RowFailure> {
        Ok(PackageType {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// ATC groups
// ---------------------------------------------------------------------------

pub struct AtcGroupMapper;

impl RowMapper for AtcGroupMapper {
    type Entity = AtcGroup;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["ATC", "KOD_ATC", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("name_en", &["NAZEV_EN", "NAZEV_ANGL"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<AtcGroup, RowFailure> {
        Ok(AtcGroup {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            name_en: row.text("name_en"),
        })
    }
}

// ---------------------------------------------------------------------------
// Indication groups
// ---------------------------------------------------------------------------

pub struct IndicationGroupMapper;

impl RowMapper for IndicationGroupMapper {
    type Entity = IndicationGroup;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["INDSK", "INDIKACNI_SKUPINA", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<IndicationGroup, RowFailure> {
        Ok(IndicationGroup {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Dispense modes
// ---------------------------------------------------------------------------

pub struct DispenseModeMapper;

impl RowMapper for DispenseModeMapper {
    type Entity = DispenseMode;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["VYDEJ", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<DispenseMode, RowFailure> {
        Ok(DispenseMode {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Registration statuses
// ---------------------------------------------------------------------------

pub struct RegistrationStatusMapper;

impl RowMapper for RegistrationStatusMapper {
    type Entity = RegistrationStatus;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["STAVREG", "STAV_REGISTRACE", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<RegistrationStatus, RowFailure> {
        Ok(RegistrationStatus {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Registration procedures
// ---------------------------------------------------------------------------

pub struct RegistrationProcedureMapper;

impl RowMapper for RegistrationProcedureMapper {
    type Entity = RegistrationProcedure;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["REGPROC", "ZPUSOB_REGISTRACE", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<RegistrationProcedure, RowFailure> {
        Ok(RegistrationProcedure {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Legal bases
// ---------------------------------------------------------------------------

pub struct LegalBasisMapper;

impl RowMapper for LegalBasisMapper {
    type Entity = LegalBasis;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["PRAVNI_ZAKLAD", "ZAKLAD", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<LegalBasis, RowFailure> {
        Ok(LegalBasis {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Doping flags
// ---------------------------------------------------------------------------

pub struct DopingFlagMapper;

impl RowMapper for DopingFlagMapper {
    type Entity = DopingFlag;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["DOPING", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<DopingFlag, RowFailure> {
        Ok(DopingFlag {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Narcotic categories
// ---------------------------------------------------------------------------

pub struct NarcoticCategoryMapper;

impl RowMapper for NarcoticCategoryMapper {
    type Entity = NarcoticCategory;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["NARVLA", "ZAV", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("decree", &["VYHLASKA", "PRILOHA"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<NarcoticCategory, RowFailure> {
        Ok(NarcoticCategory {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            decree: row.text("decree"),
        })
    }
}

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

pub struct DataSourceMapper;

impl RowMapper for DataSourceMapper {
    type Entity = DataSource;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["ZDROJ", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<DataSource, RowFailure> {
        Ok(DataSource {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Composition flags
// ---------------------------------------------------------------------------

pub struct CompositionFlagMapper;

impl RowMapper for CompositionFlagMapper {
    type Entity = CompositionFlag;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["S", "PRIZNAK", "KOD"]),
            ColumnSpec::required("meaning", &["VYZNAM", "NAZEV"]),
        ];
        COLUMNS
    }

    fn map(
        &self,
        row: &RowView<'_>,
        _ctx: &MapContext<'_>,
    ) -> Result<CompositionFlag, RowFailure> {
        Ok(CompositionFlag {
            code: row.require_text("code")?,
            meaning: row.require_text("meaning")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Salt forms
// ---------------------------------------------------------------------------

pub struct SaltFormMapper;

impl RowMapper for SaltFormMapper {
    type Entity = SaltForm;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["SUL", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<SaltForm, RowFailure> {
        Ok(SaltForm {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Regions and districts (pharmacy family)
// ---------------------------------------------------------------------------

pub struct RegionMapper;

impl RowMapper for RegionMapper {
    type Entity = Region;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_KRAJE", "KRAJ", "KOD"]),
            ColumnSpec::required("name", &["NAZEV", "NAZEV_KRAJE"]),
        ];
        COLUMNS
    }

    fn map(&self, row: &RowView<'_>, _ctx: &MapContext<'_>) -> Result<Region, RowFailure> {
        Ok(Region {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
        })
    }
}

pub struct DistrictMapper;

impl RowMapper for DistrictMapper {
    type Entity = District;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_OKRESU", "OKRES", "KOD"]),
            ColumnSpec::required("name", &["NAZEV", "NAZEV_OKRESU"]),
            ColumnSpec::required("region_code", &["KOD_KRAJE", "KRAJ"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[Dataset::Regions]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<District, RowFailure> {
        Ok(District {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            region_code: row.reference("region_code", Dataset::Regions, ctx.refs)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ReferenceCache;
    use crate::decode::parse_table;
    use crate::mapper::map_rows;
    use crate::row::FailureKind;

    fn no_refs() -> ReferenceCache {
        ReferenceCache::new()
    }

    #[test]
    fn country_maps_optional_columns_when_present() {
        let table =
            parse_table("ZEM;NAZEV;NAZEV_EN;KOD_EDQM\nCZ;Česko;Czechia;CZE\nXX;Neznámo;;\n")
                .unwrap();
        let refs = no_refs();
        let mapped = map_rows(&CountryMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.entities.len(), 2);
        assert_eq!(mapped.entities[0].name_en.as_deref(), Some("Czechia"));
        assert_eq!(mapped.entities[1].name_en, None);
        assert_eq!(mapped.entities[1].edqm_code, None);
    }

    #[test]
    fn country_accepts_an_older_header_spelling() {
        let table = parse_table("KOD_ZEME;NAZEV\nDE;Německo\n").unwrap();
        let refs = no_refs();
        let mapped = map_rows(&CountryMapper, &table, &MapContext { refs: &refs }).unwrap();
        assert_eq!(mapped.entities[0].code, "DE");
    }

    #[test]
    fn dosage_form_cannabis_flag_defaults_to_false_without_the_column() {
        let table = parse_table("FORMA;NAZEV\nTBL;Tableta\n").unwrap();
        let refs = no_refs();
        let mapped = map_rows(&DosageFormMapper, &table, &MapContext { refs: &refs }).unwrap();
        assert!(!mapped.entities[0].is_cannabis);
    }

    #[test]
    fn dosage_form_cannabis_flag_reads_the_yes_marker() {
        let table = parse_table("FORMA;NAZEV;JE_KONOPI\nKNP;Konopí;X\n").unwrap();
        let refs = no_refs();
        let mapped = map_rows(&DosageFormMapper, &table, &MapContext { refs: &refs }).unwrap();
        assert!(mapped.entities[0].is_cannabis);
    }

    #[test]
    fn district_requires_a_known_region() {
        let mut refs = ReferenceCache::new();
        refs.ensure_loaded(Dataset::Regions, || {
            Ok::<_, ()>(["CZ010".to_string()].into_iter().collect())
        })
        .unwrap();

        let table = parse_table(
            "KOD_OKRESU;NAZEV;KOD_KRAJE\nCZ0100;Praha;CZ010\nCZ0999;Nikde;CZ999\n",
        )
        .unwrap();
        let mapped = map_rows(&DistrictMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.entities.len(), 1);
        assert_eq!(mapped.entities[0].region_code, "CZ010");
        assert_eq!(mapped.failures.len(), 1);
        assert_eq!(mapped.failures[0].kind, FailureKind::UnknownReference);
        assert_eq!(mapped.failures[0].column, "region_code");
    }
}
