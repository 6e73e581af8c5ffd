//! Mappers for the medicinal product register and its composition table.
//! These are the widest files of the bundle and the reason the alias tables
//! exist: the product header has been reshuffled repeatedly over the years.

use medreg_domain::entities::{MedicinalProduct, ProductComposition};
use medreg_domain::{BusinessKey, Dataset};

use crate::mapper::{MapContext, RowMapper};
use crate::row::{RowFailure, RowView};
use crate::schema::ColumnSpec;

pub struct MedicinalProductMapper;

impl RowMapper for MedicinalProductMapper {
    type Entity = MedicinalProduct;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_SUKL", "SUKL", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("strength", &["SILA"]),
            ColumnSpec::optional("form_code", &["FORMA", "LEKOVA_FORMA"]),
            ColumnSpec::optional("route_code", &["CESTA"]),
            ColumnSpec::optional("package", &["BALENI"]),
            ColumnSpec::optional("package_type_code", &["OBAL"]),
            ColumnSpec::optional("mah_code", &["DRZ", "DRZITEL"]),
            ColumnSpec::optional("mah_country_code", &["ZEMDRZ", "ZEME_DRZITELE"]),
            ColumnSpec::optional("registration_status_code", &["STAVREG", "STAV_REGISTRACE"]),
            ColumnSpec::optional("registration_number", &["REG", "REGISTRACNI_CISLO"]),
            ColumnSpec::optional("registration_valid_to", &["V_PLATDO", "PLATNOST_DO"]),
            ColumnSpec::optional("registration_procedure_code", &["REGPROC"]),
            ColumnSpec::optional("legal_basis_code", &["PRAVNI_ZAKLAD", "ZAKLAD"]),
            ColumnSpec::optional("indication_group_code", &["INDSK", "INDIKACNI_SKUPINA"]),
            ColumnSpec::optional("atc_code", &["ATC", "ATC_WHO"]),
            ColumnSpec::optional("dispense_mode_code", &["VYDEJ"]),
            ColumnSpec::optional("doping_code", &["DOPING"]),
            ColumnSpec::optional("narcotic_code", &["NARVLA", "ZAV"]),
            ColumnSpec::optional("ean", &["EAN", "KOD_EAN"]),
            ColumnSpec::optional("is_supplied", &["DODAVKY", "AKTIVNI"]),
            ColumnSpec::optional("daily_dose_amount", &["DDDAMNT", "DDD_MNOZSTVI"]),
            ColumnSpec::optional("daily_dose_unit_code", &["DDDUN", "DDD_JEDNOTKA"]),
            ColumnSpec::optional("daily_dose_packs", &["DDDP", "DDD_BALENI"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[
            Dataset::DosageForms,
            Dataset::AdministrationRoutes,
            Dataset::PackageTypes,
            Dataset::Organisations,
            Dataset::RegistrationStatuses,
            Dataset::RegistrationProcedures,
            Dataset::LegalBases,
            Dataset::IndicationGroups,
            Dataset::AtcGroups,
            Dataset::DispenseModes,
            Dataset::DopingFlags,
            Dataset::NarcoticCategories,
            Dataset::Units,
        ]
    }

    fn map(
        &self,
        row: &RowView<'_>,
        ctx: &MapContext<'_>,
    ) -> Result<MedicinalProduct, RowFailure> {
        // The authorisation holder is a composite reference: code plus seat
        // country. Both blank means no holder on record; one blank is a
        // broken row, not a holderless product.
        let (mah_code, mah_country_code) =
            match (row.text("mah_code"), row.text("mah_country_code")) {
                (None, None) => (None, None),
                (Some(_), None) => return Err(row.missing("mah_country_code")),
                (None, Some(_)) => return Err(row.missing("mah_code")),
                (Some(code), Some(country)) => {
                    let key = BusinessKey::pair(code.as_str(), country.as_str()).canonical();
                    if !ctx.refs.contains(Dataset::Organisations, &key) {
                        return Err(row.unknown_reference(
                            "mah_code",
                            Dataset::Organisations,
                            &key,
                        ));
                    }
                    (Some(code), Some(country))
                }
            };

        Ok(MedicinalProduct {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            strength: row.text("strength"),
            form_code: row.opt_reference("form_code", Dataset::DosageForms, ctx.refs)?,
            route_code: row.opt_reference("route_code", Dataset::AdministrationRoutes, ctx.refs)?,
            package: row.text("package"),
            package_type_code: row.opt_reference(
                "package_type_code",
                Dataset::PackageTypes,
                ctx.refs,
            )?,
            mah_code,
            mah_country_code,
            registration_status_code: row.opt_reference(
                "registration_status_code",
                Dataset::RegistrationStatuses,
                ctx.refs,
            )?,
            registration_number: row.text("registration_number"),
            registration_valid_to: row.date("registration_valid_to"),
            registration_procedure_code: row.opt_reference(
                "registration_procedure_code",
                Dataset::RegistrationProcedures,
                ctx.refs,
            )?,
            legal_basis_code: row.opt_reference(
                "legal_basis_code",
                Dataset::LegalBases,
                ctx.refs,
            )?,
            indication_group_code: row.opt_reference(
                "indication_group_code",
                Dataset::IndicationGroups,
                ctx.refs,
            )?,
            atc_code: row.opt_reference("atc_code", Dataset::AtcGroups, ctx.refs)?,
            dispense_mode_code: row.opt_reference(
                "dispense_mode_code",
                Dataset::DispenseModes,
                ctx.refs,
            )?,
            doping_code: row.opt_reference("doping_code", Dataset::DopingFlags, ctx.refs)?,
            narcotic_code: row.opt_reference(
                "narcotic_code",
                Dataset::NarcoticCategories,
                ctx.refs,
            )?,
            ean: row.text("ean"),
            is_supplied: row.flag("is_supplied"),
            daily_dose_amount: row.decimal("daily_dose_amount"),
            daily_dose_unit_code: row.opt_reference(
                "daily_dose_unit_code",
                Dataset::Units,
                ctx.refs,
            )?,
            daily_dose_packs: row.decimal("daily_dose_packs"),
        })
    }
}

pub struct ProductCompositionMapper;

impl RowMapper for ProductCompositionMapper {
    type Entity = ProductComposition;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("product_code", &["KOD_SUKL", "SUKL"]),
            ColumnSpec::required("substance_code", &["KOD_LATKY", "LATKA"]),
            ColumnSpec::required("sequence", &["SQ", "PORADI"]),
            ColumnSpec::optional("flag_code", &["S", "PRIZNAK"]),
            ColumnSpec::optional("salt_code", &["SUL"]),
            ColumnSpec::optional("amount", &["MNOZSTVI", "AMNT"]),
            ColumnSpec::optional("amount_unit_code", &["UN", "JEDNOTKA"]),
            ColumnSpec::optional("per_amount", &["MNOZSTVI_VZTAZENO", "AMNT_VZ"]),
            ColumnSpec::optional("per_unit_code", &["UN_VZ", "JEDNOTKA_VZTAZENO"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[
            Dataset::MedicinalProducts,
            Dataset::Substances,
            Dataset::CompositionFlags,
            Dataset::SaltForms,
            Dataset::Units,
        ]
    }

    fn map(
        &self,
        row: &RowView<'_>,
        ctx: &MapContext<'_>,
    ) -> Result<ProductComposition, RowFailure> {
        let sequence = row.require_integer("sequence")?.to_string();
        Ok(ProductComposition {
            product_code: row.reference("product_code", Dataset::MedicinalProducts, ctx.refs)?,
            substance_code: row.reference("substance_code", Dataset::Substances, ctx.refs)?,
            sequence,
            flag_code: row.opt_reference("flag_code", Dataset::CompositionFlags, ctx.refs)?,
            salt_code: row.opt_reference("salt_code", Dataset::SaltForms, ctx.refs)?,
            amount: row.decimal("amount"),
            amount_unit_code: row.opt_reference("amount_unit_code", Dataset::Units, ctx.refs)?,
            per_amount: row.decimal("per_amount"),
            per_unit_code: row.opt_reference("per_unit_code", Dataset::Units, ctx.refs)?,
        })
    }
}
