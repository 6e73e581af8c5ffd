//! Mappers for the outlet feeds: the pharmacy register and the wholesale
//! distributor list.

use medreg_domain::entities::{Distributor, Pharmacy};
use medreg_domain::Dataset;

use crate::mapper::{MapContext, RowMapper};
use crate::row::{RowFailure, RowView};
use crate::schema::ColumnSpec;

pub struct PharmacyMapper;

impl RowMapper for PharmacyMapper {
    type Entity = Pharmacy;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_PRACOVISTE", "KOD_LEKARNY", "KOD"]),
            ColumnSpec::required("name", &["NAZEV", "NAZEV_LEKARNY"]),
            ColumnSpec::optional("street", &["ULICE"]),
            ColumnSpec::required("city", &["MESTO", "OBEC"]),
            ColumnSpec::optional("postcode", &["PSC"]),
            ColumnSpec::optional("district_code", &["KOD_OKRESU", "OKRES"]),
            ColumnSpec::optional("phone", &["TELEFON", "TEL"]),
            ColumnSpec::optional("email", &["EMAIL", "MAIL"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[Dataset::Districts]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<Pharmacy, RowFailure> {
        Ok(Pharmacy {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            street: row.text("street"),
            city: row.require_text("city")?,
            postcode: row.text("postcode"),
            district_code: row.opt_reference("district_code", Dataset::Districts, ctx.refs)?,
            phone: row.text("phone"),
            email: row.text("email"),
        })
    }
}

pub struct DistributorMapper;

impl RowMapper for DistributorMapper {
    type Entity = Distributor;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_DISTRIBUTORA", "KOD"]),
            ColumnSpec::required("name", &["NAZEV", "DISTRIBUTOR"]),
            ColumnSpec::optional("country_code", &["ZEME", "ZEM"]),
            ColumnSpec::optional("city", &["MESTO", "OBEC"]),
            ColumnSpec::optional("authorisation_number", &["CISLO_POVOLENI", "POVOLENI"]),
            ColumnSpec::optional("authorised_on", &["DATUM_POVOLENI", "POVOLENO_OD"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[Dataset::Countries]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<Distributor, RowFailure> {
        Ok(Distributor {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            country_code: row.opt_reference("country_code", Dataset::Countries, ctx.refs)?,
            city: row.text("city"),
            authorisation_number: row.text("authorisation_number"),
            authorised_on: row.date("authorised_on"),
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
    use chrono::NaiveDate;

    fn loaded(dataset: Dataset, keys: &[&str]) -> ReferenceCache {
        let mut refs = ReferenceCache::new();
        refs.ensure_loaded(dataset, || {
            Ok::<_, ()>(keys.iter().map(|k| k.to_string()).collect())
        })
        .unwrap();
        refs
    }

    #[test]
    fn pharmacy_contact_columns_stay_optional() {
        let refs = loaded(Dataset::Districts, &["CZ0100"]);
        let table = parse_table(
            "KOD_PRACOVISTE;NAZEV;ULICE;MESTO;PSC;KOD_OKRESU;TELEFON;EMAIL\n\
             L001;Lékárna U Anděla;Nádražní 1;Praha;15000;CZ0100;;\n",
        )
        .unwrap();
        let mapped = map_rows(&PharmacyMapper, &table, &MapContext { refs: &refs }).unwrap();

        let pharmacy = &mapped.entities[0];
        assert_eq!(pharmacy.district_code.as_deref(), Some("CZ0100"));
        assert_eq!(pharmacy.phone, None);
        assert_eq!(pharmacy.email, None);
    }

    #[test]
    fn pharmacy_without_a_city_is_a_missing_attribute() {
        let refs = loaded(Dataset::Districts, &[]);
        let table = parse_table("KOD;NAZEV;MESTO\nL002;Lékárna Bez Města;\n").unwrap();
        let mapped = map_rows(&PharmacyMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.failures[0].kind, FailureKind::MissingAttribute);
        assert_eq!(mapped.failures[0].column, "city");
    }

    #[test]
    fn distributor_dates_parse_in_the_national_shape() {
        let refs = loaded(Dataset::Countries, &["CZ"]);
        let table = parse_table(
            "KOD_DISTRIBUTORA;NAZEV;ZEME;MESTO;CISLO_POVOLENI;DATUM_POVOLENI\n\
             D042;Pharmos a.s.;CZ;Ostrava;sukls12345;05.06.2019\n",
        )
        .unwrap();
        let mapped = map_rows(&DistributorMapper, &table, &MapContext { refs: &refs }).unwrap();

        let distributor = &mapped.entities[0];
        assert_eq!(
            distributor.authorised_on,
            NaiveDate::from_ymd_opt(2019, 6, 5)
        );
        assert_eq!(distributor.country_code.as_deref(), Some("CZ"));
    }
}
