//! Mapper for the organisation register (manufacturers and marketing
//! authorisation holders). Keyed by code plus seat country; the same short
//! code can be registered in several countries.

use medreg_domain::entities::Organisation;
use medreg_domain::Dataset;

use crate::mapper::{MapContext, RowMapper};
use crate::row::{RowFailure, RowView};
use crate::schema::ColumnSpec;

pub struct OrganisationMapper;

impl RowMapper for OrganisationMapper {
    type Entity = Organisation;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["ZKR_ORG", "KOD_ORGANIZACE", "KOD"]),
            ColumnSpec::required("country_code", &["ZEM", "ZEME", "ZEME_ORG"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("is_manufacturer", &["VYROBCE"]),
            ColumnSpec::optional("is_mah", &["DRZITEL"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[Dataset::Countries]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<Organisation, RowFailure> {
        Ok(Organisation {
            code: row.require_text("code")?,
            country_code: row.reference("country_code", Dataset::Countries, ctx.refs)?,
            name: row.require_text("name")?,
            is_manufacturer: row.flag("is_manufacturer"),
            is_mah: row.flag("is_mah"),
        })
    }
}
