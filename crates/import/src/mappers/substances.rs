//! Mappers for the substance register and its synonym list.

use medreg_domain::entities::{Substance, SubstanceSynonym};
use medreg_domain::Dataset;

use crate::mapper::{MapContext, RowMapper};
use crate::row::{RowFailure, RowView};
use crate::schema::ColumnSpec;

pub struct SubstanceMapper;

impl RowMapper for SubstanceMapper {
    type Entity = Substance;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("code", &["KOD_LATKY", "LATKA", "KOD"]),
            ColumnSpec::required("name", &["NAZEV"]),
            ColumnSpec::optional("inn", &["INN", "NAZEV_INN"]),
            ColumnSpec::optional("addiction_code", &["ZAV", "NARVLA"]),
            ColumnSpec::optional("doping_code", &["DOP", "DOPING"]),
            ColumnSpec::optional("source_code", &["ZDROJ"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[
            Dataset::NarcoticCategories,
            Dataset::DopingFlags,
            Dataset::DataSources,
        ]
    }

    fn map(&self, row: &RowView<'_>, ctx: &MapContext<'_>) -> Result<Substance, RowFailure> {
        Ok(Substance {
            code: row.require_text("code")?,
            name: row.require_text("name")?,
            inn: row.text("inn"),
            addiction_code: row.opt_reference(
                "addiction_code",
                Dataset::NarcoticCategories,
                ctx.refs,
            )?,
            doping_code: row.opt_reference("doping_code", Dataset::DopingFlags, ctx.refs)?,
            source_code: row.opt_reference("source_code", Dataset::DataSources, ctx.refs)?,
        })
    }
}

pub struct SubstanceSynonymMapper;

impl RowMapper for SubstanceSynonymMapper {
    type Entity = SubstanceSynonym;

    fn columns(&self) -> &'static [ColumnSpec] {
        const COLUMNS: &[ColumnSpec] = &[
            ColumnSpec::required("substance_code", &["KOD_LATKY", "LATKA"]),
            ColumnSpec::required("sequence", &["SQ", "PORADI"]),
            ColumnSpec::required("name", &["NAZEV", "SYNONYMUM"]),
            ColumnSpec::optional("source_code", &["ZDROJ"]),
        ];
        COLUMNS
    }

    fn references(&self) -> &'static [Dataset] {
        &[Dataset::Substances, Dataset::DataSources]
    }

    fn map(
        &self,
        row: &RowView<'_>,
        ctx: &MapContext<'_>,
    ) -> Result<SubstanceSynonym, RowFailure> {
        // Sequences arrive zero-padded in some revisions; normalize so the
        // same synonym keeps the same business key across revisions.
        let sequence = row.require_integer("sequence")?.to_string();
        Ok(SubstanceSynonym {
            substance_code: row.reference("substance_code", Dataset::Substances, ctx.refs)?,
            sequence,
            name: row.require_text("name")?,
            source_code: row.opt_reference("source_code", Dataset::DataSources, ctx.refs)?,
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
    use medreg_domain::ReferenceEntity;

    fn refs_with(dataset: Dataset, keys: &[&str]) -> ReferenceCache {
        let mut refs = ReferenceCache::new();
        refs.ensure_loaded(dataset, || {
            Ok::<_, ()>(keys.iter().map(|k| k.to_string()).collect())
        })
        .unwrap();
        refs
    }

    fn empty(dataset: Dataset, refs: &mut ReferenceCache) {
        refs.ensure_loaded(dataset, || Ok::<_, ()>(Default::default()))
            .unwrap();
    }

    #[test]
    fn substance_with_blank_reference_columns_maps_clean() {
        let mut refs = refs_with(Dataset::NarcoticCategories, &[]);
        empty(Dataset::DopingFlags, &mut refs);
        empty(Dataset::DataSources, &mut refs);

        let table = parse_table("KOD_LATKY;NAZEV;INN;ZAV;DOP;ZDROJ\nPAR001;Paracetamolum;paracetamol;;;\n").unwrap();
        let mapped = map_rows(&SubstanceMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.entities.len(), 1);
        let substance = &mapped.entities[0];
        assert_eq!(substance.inn.as_deref(), Some("paracetamol"));
        assert_eq!(substance.addiction_code, None);
    }

    #[test]
    fn substance_rejects_an_unknown_doping_code() {
        let mut refs = refs_with(Dataset::DopingFlags, &["A"]);
        empty(Dataset::NarcoticCategories, &mut refs);
        empty(Dataset::DataSources, &mut refs);

        let table = parse_table("KOD_LATKY;NAZEV;DOP\nEPO001;Erythropoetin;Z\n").unwrap();
        let mapped = map_rows(&SubstanceMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert!(mapped.entities.is_empty());
        assert_eq!(mapped.failures[0].kind, FailureKind::UnknownReference);
        assert_eq!(mapped.failures[0].column, "doping_code");
    }

    #[test]
    fn synonym_sequence_is_normalized_to_a_plain_integer() {
        let mut refs = refs_with(Dataset::Substances, &["PAR001"]);
        empty(Dataset::DataSources, &mut refs);

        let table = parse_table("KOD_LATKY;SQ;NAZEV\nPAR001;01;Acetaminofen\n").unwrap();
        let mapped =
            map_rows(&SubstanceSynonymMapper, &table, &MapContext { refs: &refs }).unwrap();

        let synonym = &mapped.entities[0];
        assert_eq!(synonym.sequence, "1");
        assert_eq!(synonym.business_key().canonical(), "PAR001|1");
    }

    #[test]
    fn synonym_with_a_garbled_sequence_is_invalid_format() {
        let mut refs = refs_with(Dataset::Substances, &["PAR001"]);
        empty(Dataset::DataSources, &mut refs);

        let table = parse_table("KOD_LATKY;SQ;NAZEV\nPAR001;1a;Acetaminofen\n").unwrap();
        let mapped =
            map_rows(&SubstanceSynonymMapper, &table, &MapContext { refs: &refs }).unwrap();

        assert_eq!(mapped.failures[0].kind, FailureKind::InvalidFormat);
        assert_eq!(mapped.failures[0].column, "sequence");
    }
}
