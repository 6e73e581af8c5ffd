//! One [`RowMapper`](crate::RowMapper) per dataset. Each carries the alias
//! table of every header spelling the publisher has shipped for it, and the
//! list of datasets its rows reference.

pub mod codebooks;
pub mod organisations;
pub mod outlets;
pub mod products;
pub mod substances;

pub use codebooks::{
    AdministrationRouteMapper, AtcGroupMapper, CompositionFlagMapper, CountryMapper,
    DataSourceMapper, DispenseModeMapper, DistrictMapper, DopingFlagMapper, DosageFormMapper,
    IndicationGroupMapper, LegalBasisMapper, NarcoticCategoryMapper, PackageTypeMapper,
    RegionMapper, RegistrationProcedureMapper, RegistrationStatusMapper, SaltFormMapper,
    UnitMapper,
};
pub use organisations::OrganisationMapper;
pub use outlets::{DistributorMapper, PharmacyMapper};
pub use products::{MedicinalProductMapper, ProductCompositionMapper};
pub use substances::{SubstanceMapper, SubstanceSynonymMapper};
