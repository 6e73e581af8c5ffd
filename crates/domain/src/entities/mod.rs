//! Concrete reference-entity types, one per dataset.
//!
//! Each type enumerates its business attributes and implements
//! [`ReferenceEntity`](crate::ReferenceEntity): business key extraction plus
//! the field-by-field diff the reconciliation engine audits. Grouped the way
//! the upstream publisher groups them: registry codebooks, substances,
//! organisations, products, and outlet feeds.

mod codebooks;
mod organisations;
mod outlets;
mod products;
mod substances;

pub use codebooks::{
    AdministrationRoute, AtcGroup, CompositionFlag, Country, DataSource, DispenseMode, District,
    DopingFlag, DosageForm, IndicationGroup, LegalBasis, NarcoticCategory, PackageType, Region,
    RegistrationProcedure, RegistrationStatus, SaltForm, Unit,
};
pub use organisations::Organisation;
pub use outlets::{Distributor, Pharmacy};
pub use products::{MedicinalProduct, ProductComposition};
pub use substances::{Substance, SubstanceSynonym};
