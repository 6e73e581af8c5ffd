//! Outlet feeds: pharmacies and wholesale distributors. Published separately
//! from the registry bundle, in UTF-8.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::diff::{FieldChange, FieldDiff};
use crate::key::BusinessKey;
use crate::record::ReferenceEntity;

/// Licensed pharmacy (`lekarny`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pharmacy {
    pub code: String,
    pub name: String,
    pub street: Option<String>,
    pub city: String,
    pub postcode: Option<String>,
    pub district_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl ReferenceEntity for Pharmacy {
    const DATASET: Dataset = Dataset::Pharmacies;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("street", &self.street, &next.street);
        d.field("city", &self.city, &next.city);
        d.opt("postcode", &self.postcode, &next.postcode);
        d.opt("district_code", &self.district_code, &next.district_code);
        d.opt("phone", &self.phone, &next.phone);
        d.opt("email", &self.email, &next.email);
        d.into_changes()
    }
}

/// Licensed wholesale distributor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distributor {
    pub code: String,
    pub name: String,
    pub country_code: Option<String>,
    pub city: Option<String>,
    pub authorisation_number: Option<String>,
    pub authorised_on: Option<NaiveDate>,
}

impl ReferenceEntity for Distributor {
    const DATASET: Dataset = Dataset::Distributors;

    fn business_key(&self) -> BusinessKey {
        BusinessKey::code(&self.code)
    }

    fn diff(&self, next: &Self) -> Vec<FieldChange> {
        let mut d = FieldDiff::new();
        d.field("name", &self.name, &next.name);
        d.opt("country_code", &self.country_code, &next.country_code);
        d.opt("city", &self.city, &next.city);
        d.opt(
            "authorisation_number",
            &self.authorisation_number,
            &next.authorisation_number,
        );
        d.opt("authorised_on", &self.authorised_on, &next.authorised_on);
        d.into_changes()
    }
}
