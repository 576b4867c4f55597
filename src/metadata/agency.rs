//! Per-agency descriptive records for the report.

use serde::Serialize;

use crate::model::Agency;

/// Descriptive fields of one agency, in source row order in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgencyMetadata {
    pub name: String,
    pub url: String,
    pub phone: String,
    pub email: String,
}

impl AgencyMetadata {
    pub fn from_row(agency: &Agency) -> Self {
        Self {
            name: agency.agency_name.clone(),
            url: agency.agency_url.clone(),
            phone: agency.agency_phone.clone().unwrap_or_default(),
            email: agency.agency_email.clone().unwrap_or_default(),
        }
    }
}
