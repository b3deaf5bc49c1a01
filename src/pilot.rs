use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type PilotId = Arc<str>;

/// One row of `pilotos.csv`. A missing or unparseable `validade` loads as
/// `None` and never validates (fail-closed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PilotCertification {
    pub pilot_id: PilotId,
    pub name: Arc<str>,
    pub rating: Arc<str>,
    pub valid_until: Option<NaiveDate>,
}

impl PilotCertification {
    pub fn covers(&self, aircraft_type: &str, today: NaiveDate) -> bool {
        self.rating.as_ref() == aircraft_type
            && self.valid_until.map(|d| d >= today).unwrap_or(false)
    }
}

/// Scans the roster in file order; the first matching certification wins,
/// which keeps ties reproducible.
pub fn qualified_pilot<'a>(
    aircraft_type: &str,
    roster: &'a [PilotCertification],
    today: NaiveDate,
) -> Option<&'a PilotCertification> {
    roster.iter().find(|p| p.covers(aircraft_type, today))
}
