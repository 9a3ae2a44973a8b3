//! Client-side view of server-stored dialogue variables.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A single dialogue variable as reported by the service.
///
/// Variables are fetched as a full snapshot list on demand; set/delete
/// operations are fire-and-refetch, there is no incremental patching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    /// Variable name, unique within the session
    pub name: String,
    /// Current value, absent when the variable has been cleared
    pub value: Option<String>,
    /// Last update time in epoch milliseconds
    pub updated_time: i64,
    /// IANA time zone the update was recorded in (e.g. "Europe/Lisbon")
    pub updated_time_zone: String,
}

impl Variable {
    /// The last update time as a UTC timestamp, when the epoch value is
    /// representable.
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.updated_time).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_at_converts_epoch_millis() {
        let variable = Variable {
            name: "mood".to_string(),
            value: Some("happy".to_string()),
            updated_time: 1_700_000_000_000,
            updated_time_zone: "Europe/Lisbon".to_string(),
        };
        let at = variable.updated_at().unwrap();
        assert_eq!(at.timestamp_millis(), 1_700_000_000_000);
    }
}
