use serde::{Deserialize, Serialize};

use crate::{Result, TimelineError};

/// Keys and labels a timeline needs from its host.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Persistent state key holding the `{all, published}` defined-dates snapshot
    pub defined_dates_key: String,
    /// Persistent state key holding the site-wide default date
    pub default_date_key: String,
    /// Per-visitor session key holding the current date
    pub current_date_session_key: String,
    /// Text shown instead of a date for the `first` keyword
    pub first_date_label: String,
    /// Text shown instead of a date for the `last` keyword
    pub last_date_label: String,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            defined_dates_key: "timeline.defined_dates".to_owned(),
            default_date_key: "timeline.default_date".to_owned(),
            current_date_session_key: "timeline/current_date".to_owned(),
            first_date_label: "First date".to_owned(),
            last_date_label: "Last date".to_owned(),
        }
    }
}

impl TimelineConfig {
    /// Loads a config from JSON; absent fields keep their defaults.
    ///
    /// # Errors
    /// Returns `TimelineError::Config` if `json` is not a valid config object.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(TimelineError::Config)
    }
}
