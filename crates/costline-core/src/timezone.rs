//! Timezone utilities for query windows
//!
//! Query bounds given as bare dates are anchored at local midnight in the
//! configured timezone and converted to UTC before they reach the store.

use crate::error::{CostlineError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;
use tracing::debug;

/// Configuration for timezone handling
#[derive(Debug, Clone)]
pub struct TimezoneConfig {
    /// The timezone bare dates are interpreted in
    pub tz: Tz,
    /// Whether the timezone is UTC
    pub is_utc: bool,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        let tz = get_local_timezone();
        Self {
            is_utc: tz == Tz::UTC,
            tz,
        }
    }
}

impl TimezoneConfig {
    /// UTC configuration
    pub fn utc() -> Self {
        Self {
            tz: Tz::UTC,
            is_utc: true,
        }
    }

    /// Create a new timezone configuration from CLI arguments
    pub fn from_cli(timezone_str: Option<&str>, use_utc: bool) -> Result<Self> {
        if use_utc {
            return Ok(Self::utc());
        }

        if let Some(tz_str) = timezone_str {
            let tz = Tz::from_str(tz_str).map_err(|_| {
                CostlineError::InvalidTimezone(format!(
                    "'{tz_str}'. Use format like 'America/New_York', 'Asia/Tokyo', or 'UTC'"
                ))
            })?;
            Ok(Self {
                tz,
                is_utc: tz == Tz::UTC,
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Get the display name for the configured timezone
    pub fn display_name(&self) -> &str {
        if self.is_utc { "UTC" } else { self.tz.name() }
    }

    /// The UTC instant of midnight on `date` in this timezone
    ///
    /// When midnight falls in a DST gap the first valid instant of the day is
    /// used instead.
    pub fn local_midnight(&self, date: NaiveDate) -> Result<DateTime<Utc>> {
        let invalid = || CostlineError::InvalidDate(format!("{date} in {}", self.display_name()));
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;

        if let Some(local) = self.tz.from_local_datetime(&midnight).earliest() {
            return Ok(local.with_timezone(&Utc));
        }

        // Skipped by a DST transition: step forward until a valid local time
        (1..=24)
            .filter_map(|hour| date.and_hms_opt(hour, 0, 0))
            .find_map(|dt| self.tz.from_local_datetime(&dt).earliest())
            .map(|local| local.with_timezone(&Utc))
            .ok_or_else(invalid)
    }
}

/// Local timezone from `TZ`, then the system setting, falling back to UTC
pub fn get_local_timezone() -> Tz {
    let candidates = std::env::var("TZ")
        .ok()
        .into_iter()
        .chain(std::iter::once_with(|| iana_time_zone::get_timezone().ok()).flatten());

    for name in candidates {
        if let Ok(tz) = Tz::from_str(&name) {
            debug!("Using local timezone {}", name);
            return tz;
        }
        debug!("Ignoring unrecognised timezone '{}'", name);
    }
    debug!("Could not detect local timezone, using UTC");
    Tz::UTC
}
