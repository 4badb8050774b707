//! Output timestamps for reproducible archives.

use crate::{ArchiverError, ArchiverResult};
use std::fmt;
use std::time::SystemTime;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Earliest accepted timestamp: 1980-01-01T00:00:02Z.
const MIN_EPOCH_SECONDS: i64 = 315_532_802;

/// Latest accepted timestamp: 2099-12-31T23:59:59Z.
const MAX_EPOCH_SECONDS: i64 = 4_102_444_799;

/// A fixed timestamp applied to every archive entry.
///
/// Parsed either from an ISO-8601 offset date-time
/// (`yyyy-MM-dd'T'HH:mm:ssXXX`) or from seconds since the epoch, as used by
/// `SOURCE_DATE_EPOCH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputTimestamp(OffsetDateTime);

impl OutputTimestamp {
    /// Parse a configured output timestamp.
    ///
    /// Returns `Ok(None)` when the value is absent or shorter than two
    /// characters, which means the archive is not reproducible.
    pub fn parse(value: Option<&str>) -> ArchiverResult<Option<Self>> {
        let Some(value) = value.map(str::trim) else {
            return Ok(None);
        };
        if value.chars().count() < 2 {
            return Ok(None);
        }

        let parsed = if value.bytes().all(|b| b.is_ascii_digit()) {
            let seconds: i64 = value
                .parse()
                .map_err(|_| ArchiverError::InvalidTimestamp(value.to_string()))?;
            OffsetDateTime::from_unix_timestamp(seconds)
                .map_err(|_| ArchiverError::InvalidTimestamp(value.to_string()))?
        } else {
            OffsetDateTime::parse(value, &Rfc3339).map_err(|e| {
                ArchiverError::InvalidTimestamp(format!(
                    "'{value}' is not an ISO-8601 offset date-time or epoch seconds: {e}"
                ))
            })?
        };

        let seconds = parsed.unix_timestamp();
        if !(MIN_EPOCH_SECONDS..=MAX_EPOCH_SECONDS).contains(&seconds) {
            return Err(ArchiverError::InvalidTimestamp(format!(
                "'{value}' is out of the range 1980-01-01T00:00:02Z to 2099-12-31T23:59:59Z"
            )));
        }

        Ok(Some(Self(parsed.to_offset(UtcOffset::UTC))))
    }

    /// Seconds since the Unix epoch.
    #[must_use]
    pub fn epoch_seconds(&self) -> i64 {
        self.0.unix_timestamp()
    }

    /// The timestamp in UTC.
    #[must_use]
    pub fn as_datetime(&self) -> OffsetDateTime {
        self.0
    }

    /// Convert to a ZIP entry timestamp.
    pub fn to_zip_datetime(&self) -> ArchiverResult<zip::DateTime> {
        zip_datetime(self.0)
            .ok_or_else(|| ArchiverError::InvalidTimestamp(self.to_string()))
    }
}

impl fmt::Display for OutputTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.format(&Rfc3339) {
            Ok(text) => f.write_str(&text),
            Err(_) => write!(f, "{}", self.epoch_seconds()),
        }
    }
}

/// Convert a date-time to a ZIP (MS-DOS) timestamp in UTC.
///
/// Returns `None` when the value is outside the representable range.
pub(crate) fn zip_datetime(value: OffsetDateTime) -> Option<zip::DateTime> {
    let utc = value.to_offset(UtcOffset::UTC);
    let year = u16::try_from(utc.year()).ok()?;
    zip::DateTime::from_date_and_time(
        year,
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
    )
    .ok()
}

/// ZIP timestamp for a file's modification time, falling back to the ZIP epoch.
pub(crate) fn zip_datetime_from_system(value: SystemTime) -> zip::DateTime {
    zip_datetime(OffsetDateTime::from(value)).unwrap_or_default()
}
