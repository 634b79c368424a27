//! CF time-units decoding for no-leap model output.

use std::path::Path;

use chrono::NaiveDate;
use netcdf::AttributeValue;
use tracing::warn;

use aeolus_calendar::NoLeapDate;

use crate::error::HindcastError;

/// Decoded CF `units` attribute of a time variable.
///
/// Offsets are interpreted in the 365-day no-leap calendar, which is what
/// CESM hindcast output carries. The decoded base feeds
/// [`TimeUnits::to_serial`]; the rebuilt time axis itself never trusts the
/// raw offsets beyond the first value's year.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TimeUnits {
    /// Offset ticks per day (1 for days, 24 for hours, 86400 for seconds).
    ticks_per_day: f64,
    /// No-leap serial day of the base date.
    base_serial: i64,
}

impl TimeUnits {
    /// Converts a raw offset into fractional no-leap serial days.
    pub(crate) fn to_serial(self, offset: f64) -> f64 {
        self.base_serial as f64 + offset / self.ticks_per_day
    }

    /// The no-leap calendar year containing a raw offset.
    pub(crate) fn year_of(self, offset: f64) -> i32 {
        (self.to_serial(offset) / 365.0).floor() as i32
    }
}

/// Reads and parses the `units` attribute of `time_var`.
///
/// Accepts the CF form `"<ticks> since YYYY-MM-DD[ HH:MM:SS]"` with ticks
/// of days, hours, or seconds. A `calendar` attribute other than a no-leap
/// name is tolerated with a warning, since the time axis is rebuilt anyway.
pub(crate) fn decode_units(
    file: &netcdf::File,
    time_var: &str,
    path: &Path,
) -> Result<TimeUnits, HindcastError> {
    let var = file
        .variable(time_var)
        .ok_or_else(|| HindcastError::MissingVariable {
            name: time_var.to_string(),
            path: path.to_path_buf(),
        })?;

    let units_str: String = var
        .attribute_value("units")
        .ok_or_else(|| HindcastError::InvalidTime {
            reason: format!("time variable '{time_var}' has no 'units' attribute"),
        })?
        .map_err(|e| HindcastError::InvalidTime {
            reason: format!("failed to read 'units' attribute: {e}"),
        })?
        .try_into()
        .map_err(|e: netcdf::Error| HindcastError::InvalidTime {
            reason: format!("'units' attribute is not a string: {e}"),
        })?;

    let calendar = var
        .attribute_value("calendar")
        .and_then(|res| res.ok())
        .and_then(|av| match av {
            AttributeValue::Str(s) => Some(s),
            _ => None,
        });
    if let Some(name) = calendar {
        if !matches!(name.as_str(), "noleap" | "no_leap" | "365_day") {
            warn!(
                calendar = %name,
                "non-no-leap calendar attribute; offsets treated as no-leap"
            );
        }
    }

    parse_units(&units_str)
}

/// Parses a CF units string into [`TimeUnits`].
pub(crate) fn parse_units(units_str: &str) -> Result<TimeUnits, HindcastError> {
    let parts: Vec<&str> = units_str.splitn(3, ' ').collect();
    if parts.len() < 3 || parts[1] != "since" {
        return Err(HindcastError::InvalidTime {
            reason: format!("unexpected time units format: '{units_str}'"),
        });
    }

    let ticks_per_day = match parts[0] {
        "days" | "day" => 1.0,
        "hours" | "hour" => 24.0,
        "seconds" | "second" => 86_400.0,
        other => {
            return Err(HindcastError::InvalidTime {
                reason: format!("unsupported time unit: '{other}'"),
            });
        }
    };

    // Take only the date portion of "YYYY-MM-DD[ HH:MM:SS]".
    let date_str = if parts[2].len() >= 10 {
        &parts[2][..10]
    } else {
        parts[2]
    };
    let base =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| HindcastError::InvalidTime {
            reason: format!("failed to parse base date '{date_str}': {e}"),
        })?;

    // Re-validate in the no-leap calendar; a Feb 29 base cannot anchor a
    // no-leap axis.
    let year: i32 = base.format("%Y").to_string().parse().map_err(|_| {
        HindcastError::InvalidTime {
            reason: format!("base date '{date_str}' has an unparsable year"),
        }
    })?;
    let month = base.format("%m").to_string().parse::<u8>().unwrap_or(0);
    let day = base.format("%d").to_string().parse::<u8>().unwrap_or(0);
    let noleap = NoLeapDate::new(year, month, day).map_err(|e| HindcastError::InvalidTime {
        reason: format!("base date '{date_str}' is not a no-leap date: {e}"),
    })?;

    Ok(TimeUnits {
        ticks_per_day,
        base_serial: noleap.serial_days(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_days_since() {
        let tu = parse_units("days since 0000-01-01").unwrap();
        assert_eq!(tu.to_serial(0.0), 0.0);
        assert_eq!(tu.to_serial(365.0), 365.0);
        assert_eq!(tu.year_of(0.0), 0);
        assert_eq!(tu.year_of(365.0), 1);
    }

    #[test]
    fn parse_days_since_with_time_of_day() {
        let tu = parse_units("days since 1980-11-01 00:00:00").unwrap();
        let base = NoLeapDate::new(1980, 11, 1).unwrap().serial_days() as f64;
        assert_eq!(tu.to_serial(0.0), base);
        assert_eq!(tu.year_of(61.0), 1981);
    }

    #[test]
    fn parse_hours_since() {
        let tu = parse_units("hours since 1980-01-01").unwrap();
        let base = NoLeapDate::new(1980, 1, 1).unwrap().serial_days() as f64;
        assert_eq!(tu.to_serial(48.0), base + 2.0);
    }

    #[test]
    fn parse_seconds_since() {
        let tu = parse_units("seconds since 1980-01-01").unwrap();
        let base = NoLeapDate::new(1980, 1, 1).unwrap().serial_days() as f64;
        assert_eq!(tu.to_serial(86_400.0), base + 1.0);
    }

    #[test]
    fn year_of_mid_year_offset() {
        let tu = parse_units("days since 1980-01-01").unwrap();
        // Offset 364 is still 1980; 365 rolls into 1981.
        assert_eq!(tu.year_of(364.0), 1980);
        assert_eq!(tu.year_of(365.0), 1981);
    }

    #[test]
    fn reject_missing_since() {
        assert!(parse_units("days after 1980-01-01").is_err());
        assert!(parse_units("days").is_err());
    }

    #[test]
    fn reject_unknown_unit() {
        assert!(parse_units("fortnights since 1980-01-01").is_err());
    }

    #[test]
    fn reject_malformed_date() {
        assert!(parse_units("days since yesterday++").is_err());
    }

    #[test]
    fn reject_leap_day_base() {
        assert!(parse_units("days since 1980-02-29").is_err());
    }
}
