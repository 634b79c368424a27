//! Initialization-year extraction strategies and collision policies.

use crate::error::LocateError;

/// Strategy for extracting the initialization year from a file name.
///
/// CESM output archives use more than one naming convention, so the
/// extraction rule is an explicit parameter instead of a hardcoded split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearRule {
    /// Split the file name at `".{member_tag}."`, cut the piece before it at
    /// the first `-`, and parse its trailing four characters.
    ///
    /// Matches names such as
    /// `b.e11.BDP.f09_g16.1980-11.003.pop.h.SST.198011-199012.nc`,
    /// where the case/date segment precedes the member number.
    MemberSplit,

    /// Parse the year digits of the first `YYYY-MM` date stamp in the name.
    DateStamp,

    /// Parse the first dot-separated component that is exactly four ASCII
    /// digits, as in `run.003.01.1980.nc`.
    YearComponent,
}

impl YearRule {
    /// Extracts the initialization year from `file_name` (the base name,
    /// without directories). `member_tag` is the zero-padded member number
    /// the file was discovered under; only [`YearRule::MemberSplit`] uses it.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::YearParse`] when the name does not follow the
    /// convention the rule expects.
    pub fn extract(self, file_name: &str, member_tag: &str) -> Result<i32, LocateError> {
        match self {
            YearRule::MemberSplit => member_split(file_name, member_tag),
            YearRule::DateStamp => date_stamp(file_name),
            YearRule::YearComponent => year_component(file_name),
        }
    }
}

/// Policy for two files mapping to the same initialization year within one
/// member's index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Fail with [`LocateError::DuplicateYear`].
    #[default]
    Error,
    /// Keep the first file discovered and warn about the rest.
    KeepFirst,
    /// Keep the last file discovered and warn about the replaced ones.
    KeepLast,
}

fn parse_err(file_name: &str, reason: impl Into<String>) -> LocateError {
    LocateError::YearParse {
        file: file_name.to_string(),
        reason: reason.into(),
    }
}

fn member_split(file_name: &str, member_tag: &str) -> Result<i32, LocateError> {
    let needle = format!(".{member_tag}.");
    let pos = file_name
        .find(&needle)
        .ok_or_else(|| parse_err(file_name, format!("member tag '{needle}' not found")))?;
    let before = &file_name[..pos];
    let head = before.split('-').next().unwrap_or(before);
    let ystr = head
        .len()
        .checked_sub(4)
        .and_then(|start| head.get(start..))
        .ok_or_else(|| parse_err(file_name, "fewer than 4 characters before member tag"))?;
    ystr.parse::<i32>()
        .map_err(|_| parse_err(file_name, format!("'{ystr}' is not a year")))
}

fn date_stamp(file_name: &str) -> Result<i32, LocateError> {
    let b = file_name.as_bytes();
    // First run of "dddd-dd" not embedded in a longer digit run.
    for i in 0..b.len().saturating_sub(6) {
        let stamp = b[i..i + 4].iter().all(u8::is_ascii_digit)
            && b[i + 4] == b'-'
            && b[i + 5].is_ascii_digit()
            && b[i + 6].is_ascii_digit();
        let standalone = (i == 0 || !b[i - 1].is_ascii_digit())
            && (i + 7 >= b.len() || !b[i + 7].is_ascii_digit());
        if stamp && standalone {
            let ystr = &file_name[i..i + 4];
            return ystr
                .parse::<i32>()
                .map_err(|_| parse_err(file_name, format!("'{ystr}' is not a year")));
        }
    }
    Err(parse_err(file_name, "no YYYY-MM date stamp found"))
}

fn year_component(file_name: &str) -> Result<i32, LocateError> {
    file_name
        .split('.')
        .find(|part| part.len() == 4 && part.bytes().all(|c| c.is_ascii_digit()))
        .ok_or_else(|| parse_err(file_name, "no 4-digit component found"))?
        .parse::<i32>()
        .map_err(|_| parse_err(file_name, "year out of range"))
}
