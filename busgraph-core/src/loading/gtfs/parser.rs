use std::fs::File;
use std::path::Path;

use log::{trace, warn};

use crate::Error;

pub fn deserialize_gtfs_file<T>(path: &Path) -> Result<Vec<T>, Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file)
        .deserialize()
        .filter_map(Result::ok)
        .collect::<Vec<T>>())
}

/// Reads a feed file that may be absent; absence or I/O failure contributes no rows
pub(crate) fn read_optional_gtfs_file<T>(path: &Path) -> Vec<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    if !path.exists() {
        trace!("{} not present, skipping", path.display());
        return Vec::new();
    }
    deserialize_gtfs_file(path).unwrap_or_else(|e| {
        warn!("{e}");
        Vec::new()
    })
}

/// Parse time string in HH:MM:SS format to seconds since midnight.
///
/// Strings shorter than eight characters parse to 0, as do components without
/// leading digits.
pub fn parse_time(time_str: &str) -> u32 {
    let time_str = time_str.trim();
    if time_str.len() < 8 {
        return 0;
    }
    let mut parts = time_str.split(':').map(parse_leading_digits);
    let hours = parts.next().unwrap_or(0);
    let minutes = parts.next().unwrap_or(0);
    let seconds = parts.next().unwrap_or(0);
    hours
        .saturating_mul(3600)
        .saturating_add(minutes.saturating_mul(60))
        .saturating_add(seconds)
}

/// Integer value of the leading ASCII digits, 0 when there are none
pub(crate) fn parse_leading_digits(value: &str) -> u32 {
    let value = value.trim();
    let end = value
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(value.len());
    value[..end].parse().unwrap_or(0)
}
