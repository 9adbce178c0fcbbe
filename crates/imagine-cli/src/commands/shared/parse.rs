use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use imagine_core::CoreError;

/// Parse a wire enum, accepting `-` for `_` (e.g. `home-garden`).
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: FromStr<Err = CoreError>,
{
    let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
    normalized
        .parse()
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

pub fn parse_optional_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr<Err = CoreError>,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str, field: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow::anyhow!("invalid {field} '{raw}': expected RFC 3339 or YYYY-MM-DD"))
}

/// `version:weight` as given to `ab-testing create --variant`.
pub fn parse_variant(raw: &str) -> anyhow::Result<(String, u32)> {
    let (version, weight) = raw
        .rsplit_once(':')
        .ok_or_else(|| anyhow::anyhow!("invalid variant '{raw}': expected version:weight"))?;
    if version.trim().is_empty() {
        anyhow::bail!("invalid variant '{raw}': model version is empty");
    }
    let weight = weight
        .trim()
        .parse::<u32>()
        .map_err(|error| anyhow::anyhow!("invalid variant weight in '{raw}': {error}"))?;
    Ok((version.trim().to_string(), weight))
}

/// Lowercase, ASCII-alphanumeric slug with single dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}
