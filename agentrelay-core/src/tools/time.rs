use chrono::{DateTime, FixedOffset, Utc};
use schemars::JsonSchema;
use serde::Deserialize;

use crate::tool::ToolResult;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CurrentTimeInput {
    /// `UTC`, or a fixed offset such as `+05:30`, `-0800` or `UTC+2`. Defaults to UTC.
    #[serde(default)]
    pub timezone: Option<String>,
}

pub fn get_current_time(input: CurrentTimeInput) -> ToolResult {
    current_time_at(input, Utc::now())
}

pub(crate) fn current_time_at(input: CurrentTimeInput, now: DateTime<Utc>) -> ToolResult {
    let timezone = match input.timezone.as_deref().map(str::trim) {
        None | Some("") => {
            return ToolResult::text(format!(
                "Current time (UTC): {} UTC",
                now.format(TIME_FORMAT)
            ))
        }
        Some(tz) => tz,
    };

    match parse_offset(timezone) {
        Some(offset) => ToolResult::text(format!(
            "Current time in {}: {} {}",
            timezone,
            now.with_timezone(&offset).format(TIME_FORMAT),
            offset
        )),
        None => ToolResult::text(format!(
            "Unknown timezone '{}'. Please use UTC or a fixed offset like '+05:30' or '-08:00'.",
            timezone
        )),
    }
}

/// Parse `UTC`, `GMT`, `+HH`, `+HH:MM`, `+HHMM`, optionally prefixed with `UTC`/`GMT`.
fn parse_offset(timezone: &str) -> Option<FixedOffset> {
    let upper = timezone.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    if rest.is_empty() {
        return FixedOffset::east_opt(0);
    }

    let mut chars = rest.chars();
    let sign = match chars.next() {
        Some('+') => 1,
        Some('-') => -1,
        _ => return None,
    };
    let digits = chars.as_str();
    if !digits.chars().all(|c| c.is_ascii_digit() || c == ':') {
        return None;
    }

    let (hours, minutes) = match digits.split_once(':') {
        Some((h, m)) => (h, m),
        None if digits.len() == 4 => digits.split_at(2),
        None => (digits, "0"),
    };

    if hours.is_empty() || !hours.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: i32 = hours.parse().ok()?;
    let minutes: i32 = minutes.parse().ok()?;
    if hours > 14 || !(0..60).contains(&minutes) {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
