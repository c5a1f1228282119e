use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};
use regex::Regex;

/// A YAML timestamp scalar resolved to a native date/time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Timestamp {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

// YAML 1.1 timestamp grammar
const TIMESTAMP_PATTERN: &str = concat!(
    r"^(?P<year>[0-9]{4})-(?P<month>[0-9]{1,2})-(?P<day>[0-9]{1,2})",
    r"(?:(?:[Tt]|[ \t]+)(?P<hour>[0-9]{1,2}):(?P<minute>[0-9]{2}):(?P<second>[0-9]{2})",
    r"(?:\.(?P<fraction>[0-9]*))?",
    r"(?:[ \t]*(?P<tz>Z|(?P<tz_sign>[-+])(?P<tz_hour>[0-9]{1,2})(?::(?P<tz_minute>[0-9]{2}))?))?)?$",
);

fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| Regex::new(TIMESTAMP_PATTERN).unwrap())
}

impl Timestamp {
    /// `None` if `s` is not a timestamp, or names an impossible calendar date.
    pub fn parse(s: &str) -> Option<Self> {
        let caps = timestamp_regex().captures(s)?;
        let num = |name: &str| caps.name(name).map(|m| m.as_str().parse::<u32>());

        let year: i32 = caps["year"].parse().ok()?;
        let date = NaiveDate::from_ymd_opt(year, num("month")?.ok()?, num("day")?.ok()?)?;

        let Some(hour) = num("hour") else {
            // date-only form needs two-digit month and day
            if caps["month"].len() != 2 || caps["day"].len() != 2 {
                return None;
            }
            return Some(Timestamp::Date(date));
        };

        let micros = match caps.name("fraction") {
            Some(f) => {
                let digits: String = f
                    .as_str()
                    .chars()
                    .chain(std::iter::repeat('0'))
                    .take(6)
                    .collect();
                digits.parse::<u32>().ok()?
            }
            None => 0,
        };
        let time = NaiveTime::from_hms_micro_opt(
            hour.ok()?,
            num("minute")?.ok()?,
            num("second")?.ok()?,
            micros,
        )?;
        let naive = date.and_time(time);

        let Some(tz) = caps.name("tz") else {
            return Some(Timestamp::DateTime(naive));
        };
        let offset_secs = if tz.as_str() == "Z" {
            0
        } else {
            let hours = num("tz_hour")?.ok()? as i32;
            let minutes = num("tz_minute").transpose().ok()?.unwrap_or(0) as i32;
            let secs = hours * 3600 + minutes * 60;
            if &caps["tz_sign"] == "-" {
                -secs
            } else {
                secs
            }
        };
        let offset = FixedOffset::east_opt(offset_secs)?;
        offset
            .from_local_datetime(&naive)
            .single()
            .map(Timestamp::Zoned)
    }

    /// Canonical ISO-8601 text.
    pub fn to_iso_string(&self) -> String {
        match self {
            Timestamp::Date(d) => d.format("%Y-%m-%d").to_string(),
            Timestamp::DateTime(dt) => format_datetime(dt),
            Timestamp::Zoned(dt) => {
                format!("{}{}", format_datetime(&dt.naive_local()), dt.format("%:z"))
            }
        }
    }
}

fn format_datetime(dt: &NaiveDateTime) -> String {
    let base = dt.format("%Y-%m-%dT%H:%M:%S");
    match dt.nanosecond() / 1000 {
        0 => base.to_string(),
        micros => format!("{base}.{micros:06}"),
    }
}
