//! Weekdays, clock times, opening hours and dates.

use chrono::NaiveDate;
use itertools::Itertools;
use regex::Regex;
use std::sync::LazyLock;

/// Canonical token first, then every spelling that maps to it (upper case).
const WEEKDAYS: [&[&str]; 7] = [
    &["MON", "MONDAY", "ПН", "ПНД", "ПОН", "ПОНЕДЕЛЬНИК"],
    &["TUE", "TUESDAY", "TUES", "ВТ", "ВТР", "ВТОРНИК"],
    &["WED", "WEDNESDAY", "СР", "СРД", "СРЕДА"],
    &["THU", "THURSDAY", "THUR", "THURS", "ЧТ", "ЧТВ", "ЧЕТВЕРГ"],
    &["FRI", "FRIDAY", "ПТ", "ПТН", "ПЯТНИЦА"],
    &["SAT", "SATURDAY", "СБ", "СБТ", "СУББОТА"],
    &["SUN", "SUNDAY", "ВС", "ВСК", "ВОСКРЕСЕНЬЕ"],
];

static WORD_SEPARATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\w]+").expect("BUG: invalid WORD_SEPARATOR_RE regex literal")
});

static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2})(?:\D+(\d{1,2}))?\s*$").expect("BUG: invalid CLOCK_RE regex literal")
});

// `<days> <from>[-<to>]`; `from` is lazy so that `10-19` splits into two times.
static HOURS_ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\S+)\s+(\S+?)(?:\s*-\s*(\S+))?\s*$")
        .expect("BUG: invalid HOURS_ENTRY_RE regex literal")
});

static YMD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})\.(\d{1,2})\.(\d{1,2})$").expect("BUG: invalid YMD_RE regex literal")
});

static DMY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})$").expect("BUG: invalid DMY_RE regex literal")
});

/// Maps an English or Russian weekday name or abbreviation to its
/// three-letter English token. Unknown words come back upper-cased.
pub fn weekday_token(token: &str) -> String {
    let upper = token.trim().to_uppercase();
    WEEKDAYS
        .iter()
        .find(|spellings| spellings.contains(&upper.as_str()))
        .map(|spellings| spellings[0].to_string())
        .unwrap_or(upper)
}

/// Splits `text` on anything that is not a word character and canonicalises
/// each piece: `"пн, вт"` gives `["MON", "TUE"]`.
pub fn weekday_list(text: &str) -> Vec<String> {
    WORD_SEPARATOR_RE
        .split(text)
        .filter(|part| !part.is_empty())
        .map(weekday_token)
        .collect()
}

/// Reads `H`, `H:M`, `H.M` or `H M` as `HH:MM`. Hours above 24 and minutes
/// above 59 are rejected.
pub fn clock_time(text: Option<&str>) -> Option<String> {
    let caps = CLOCK_RE.captures(text?)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };
    if hours > 24 || minutes > 59 {
        return None;
    }
    Some(format!("{:02}:{:02}", hours, minutes))
}

/// Parses slash-separated schedule entries such as
/// `"ПН-ПТ 10-19/СБ 10:30-18"` into `["MON-FRI 10:00-19:00", "SAT 10:30-18:00"]`.
///
/// Entries that do not look like `<days> <from>[-<to>]`, or whose opening
/// time is unreadable, are kept verbatim.
pub fn opening_hours(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };
    text.split('/').map(opening_hours_entry).collect()
}

fn opening_hours_entry(entry: &str) -> String {
    let parsed = HOURS_ENTRY_RE.captures(entry).and_then(|caps| {
        let from = clock_time(caps.get(2).map(|m| m.as_str()))?;
        Some((caps, from))
    });
    let Some((caps, from)) = parsed else {
        log::debug!("Keeping unrecognised opening hours entry '{}'", entry);
        return entry.to_string();
    };
    let days = weekday_list(&caps[1]).join("-");
    let to = clock_time(caps.get(3).map(|m| m.as_str()));
    let times = std::iter::once(from).chain(to).join("-");
    [days, times].into_iter().filter(|s| !s.is_empty()).join(" ")
}

/// Converts `YYYY.M.D` or `D.M.YYYY` to `YYYY-MM-DD`. Dates that do not
/// exist on the calendar are rejected.
pub fn iso_date(text: Option<&str>) -> Option<String> {
    let text = text?.trim();
    let (year, month, day) = if let Some(caps) = YMD_RE.captures(text) {
        (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?)
    } else if let Some(caps) = DMY_RE.captures(text) {
        (caps[3].parse().ok()?, caps[2].parse().ok()?, caps[1].parse().ok()?)
    } else {
        return None;
    };
    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.format("%Y-%m-%d").to_string())
}
