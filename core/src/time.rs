use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Parses an entry date relative to `today`.
///
/// Accepts `today`/`tod`, `yesterday`/`yday`, `-Nd`/`-Nw` offsets into the
/// past, weekday names (the most recent such day, today included) and
/// `YYYY-MM-DD`.
pub fn parse_entry_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yday" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = input.strip_prefix('-') {
        let offset = parse_offset(rest)?;
        return today
            .checked_sub_signed(offset)
            .ok_or_else(|| anyhow!("Relative date out of range: {}", input));
    }

    if let Ok(weekday) = parse_weekday_str(input) {
        let back = (today.weekday().num_days_from_monday() + 7 - weekday.num_days_from_monday()) % 7;
        return Ok(today - Duration::days(back as i64));
    }

    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| anyhow!("Could not parse date: {}", input))
}

fn parse_offset(input: &str) -> Result<Duration> {
    let invalid = || anyhow!("Invalid relative date: -{}", input);

    // Split before the last character, which may be multi-byte.
    let (split, unit) = input.char_indices().last().ok_or_else(invalid)?;
    let num_str = &input[..split];
    if num_str.is_empty() {
        return Err(invalid());
    }
    let count: i64 = num_str.parse().map_err(|_| invalid())?;

    let offset = match unit.to_ascii_lowercase() {
        'd' => Duration::try_days(count),
        'w' => Duration::try_weeks(count),
        _ => return Err(anyhow!("Unknown unit in relative date: {}", unit)),
    };
    offset.ok_or_else(invalid)
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-01-10 is a Wednesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse_entry_date("today", today()).unwrap(), today());
        assert_eq!(parse_entry_date("YDAY", today()).unwrap(), ymd(2024, 1, 9));
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(parse_entry_date("-3d", today()).unwrap(), ymd(2024, 1, 7));
        assert_eq!(parse_entry_date("-1w", today()).unwrap(), ymd(2024, 1, 3));
        assert!(parse_entry_date("-3x", today()).is_err());
        assert!(parse_entry_date("-d", today()).is_err());
    }

    #[test]
    fn test_relative_offsets_with_multibyte_unit_are_rejected() {
        assert!(parse_entry_date("-é", today()).is_err());
        assert!(parse_entry_date("-3é", today()).is_err());
        assert!(parse_entry_date("-é3d", today()).is_err());
        assert!(parse_entry_date("-", today()).is_err());
    }

    #[test]
    fn test_relative_offsets_out_of_range_are_rejected() {
        assert!(parse_entry_date("-999999999999999d", today()).is_err());
        assert!(parse_entry_date("-99999999w", today()).is_err());
    }

    #[test]
    fn test_weekday_is_most_recent() {
        assert_eq!(parse_entry_date("wed", today()).unwrap(), today());
        assert_eq!(parse_entry_date("mon", today()).unwrap(), ymd(2024, 1, 8));
        assert_eq!(parse_entry_date("thursday", today()).unwrap(), ymd(2024, 1, 4));
    }

    #[test]
    fn test_iso_date_and_garbage() {
        assert_eq!(parse_entry_date("2023-12-31", today()).unwrap(), ymd(2023, 12, 31));
        assert!(parse_entry_date("31/12/2023", today()).is_err());
    }
}
