use std::collections::HashMap;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::model::entry::Entry;
use crate::time::parse_entry_date;

pub const ENTRY_KEYS: [&str; 12] = [
    "date",
    "vehicle",
    "driver",
    "from",
    "to",
    "km",
    "income",
    "fuel",
    "maintenance",
    "other",
    "salary",
    "notes",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` tokens from free words; the free words are joined
/// into `name`.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_string(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    // 1. Exact match
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    // 2. Prefix match
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

fn parse_amount(key: &str, value: &str) -> Result<f64> {
    let amount: f64 = value
        .trim()
        .replace(',', "")
        .parse()
        .with_context(|| format!("Invalid number for {}: '{}'", key, value))?;
    if !amount.is_finite() {
        return Err(anyhow!("Invalid number for {}: '{}'", key, value));
    }
    Ok(amount)
}

/// Applies `key:value` fields onto `entry`. Free words, when present,
/// become the notes.
pub fn apply_fields(entry: &mut Entry, parsed: &ParsedInput, today: NaiveDate) -> Result<()> {
    if !parsed.name.is_empty() {
        entry.notes = parsed.name.clone();
    }

    // Sorted so errors are reported in a stable order.
    let mut fields: Vec<(&String, &String)> = parsed.metadata.iter().collect();
    fields.sort();

    for (raw_key, value) in fields {
        let key = expand_key(raw_key, &ENTRY_KEYS)?;
        match key.as_str() {
            "date" => entry.date = parse_entry_date(value, today)?,
            "vehicle" => entry.vehicle_id = value.trim().to_string(),
            "driver" => entry.driver_name = value.trim().to_string(),
            "from" => entry.trip_from = Some(value.clone()).filter(|s| !s.is_empty()),
            "to" => entry.trip_to = Some(value.clone()).filter(|s| !s.is_empty()),
            "km" => {
                let km = parse_amount("km", value)?;
                if km < 0.0 {
                    return Err(anyhow!("Distance cannot be negative: {}", value));
                }
                entry.distance_km = km;
            }
            "income" => entry.income = parse_amount("income", value)?,
            "fuel" => entry.fuel = parse_amount("fuel", value)?,
            "maintenance" => entry.maintenance = parse_amount("maintenance", value)?,
            "other" => entry.other = parse_amount("other", value)?,
            "salary" => entry.driver_salary = parse_amount("salary", value)?,
            "notes" => entry.notes = value.clone(),
            _ => {}
        }
    }

    Ok(())
}

/// Builds a new, unsaved entry from command-line words. Vehicle and driver
/// are required; the date defaults to `today`.
pub fn build_entry(args: &[String], today: NaiveDate) -> Result<Entry> {
    let parsed = parse_args(args);
    let mut entry = Entry::new(today, String::new(), String::new());
    apply_fields(&mut entry, &parsed, today)?;

    if entry.vehicle_id.is_empty() {
        return Err(anyhow!("vehicle:<id> is required"));
    }
    if entry.driver_name.is_empty() {
        return Err(anyhow!("driver:<name> is required"));
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(s: &str) -> Vec<String> {
        s.split_whitespace().map(|w| w.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&words("airport run vehicle:KA01 income:1500"));
        assert_eq!(parsed.name, "airport run");
        assert_eq!(parsed.metadata.get("vehicle"), Some(&"KA01".to_string()));
        assert_eq!(parsed.metadata.get("income"), Some(&"1500".to_string()));
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("inc", &ENTRY_KEYS).unwrap(), "income");
        assert_eq!(expand_key("sal", &ENTRY_KEYS).unwrap(), "salary");
        assert_eq!(expand_key("m", &ENTRY_KEYS).unwrap(), "maintenance");
        assert_eq!(expand_key("to", &ENTRY_KEYS).unwrap(), "to");

        // Ambiguous
        assert!(expand_key("d", &ENTRY_KEYS).is_err()); // date, driver
        assert!(expand_key("f", &ENTRY_KEYS).is_err()); // from, fuel

        // Unknown
        assert!(expand_key("x", &ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_build_entry() {
        let entry = build_entry(
            &words("airport run veh:KA01AB dri:Ravi da:-1d inc:1,500 fu:200 sal:300 km:42.5"),
            today(),
        )
        .unwrap();

        assert_eq!(entry.vehicle_id, "KA01AB");
        assert_eq!(entry.driver_name, "Ravi");
        assert_eq!(entry.date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
        assert_eq!(entry.income, 1500.0);
        assert_eq!(entry.fuel, 200.0);
        assert_eq!(entry.driver_salary, 300.0);
        assert_eq!(entry.distance_km, 42.5);
        assert_eq!(entry.notes, "airport run");
        assert_eq!(entry.profit(), 1000.0);
        assert!(entry.id.is_none());
    }

    #[test]
    fn test_build_entry_requires_vehicle_and_driver() {
        assert!(build_entry(&words("driver:Ravi income:100"), today()).is_err());
        assert!(build_entry(&words("vehicle:KA01 income:100"), today()).is_err());

        let err = build_entry(&[], today()).unwrap_err();
        assert!(err.to_string().contains("vehicle:<id> is required"));
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(build_entry(&words("vehicle:KA01 driver:Ravi income:abc"), today()).is_err());
        assert!(build_entry(&words("vehicle:KA01 driver:Ravi income:NaN"), today()).is_err());
        assert!(build_entry(&words("vehicle:KA01 driver:Ravi km:-4"), today()).is_err());
    }
}
