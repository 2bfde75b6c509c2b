use chrono::NaiveDate;

use crate::model::entry::Entry;

/// List-view criteria. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub date_start: Option<NaiveDate>,
    pub date_end: Option<NaiveDate>,
    /// Case-sensitive substring of the vehicle id.
    pub vehicle: Option<String>,
    /// Case-sensitive substring of the driver name.
    pub driver: Option<String>,
    /// Case-insensitive substring of vehicle id or driver name.
    pub search: Option<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        let in_range = self.date_start.is_none_or(|start| entry.date >= start)
            && self.date_end.is_none_or(|end| entry.date <= end);

        let vehicle_ok = non_empty(&self.vehicle).is_none_or(|v| entry.vehicle_id.contains(v));
        let driver_ok = non_empty(&self.driver).is_none_or(|d| entry.driver_name.contains(d));

        let search_ok = non_empty(&self.search).is_none_or(|term| {
            let term = term.to_lowercase();
            entry.vehicle_id.to_lowercase().contains(&term)
                || entry.driver_name.to_lowercase().contains(&term)
        });

        in_range && vehicle_ok && driver_ok && search_ok
    }

    /// Keeps matching entries in input order.
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, vehicle: &str, driver: &str) -> Entry {
        Entry::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            vehicle.to_string(),
            driver.to_string(),
        )
    }

    fn sample() -> Vec<Entry> {
        vec![
            entry("2024-01-07", "KA01AB", "Ravi"),
            entry("2024-01-06", "KA02CD", "Suresh"),
            entry("2024-01-05", "ka03ef", "Anil"),
        ]
    }

    #[test]
    fn test_default_filter_matches_all() {
        let entries = sample();
        assert_eq!(EntryFilter::default().apply(&entries).len(), 3);
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let entries = sample();
        let filter = EntryFilter {
            date_start: NaiveDate::from_ymd_opt(2024, 1, 6),
            date_end: NaiveDate::from_ymd_opt(2024, 1, 7),
            ..Default::default()
        };
        let drivers: Vec<&str> = filter
            .apply(&entries)
            .iter()
            .map(|e| e.driver_name.as_str())
            .collect();
        assert_eq!(drivers, vec!["Ravi", "Suresh"]);
    }

    #[test]
    fn test_vehicle_filter_is_case_sensitive_but_search_is_not() {
        let entries = sample();
        let by_vehicle = EntryFilter {
            vehicle: Some("KA0".to_string()),
            ..Default::default()
        };
        assert_eq!(by_vehicle.apply(&entries).len(), 2);

        let by_search = EntryFilter {
            search: Some("KA0".to_string()),
            ..Default::default()
        };
        assert_eq!(by_search.apply(&entries).len(), 3);

        let by_driver_search = EntryFilter {
            search: Some("sur".to_string()),
            ..Default::default()
        };
        assert_eq!(by_driver_search.apply(&entries)[0].vehicle_id, "KA02CD");
    }

    #[test]
    fn test_empty_strings_do_not_filter() {
        let entries = sample();
        let filter = EntryFilter {
            vehicle: Some(String::new()),
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&entries).len(), 3);
    }
}
