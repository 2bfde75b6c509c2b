use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One trip/day record for a vehicle and driver.
///
/// Numeric fields are always populated; absent values from storage are
/// defaulted to zero once, when an [`EntryRecord`] is converted.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub date: NaiveDate,
    pub vehicle_id: String,
    pub driver_name: String,
    pub trip_from: Option<String>,
    pub trip_to: Option<String>,
    pub distance_km: f64,
    pub income: f64,
    pub fuel: f64,
    pub maintenance: f64,
    pub other: f64,
    pub driver_salary: f64,
    pub notes: String,
}

impl Entry {
    pub fn new(date: NaiveDate, vehicle_id: String, driver_name: String) -> Self {
        Self {
            id: None,
            created_at: None,
            date,
            vehicle_id,
            driver_name,
            trip_from: None,
            trip_to: None,
            distance_km: 0.0,
            income: 0.0,
            fuel: 0.0,
            maintenance: 0.0,
            other: 0.0,
            driver_salary: 0.0,
            notes: String::new(),
        }
    }

    /// fuel + maintenance + other + driver salary
    pub fn total_expense(&self) -> f64 {
        self.fuel + self.maintenance + self.other + self.driver_salary
    }

    pub fn profit(&self) -> f64 {
        self.income - self.total_expense()
    }
}

/// Stored row shape. Column names match the storage schema and every
/// numeric column may be missing or null.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct EntryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub date: NaiveDate,
    #[serde(default)]
    pub vehicle_number: String,
    #[serde(default)]
    pub driver_name: String,
    #[serde(default)]
    pub trip_from: Option<String>,
    #[serde(default)]
    pub trip_to: Option<String>,
    #[serde(default)]
    pub total_km: Option<f64>,
    #[serde(default)]
    pub income_amount: Option<f64>,
    #[serde(default)]
    pub fuel_expense: Option<f64>,
    #[serde(default)]
    pub maintenance_expense: Option<f64>,
    #[serde(default)]
    pub other_expense: Option<f64>,
    #[serde(default)]
    pub driver_salary: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<EntryRecord> for Entry {
    fn from(record: EntryRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            date: record.date,
            vehicle_id: record.vehicle_number,
            driver_name: record.driver_name,
            trip_from: record.trip_from.filter(|s| !s.is_empty()),
            trip_to: record.trip_to.filter(|s| !s.is_empty()),
            distance_km: record.total_km.unwrap_or(0.0),
            income: record.income_amount.unwrap_or(0.0),
            fuel: record.fuel_expense.unwrap_or(0.0),
            maintenance: record.maintenance_expense.unwrap_or(0.0),
            other: record.other_expense.unwrap_or(0.0),
            driver_salary: record.driver_salary.unwrap_or(0.0),
            notes: record.notes.unwrap_or_default(),
        }
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id,
            created_at: entry.created_at,
            date: entry.date,
            vehicle_number: entry.vehicle_id.clone(),
            driver_name: entry.driver_name.clone(),
            trip_from: entry.trip_from.clone(),
            trip_to: entry.trip_to.clone(),
            total_km: Some(entry.distance_km),
            income_amount: Some(entry.income),
            fuel_expense: Some(entry.fuel),
            maintenance_expense: Some(entry.maintenance),
            other_expense: Some(entry.other),
            driver_salary: Some(entry.driver_salary),
            notes: Some(entry.notes.clone()),
        }
    }
}
