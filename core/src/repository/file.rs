use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;
use tracing::info;
use uuid::Uuid;

use crate::error::{LedgerError, Result};
use crate::model::entry::{Entry, EntryRecord};
use crate::repository::traits::EntryRepository;

const ENTRIES_FILE_NAME: &str = "entries.json";

/// Stores entries as a JSON array of rows in `<data_dir>/entries.json`.
#[derive(Clone)]
pub struct FileEntryRepository {
    file_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(ENTRIES_FILE_NAME);

        let repo = FileEntryRepository { file_path: path };
        if !repo.file_path.exists() {
            repo.write_records(&[])?;
        }

        Ok(repo)
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_records(&self) -> Result<Vec<EntryRecord>> {
        let file = File::open(&self.file_path)?;
        let reader = BufReader::new(file);
        let records = serde_json::from_reader(reader)?;
        Ok(records)
    }

    /// Writes a sibling temp file and renames it over the ledger, so a
    /// failed write leaves the previous contents in place.
    fn write_records(&self, records: &[EntryRecord]) -> Result<()> {
        let dir = self.file_path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(&self.file_path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// Newest date first; entries sharing a date are ordered newest-created first.
pub fn sort_newest_first(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

impl EntryRepository for FileEntryRepository {
    fn list(&self) -> Result<Vec<Entry>> {
        let mut entries: Vec<Entry> = self
            .read_records()?
            .into_iter()
            .map(Entry::from)
            .collect();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    fn get(&self, id: &Uuid) -> Result<Entry> {
        self.read_records()?
            .into_iter()
            .find(|r| r.id.as_ref() == Some(id))
            .map(Entry::from)
            .ok_or(LedgerError::NotFound(*id))
    }

    fn create(&self, mut entry: Entry) -> Result<Entry> {
        entry.id = Some(Uuid::new_v4());
        entry.created_at = Some(Utc::now());

        let mut records = self.read_records()?;
        records.push(EntryRecord::from(&entry));
        self.write_records(&records)?;

        info!(id = ?entry.id, date = %entry.date, "entry created");
        Ok(entry)
    }

    fn update(&self, mut entry: Entry) -> Result<Entry> {
        let id = entry.id.ok_or(LedgerError::MissingIdentifier)?;

        let mut records = self.read_records()?;
        let pos = records
            .iter()
            .position(|r| r.id == Some(id))
            .ok_or(LedgerError::NotFound(id))?;

        entry.created_at = records[pos].created_at;
        records[pos] = EntryRecord::from(&entry);
        self.write_records(&records)?;

        info!(%id, "entry updated");
        Ok(entry)
    }

    fn remove(&self, id: &Uuid) -> Result<()> {
        let mut records = self.read_records()?;
        let initial_len = records.len();
        records.retain(|r| r.id.as_ref() != Some(id));

        if records.len() == initial_len {
            return Err(LedgerError::NotFound(*id));
        }

        self.write_records(&records)?;
        info!(%id, "entry removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(date: &str, vehicle: &str) -> Entry {
        Entry::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            vehicle.to_string(),
            "Ravi".to_string(),
        )
    }

    #[test]
    fn test_create_assigns_id_and_lists_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();

        repo.create(entry("2024-01-05", "A")).unwrap();
        let created = repo.create(entry("2024-01-07", "B")).unwrap();
        repo.create(entry("2024-01-06", "C")).unwrap();

        assert!(created.id.is_some());
        assert!(created.created_at.is_some());

        let listed: Vec<String> = repo.list().unwrap().into_iter().map(|e| e.vehicle_id).collect();
        assert_eq!(listed, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_update_without_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();

        let err = repo.update(entry("2024-01-05", "A")).unwrap_err();
        assert!(matches!(err, LedgerError::MissingIdentifier));
    }

    #[test]
    fn test_update_replaces_record_and_keeps_created_at() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();

        let created = repo.create(entry("2024-01-05", "A")).unwrap();
        let mut changed = created.clone();
        changed.income = 750.0;
        changed.created_at = None;

        let updated = repo.update(changed).unwrap();
        assert_eq!(updated.created_at, created.created_at);

        let stored = repo.get(&created.id.unwrap()).unwrap();
        assert_eq!(stored.income, 750.0);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_remove_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();

        let created = repo.create(entry("2024-01-05", "A")).unwrap();
        let missing = Uuid::new_v4();
        assert!(matches!(repo.remove(&missing), Err(LedgerError::NotFound(_))));

        repo.remove(&created.id.unwrap()).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_rows_with_missing_columns_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        fs::write(
            repo.path(),
            r#"[{"id":"6f1c2b9e-4b8a-4d53-9a4e-2f3c1d0e5a7b","date":"2024-03-01","vehicle_number":"KA01","driver_name":"Ravi","income_amount":900,"driver_salary":null}]"#,
        )
        .unwrap();

        let entries = repo.list().unwrap();
        assert_eq!(entries[0].driver_salary, 0.0);
        assert_eq!(entries[0].profit(), 900.0);
    }

    #[test]
    fn test_corrupt_file_reports_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        fs::write(repo.path(), "not json").unwrap();
        assert!(matches!(repo.list(), Err(LedgerError::Json(_))));
    }

    #[test]
    fn test_writes_replace_the_file_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();

        let created = repo.create(entry("2024-01-05", "A")).unwrap();
        repo.create(entry("2024-01-06", "B")).unwrap();
        repo.remove(&created.id.unwrap()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec![ENTRIES_FILE_NAME.to_string()]);

        let stored: Vec<EntryRecord> =
            serde_json::from_str(&fs::read_to_string(repo.path()).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].vehicle_number, "B");
    }

    #[test]
    fn test_failed_write_keeps_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileEntryRepository::new(dir.path()).unwrap();
        repo.create(entry("2024-01-05", "A")).unwrap();
        let before = fs::read_to_string(repo.path()).unwrap();

        let gone = FileEntryRepository {
            file_path: dir.path().join("missing").join(ENTRIES_FILE_NAME),
        };
        assert!(matches!(gone.write_records(&[]), Err(LedgerError::Io(_))));
        assert_eq!(fs::read_to_string(repo.path()).unwrap(), before);
    }
}
