use crate::error::Result;
use crate::model::entry::Entry;
use uuid::Uuid;

/// Persistence collaborator for ledger entries.
pub trait EntryRepository {
    /// All entries, newest date first.
    fn list(&self) -> Result<Vec<Entry>>;
    fn get(&self, id: &Uuid) -> Result<Entry>;
    /// Stores a new entry and returns it with its assigned id.
    fn create(&self, entry: Entry) -> Result<Entry>;
    /// Replaces the stored record with the same id.
    fn update(&self, entry: Entry) -> Result<Entry>;
    fn remove(&self, id: &Uuid) -> Result<()>;
}
