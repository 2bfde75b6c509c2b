pub mod file;
pub mod traits;

pub use file::FileEntryRepository;
pub use traits::EntryRepository;
