pub mod ledger_service;
pub mod summary;
pub mod trend;
