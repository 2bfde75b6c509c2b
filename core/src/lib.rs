pub mod auth;
pub mod config;
pub mod error;
pub mod filter;
pub mod input;
pub mod model;
pub mod report;
pub mod repository;
pub mod service;
pub mod time;

pub use auth::{CredentialCheck, PinGate};
pub use config::{resolve_data_dir, LedgerConfig};
pub use error::{LedgerError, Result};
pub use filter::EntryFilter;
pub use input::{apply_fields, build_entry, expand_key, parse_args, ParsedInput};
pub use model::entry::{Entry, EntryRecord};
pub use model::stats::{BestDay, ChartPoint, DailyProfit, SummaryStats, TrendMode};
pub use report::currency::{CurrencyFormat, Grouping};
pub use report::digest::share_digest;
pub use report::document::{build_document, Document, ReportContext};
pub use report::html::{render_html, report_filename};
pub use repository::{EntryRepository, FileEntryRepository};
pub use service::ledger_service::LedgerService;
pub use service::summary::{compute_summary, daily_profits};
pub use service::trend::build_trend;
pub use time::parse_entry_date;
