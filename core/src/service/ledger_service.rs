use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::LedgerConfig;
use crate::error::{LedgerError, Result};
use crate::filter::EntryFilter;
use crate::model::entry::Entry;
use crate::model::stats::{ChartPoint, SummaryStats, TrendMode};
use crate::report::digest::share_digest;
use crate::report::document::{build_document, Document, ReportContext};
use crate::repository::EntryRepository;
use crate::service::summary::compute_summary;
use crate::service::trend::build_trend;

/// Entry operations plus the derived views, over an injected repository.
///
/// Nothing is cached: every view is recomputed from a fresh `list()`.
pub struct LedgerService<R: EntryRepository> {
    repo: R,
    config: LedgerConfig,
}

impl<R: EntryRepository> LedgerService<R> {
    pub fn new(repo: R, config: LedgerConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn list(&self) -> Result<Vec<Entry>> {
        self.repo.list()
    }

    pub fn list_filtered(&self, filter: &EntryFilter) -> Result<Vec<Entry>> {
        let entries = self.repo.list()?;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }

    pub fn get(&self, id: &Uuid) -> Result<Entry> {
        self.repo.get(id)
    }

    /// Resolves a full id or a unique prefix of one, as shown in the list.
    pub fn resolve_id(&self, prefix: &str) -> Result<Uuid> {
        if let Ok(id) = Uuid::parse_str(prefix) {
            return Ok(id);
        }

        let prefix = prefix.to_lowercase();
        let matches: Vec<Uuid> = self
            .repo
            .list()?
            .into_iter()
            .filter_map(|e| e.id)
            .filter(|id| id.to_string().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [id] => Ok(*id),
            [] => Err(LedgerError::InvalidInput(format!("no entry matches '{}'", prefix))),
            _ => Err(LedgerError::InvalidInput(format!(
                "'{}' matches {} entries",
                prefix,
                matches.len()
            ))),
        }
    }

    pub fn create(&self, entry: Entry) -> Result<Entry> {
        self.repo.create(entry)
    }

    pub fn update(&self, entry: Entry) -> Result<Entry> {
        self.repo.update(entry)
    }

    pub fn remove(&self, id: &Uuid) -> Result<()> {
        self.repo.remove(id)
    }

    pub fn summary(&self) -> Result<SummaryStats> {
        let entries = self.repo.list()?;
        Ok(compute_summary(&entries))
    }

    pub fn trend(&self, mode: TrendMode) -> Result<Vec<ChartPoint>> {
        let entries = self.repo.list()?;
        Ok(build_trend(&entries, mode))
    }

    /// Lays out the statement for all entries.
    pub fn statement(&self, range_label: &str, generated_at: NaiveDateTime) -> Result<Document> {
        let entries = self.repo.list()?;
        let stats = compute_summary(&entries);
        let report = &self.config.report;
        let ctx = ReportContext {
            title: &report.title,
            subtitle: &report.subtitle,
            range_label,
            generated_at,
            currency: &self.config.currency,
        };
        let doc = build_document(&entries, &stats, &ctx);
        debug!(pages = doc.page_count(), "statement ready");
        Ok(doc)
    }

    pub fn digest(&self) -> Result<String> {
        let stats = self.summary()?;
        Ok(share_digest(
            &stats,
            &self.config.report.digest_heading,
            &self.config.currency,
        ))
    }

    pub fn report_filename(&self, date: NaiveDate) -> String {
        crate::report::html::report_filename(&self.config.report.file_prefix, date)
    }
}
