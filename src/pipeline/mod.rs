//! Sequential pull pipeline: per-category pagination, flattening, and export.
//!
//! The driver walks the configured filter categories one at a time, paging
//! through the [`Fetcher`] until a category is exhausted, flattening records
//! as they arrive. Termination per category:
//!
//! - an empty result list means no more data;
//! - a partial page (fewer records than the page size) is the last page;
//! - a full page advances the page counter after a pacing delay;
//! - a hard page cap stops a category that never returns a short page.
//!
//! After each completed category the accumulated rows are checkpointed to a
//! sidecar file so a late fatal failure does not discard the whole run. After
//! all categories the table is deduplicated and written once to the output
//! path. A fatal fetch error is not caught here; it propagates and ends the
//! run.
//!
//! # Example
//!
//! ```no_run
//! use spendpull_core::{PullConfig, PullPipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = PullPipeline::new(PullConfig::default())?;
//! let stats = pipeline.run().await?;
//! println!("wrote {} rows", stats.rows_written);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::{PageRequest, RawRecord};
use crate::config::PullConfig;
use crate::fetch::{FetchError, Fetcher, SpendingClient};
use crate::record::flatten;
use crate::table::ResultTable;

/// Errors that can end a pull.
#[derive(Debug, Error)]
pub enum PullError {
    /// A page fetch failed fatally.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The output or checkpoint file could not be written.
    #[error("failed to write {path}: {source}")]
    Output {
        /// The file that failed to write.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Counters from one pull run.
#[derive(Debug, Default, Clone, Copy)]
pub struct PullStats {
    /// Page requests issued across all categories.
    pub requests: usize,
    /// Records accumulated before deduplication.
    pub records_fetched: usize,
    /// Rows in the final deduplicated table.
    pub rows_written: usize,
    /// Exact-duplicate rows dropped.
    pub duplicates_removed: usize,
    /// Categories stopped by the hard page cap.
    pub categories_capped: usize,
}

/// The sequential pull driver.
///
/// Generic over the [`Fetcher`] so tests drive the pagination state machine
/// with scripted pages instead of a live endpoint.
#[derive(Debug)]
pub struct PullPipeline<F: Fetcher> {
    config: PullConfig,
    fetcher: F,
}

impl PullPipeline<SpendingClient> {
    /// Creates a pipeline backed by the production HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::ClientBuild`] if HTTP client construction fails.
    pub fn new(config: PullConfig) -> Result<Self, FetchError> {
        let fetcher = SpendingClient::new(&config)?;
        Ok(Self { config, fetcher })
    }
}

impl<F: Fetcher> PullPipeline<F> {
    /// Creates a pipeline with an externally supplied fetcher.
    #[must_use]
    pub fn with_fetcher(config: PullConfig, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    /// Returns the configuration in effect.
    #[must_use]
    pub fn config(&self) -> &PullConfig {
        &self.config
    }

    /// Pulls every configured category, then deduplicates and writes the
    /// result table.
    ///
    /// # Errors
    ///
    /// Returns [`PullError`] on a fatal fetch failure or when the output
    /// cannot be written. Already-checkpointed categories stay on disk;
    /// nothing else is saved.
    #[instrument(skip(self), fields(categories = self.config.naics_codes.len()))]
    pub async fn run(&self) -> Result<PullStats, PullError> {
        let mut stats = PullStats::default();
        let mut rows: Vec<RawRecord> = Vec::new();

        info!(
            categories = self.config.naics_codes.len(),
            start_date = %self.config.start_date,
            end_date = %self.config.end_date,
            "starting transaction pull"
        );

        for naics in &self.config.naics_codes {
            info!(naics = naics.as_str(), "pulling category");
            self.pull_category(naics, &mut rows, &mut stats).await?;
            self.write_checkpoint(&rows)?;
        }

        let table = ResultTable::from_records(&rows);
        stats.records_fetched = rows.len();
        stats.duplicates_removed = rows.len() - table.len();
        stats.rows_written = table.len();

        table
            .write_csv(&self.config.output_path)
            .map_err(|source| PullError::Output {
                path: self.config.output_path.clone(),
                source,
            })?;
        let _ = std::fs::remove_file(self.config.checkpoint_path());

        info!(
            rows = stats.rows_written,
            duplicates = stats.duplicates_removed,
            path = %self.config.output_path.display(),
            "pull complete"
        );

        Ok(stats)
    }

    /// Pages through one category, flattening and accumulating records.
    async fn pull_category(
        &self,
        naics: &str,
        rows: &mut Vec<RawRecord>,
        stats: &mut PullStats,
    ) -> Result<(), FetchError> {
        let mut page = 1u32;
        loop {
            if page > self.config.max_pages {
                stats.categories_capped += 1;
                warn!(
                    naics,
                    max_pages = self.config.max_pages,
                    "page cap reached, stopping category to avoid a runaway loop"
                );
                return Ok(());
            }

            let request = PageRequest::new(&self.config, naics, page);
            let fetched = self.fetcher.fetch_page(&request).await?;
            stats.requests += 1;

            let count = fetched.records.len();
            if count == 0 {
                debug!(naics, page, "no results returned, category exhausted");
                return Ok(());
            }

            info!(naics, page, records = count, "fetched page");
            rows.extend(fetched.records.into_iter().map(flatten));

            if count < self.config.page_size {
                debug!(naics, page, "final partial page reached");
                return Ok(());
            }

            page += 1;
            tokio::time::sleep(self.config.page_delay).await;
        }
    }

    /// Writes the rows accumulated so far to the sidecar checkpoint.
    fn write_checkpoint(&self, rows: &[RawRecord]) -> Result<(), PullError> {
        let path = self.config.checkpoint_path();
        let table = ResultTable::from_records(rows);
        debug!(rows = table.len(), path = %path.display(), "writing checkpoint");
        table.write_csv(&path).map_err(|source| PullError::Output {
            path,
            source,
        })
    }
}
