//! Pull configuration for the transaction pipeline.
//!
//! All pull parameters live in one explicit [`PullConfig`] value handed to the
//! pipeline at construction, rather than ambient statics. Production runs use
//! [`PullConfig::default`]; tests inject small page sizes, low page caps, and
//! millisecond backoff.

use std::path::PathBuf;
use std::time::Duration;

/// Production search endpoint for contract transactions.
pub const DEFAULT_ENDPOINT: &str =
    "https://api.usaspending.gov/api/v2/search/spending_by_transaction/";

/// Default maximum fetch attempts per page request (including the first).
pub const DEFAULT_MAX_RETRIES: u32 = 7;

/// Default records per page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default hard cap on pages per filter category.
pub const DEFAULT_MAX_PAGES: u32 = 200;

/// Default pause between successive full-page fetches within a category.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(300);

/// Default base delay for exponential retry backoff (1 second).
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Default HTTP connect timeout (10 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default HTTP read timeout (30 seconds).
pub const READ_TIMEOUT_SECS: u64 = 30;

/// Aerospace and adjacent manufacturing NAICS codes (intentionally broad).
const AEROSPACE_NAICS: &[&str] = &[
    "336411", "336412", "336413", "336414", "336415", "336419", "334511", "334515", "334419",
    "332710", "332721",
];

/// Contract award type codes: definitive contracts and delivery/purchase orders.
const AWARD_TYPE_CODES: &[&str] = &["A", "B", "C", "D"];

/// Fields requested from the search endpoint. The four nested fields
/// (`NAICS`, `PSC`, and the two location roles) are flattened before export.
const REQUESTED_FIELDS: &[&str] = &[
    "Award ID",
    "Mod",
    "Recipient Name",
    "Recipient UEI",
    "Recipient Location",
    "Primary Place of Performance",
    "Issued Date",
    "Action Date",
    "Transaction Amount",
    "Transaction Description",
    "Awarding Agency",
    "Awarding Sub Agency",
    "Award Type",
    "NAICS",
    "PSC",
    "Funding Agency",
];

/// Configuration for one transaction pull.
///
/// Every knob the pipeline reads lives here: the endpoint, the award date
/// range, pagination limits, the filter category list, retry behavior, pacing,
/// timeouts, and the output path. The value is immutable for the duration of
/// a run.
#[derive(Debug, Clone)]
pub struct PullConfig {
    /// Full URL of the search endpoint (overridden in tests to a mock server).
    pub endpoint: String,

    /// Inclusive start of the award date range (`YYYY-MM-DD`).
    pub start_date: String,

    /// Inclusive end of the award date range (`YYYY-MM-DD`).
    pub end_date: String,

    /// Records requested per page.
    pub page_size: usize,

    /// Hard cap on pages fetched per filter category.
    pub max_pages: u32,

    /// NAICS codes pulled one category at a time.
    pub naics_codes: Vec<String>,

    /// Award type codes included in every request.
    pub award_type_codes: Vec<String>,

    /// Sort field sent with every request.
    pub sort_field: String,

    /// Sort direction sent with every request.
    pub sort_order: String,

    /// Field names requested from the endpoint.
    pub fields: Vec<String>,

    /// Maximum fetch attempts per page request (including the first).
    pub max_retries: u32,

    /// Base delay for exponential retry backoff.
    pub backoff_base: Duration,

    /// Pause between successive full-page fetches within a category.
    pub page_delay: Duration,

    /// HTTP connect timeout in seconds.
    pub connect_timeout_secs: u64,

    /// HTTP read timeout in seconds.
    pub read_timeout_secs: u64,

    /// Path the final deduplicated CSV is written to.
    pub output_path: PathBuf,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            start_date: "2023-01-01".to_string(),
            end_date: "2025-12-31".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            naics_codes: AEROSPACE_NAICS.iter().map(ToString::to_string).collect(),
            award_type_codes: AWARD_TYPE_CODES.iter().map(ToString::to_string).collect(),
            sort_field: "Transaction Amount".to_string(),
            sort_order: "desc".to_string(),
            fields: REQUESTED_FIELDS.iter().map(ToString::to_string).collect(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
            page_delay: DEFAULT_PAGE_DELAY,
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            output_path: PathBuf::from("usaspending_output/aerospace_execution_transactions.csv"),
        }
    }
}

impl PullConfig {
    /// Returns a config with a custom retry ceiling, using defaults otherwise.
    #[must_use]
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
            ..Self::default()
        }
    }

    /// Path of the sidecar checkpoint written after each completed category.
    #[must_use]
    pub fn checkpoint_path(&self) -> PathBuf {
        let mut name = self
            .output_path
            .file_name()
            .map_or_else(|| "pull.csv".into(), ToOwned::to_owned);
        name.push(".partial");
        self.output_path.with_file_name(name)
    }
}
