//! Request and response types for the `spending_by_transaction` endpoint.
//!
//! [`PageRequest`] serializes directly into the JSON payload the endpoint
//! expects. Responses decode into [`PageResponse`] on the wire; the fetch
//! layer validates the `results` key and hands the driver a
//! [`TransactionPage`].

use serde::{Deserialize, Serialize};

use crate::config::PullConfig;

/// One record as returned by the API: field name mapped to a JSON value,
/// with nested objects for classification and location fields.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

// ==================== Request Types ====================

/// Payload for one page of one filter category.
///
/// Constructed fresh per request from the pull configuration and never
/// mutated; the serialized form matches the endpoint's filter contract.
#[derive(Debug, Clone, Serialize)]
pub struct PageRequest {
    pub filters: TransactionFilters,
    pub fields: Vec<String>,
    pub page: u32,
    pub limit: usize,
    pub sort: String,
    pub order: String,
}

/// The `filters` object of a search payload.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionFilters {
    pub award_type_codes: Vec<String>,
    /// Always a single code: categories are pulled one at a time.
    pub naics_codes: Vec<String>,
    pub award_date_range: AwardDateRange,
}

/// Inclusive date range bounds for the award filter.
#[derive(Debug, Clone, Serialize)]
pub struct AwardDateRange {
    pub start_date: String,
    pub end_date: String,
}

impl PageRequest {
    /// Builds the request for `page` of the category `naics_code`.
    #[must_use]
    pub fn new(config: &PullConfig, naics_code: &str, page: u32) -> Self {
        Self {
            filters: TransactionFilters {
                award_type_codes: config.award_type_codes.clone(),
                naics_codes: vec![naics_code.to_string()],
                award_date_range: AwardDateRange {
                    start_date: config.start_date.clone(),
                    end_date: config.end_date.clone(),
                },
            },
            fields: config.fields.clone(),
            page,
            limit: config.page_size,
            sort: config.sort_field.clone(),
            order: config.sort_order.clone(),
        }
    }

    /// The single NAICS code this request is scoped to.
    #[must_use]
    pub fn naics_code(&self) -> &str {
        self.filters
            .naics_codes
            .first()
            .map_or("", String::as_str)
    }
}

// ==================== Response Types ====================

/// Decoded wire response from the search endpoint.
///
/// `results` is optional on purpose: a body that decodes but lacks the key is
/// surfaced as a distinct error by the fetch layer instead of being treated
/// as end-of-data.
#[derive(Debug, Deserialize)]
pub struct PageResponse {
    pub results: Option<Vec<RawRecord>>,
    #[serde(default)]
    pub page_metadata: Option<PageMetadata>,
}

/// Pagination metadata echoed by the endpoint. Logged for diagnostics only;
/// termination is decided from result counts.
#[derive(Debug, Deserialize)]
pub struct PageMetadata {
    pub page: Option<u32>,
    #[serde(rename = "hasNext")]
    pub has_next: Option<bool>,
}

/// One validated page of records, as handed to the pipeline driver.
#[derive(Debug, Default)]
pub struct TransactionPage {
    pub records: Vec<RawRecord>,
    /// The endpoint's own has-more hint, when present.
    pub has_next: Option<bool>,
}

impl TransactionPage {
    /// Builds a page from a list of records (no metadata hint).
    #[must_use]
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        Self {
            records,
            has_next: None,
        }
    }
}
