use std::time::Duration;

use rust_decimal::Decimal;

pub const DEFAULT_FEED_URL: &str = "https://gateway.gofundme.com/web-gateway/v1/feed";
pub const DEFAULT_PAGE_SIZE: usize = 100;
pub const DEFAULT_SORT: &str = "recent";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_BIG_DONOR_THRESHOLD: i64 = 100;

/// Settings for talking to the donation feed.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub base_url: String,
    /// Records requested per call; also the offset stride.
    pub page_size: usize,
    pub sort: String,
    pub timeout: Duration,
    /// Abort instead of paging forever if the feed never clears `has_next`.
    pub max_pages: Option<usize>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_FEED_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: DEFAULT_SORT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_pages: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub top_n: usize,
    pub big_donor_threshold: Decimal,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            big_donor_threshold: Decimal::from(DEFAULT_BIG_DONOR_THRESHOLD),
        }
    }
}
