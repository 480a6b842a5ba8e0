use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

/// One donation as the feed serves it. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDonation {
    pub amount: Decimal,
    pub name: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// Body of one `/donations` page.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPage {
    pub references: FeedReferences,
    pub meta: FeedMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedReferences {
    pub donations: Vec<RawDonation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedMeta {
    pub has_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationRecord {
    pub amount: Decimal,
    pub donor_name: String,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// A donor after consolidation. Named donors carry the sum of all their
/// donations; anonymous donations stay one entry each.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedDonor {
    pub donor_name: String,
    pub amount: Decimal,
    pub is_anonymous: bool,
    /// Timestamp of the first constituent in feed order.
    pub created_at: DateTime<Utc>,
    pub donation_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatisticsSummary {
    pub count: usize,
    pub total: Decimal,
    pub median: Decimal,
    pub mean: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    All,
    Anonymous,
    Named,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "All donations",
            Category::Anonymous => "Anonymous donations",
            Category::Named => "Named donations",
        }
    }
}
