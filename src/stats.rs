use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{Category, ConsolidatedDonor, DonationRecord, StatisticsSummary};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StatsError {
    #[error("no donations to summarize")]
    EmptyDataset,
}

pub fn summarize(amounts: &[Decimal]) -> Result<StatisticsSummary, StatsError> {
    if amounts.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    let mut sorted = amounts.to_vec();
    sorted.sort();

    let count = sorted.len();
    let total: Decimal = sorted.iter().copied().sum();
    let middle = count / 2;
    let median = if count % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / Decimal::from(2)
    } else {
        sorted[middle]
    };
    let mean = (total / Decimal::from(count)).round_dp(2);
    let max = sorted[count - 1];

    Ok(StatisticsSummary {
        count,
        total,
        median,
        mean,
        max,
    })
}

/// Per-category summaries. An empty category has no summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdown {
    pub all: Option<StatisticsSummary>,
    pub anonymous: Option<StatisticsSummary>,
    pub named: Option<StatisticsSummary>,
}

impl CategoryBreakdown {
    pub fn from_records(records: &[DonationRecord]) -> Self {
        let (anonymous, named): (Vec<&DonationRecord>, Vec<&DonationRecord>) =
            records.iter().partition(|record| record.is_anonymous);

        let amounts = |subset: &[&DonationRecord]| -> Vec<Decimal> {
            subset.iter().map(|record| record.amount).collect()
        };
        let all: Vec<Decimal> = records.iter().map(|record| record.amount).collect();

        Self {
            all: summarize(&all).ok(),
            anonymous: summarize(&amounts(&anonymous)).ok(),
            named: summarize(&amounts(&named)).ok(),
        }
    }

    pub fn get(&self, category: Category) -> Option<&StatisticsSummary> {
        match category {
            Category::All => self.all.as_ref(),
            Category::Anonymous => self.anonymous.as_ref(),
            Category::Named => self.named.as_ref(),
        }
    }
}

/// The `n` largest donors, ties kept in their original order.
pub fn top_donors(donors: &[ConsolidatedDonor], n: usize) -> Vec<ConsolidatedDonor> {
    let mut ranked = donors.to_vec();
    ranked.sort_by(|a, b| b.amount.cmp(&a.amount));
    ranked.truncate(n);
    ranked
}

/// Donors whose total meets `threshold`, in encounter order.
pub fn big_donors(donors: &[ConsolidatedDonor], threshold: Decimal) -> Vec<ConsolidatedDonor> {
    donors
        .iter()
        .filter(|donor| donor.amount >= threshold)
        .cloned()
        .collect()
}
