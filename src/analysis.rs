use rust_decimal::Decimal;
use tracing::info;

use crate::config::ReportConfig;
use crate::consolidate::consolidate;
use crate::models::{ConsolidatedDonor, DonationRecord, RawDonation};
use crate::normalize::normalize;
use crate::stats::{self, CategoryBreakdown};

/// Everything the report needs, computed in one pass over a fetched set.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<DonationRecord>,
    pub donors: Vec<ConsolidatedDonor>,
    pub breakdown: CategoryBreakdown,
    pub top_donors: Vec<ConsolidatedDonor>,
    pub big_donors: Vec<ConsolidatedDonor>,
    /// Percentage of the total given anonymously; `None` when nothing was given.
    pub anonymous_share: Option<Decimal>,
}

impl Analysis {
    pub fn from_raw(raw: Vec<RawDonation>, config: &ReportConfig) -> Self {
        let records = normalize(raw);
        let donors = consolidate(&records);
        let breakdown = CategoryBreakdown::from_records(&records);
        let top_donors = stats::top_donors(&donors, config.top_n);
        let big_donors = stats::big_donors(&donors, config.big_donor_threshold);

        let anonymous_share = match (&breakdown.all, &breakdown.anonymous) {
            (Some(all), _) if all.total.is_zero() => None,
            (Some(all), Some(anonymous)) => {
                Some((anonymous.total * Decimal::from(100) / all.total).round_dp(1))
            }
            (Some(_), None) => Some(Decimal::ZERO),
            (None, _) => None,
        };

        info!(
            donations = records.len(),
            donors = donors.len(),
            big_donors = big_donors.len(),
            "analyzed donation set"
        );

        Self {
            records,
            donors,
            breakdown,
            top_donors,
            big_donors,
            anonymous_share,
        }
    }

    pub fn named_donor_count(&self) -> usize {
        self.donors.iter().filter(|donor| !donor.is_anonymous).count()
    }

    pub fn repeat_donor_count(&self) -> usize {
        self.donors
            .iter()
            .filter(|donor| !donor.is_anonymous && donor.donation_count > 1)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn raw(name: &str, amount: i64, is_anonymous: bool) -> RawDonation {
        RawDonation {
            amount: Decimal::from(amount),
            name: name.to_string(),
            is_anonymous,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn scenario() -> Vec<RawDonation> {
        vec![
            raw("A", 50, false),
            raw("A", 75, false),
            raw("Anonymous", 20, true),
            raw("B", 500, false),
        ]
    }

    #[test]
    fn end_to_end_scenario() {
        let analysis = Analysis::from_raw(scenario(), &ReportConfig::default());

        let donors: Vec<_> = analysis
            .donors
            .iter()
            .map(|d| (d.donor_name.as_str(), d.amount))
            .collect();
        assert_eq!(
            donors,
            vec![
                ("A", Decimal::from(125)),
                ("Anonymous", Decimal::from(20)),
                ("B", Decimal::from(500)),
            ]
        );

        let all = analysis.breakdown.all.unwrap();
        assert_eq!(all.total, Decimal::from(645));
        assert_eq!(all.count, 4);
        assert_eq!(all.max, Decimal::from(500));

        let big: Vec<_> = analysis
            .big_donors
            .iter()
            .map(|d| (d.donor_name.as_str(), d.amount))
            .collect();
        assert_eq!(
            big,
            vec![("A", Decimal::from(125)), ("B", Decimal::from(500))]
        );
    }

    #[test]
    fn threshold_and_top_n_come_from_config() {
        let config = ReportConfig {
            top_n: 1,
            big_donor_threshold: Decimal::from(500),
        };

        let analysis = Analysis::from_raw(scenario(), &config);

        assert_eq!(analysis.top_donors.len(), 1);
        assert_eq!(analysis.top_donors[0].donor_name, "B");
        assert_eq!(analysis.big_donors.len(), 1);
    }

    #[test]
    fn donor_counts_and_anonymous_share() {
        let analysis = Analysis::from_raw(scenario(), &ReportConfig::default());

        assert_eq!(analysis.named_donor_count(), 2);
        assert_eq!(analysis.repeat_donor_count(), 1);
        assert_eq!(analysis.anonymous_share, Some(Decimal::new(31, 1)));
    }

    #[test]
    fn empty_set_has_no_statistics() {
        let analysis = Analysis::from_raw(Vec::new(), &ReportConfig::default());

        assert!(analysis.breakdown.all.is_none());
        assert!(analysis.breakdown.anonymous.is_none());
        assert!(analysis.breakdown.named.is_none());
        assert!(analysis.anonymous_share.is_none());
        assert!(analysis.top_donors.is_empty());
    }
}
