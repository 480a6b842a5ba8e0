use crate::models::{DonationRecord, RawDonation};

pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Maps feed records onto `DonationRecord`, one for one and in order.
pub fn normalize(raw: Vec<RawDonation>) -> Vec<DonationRecord> {
    raw.into_iter().map(normalize_one).collect()
}

fn normalize_one(raw: RawDonation) -> DonationRecord {
    let trimmed = raw.name.trim();
    let donor_name = if raw.is_anonymous && trimmed.is_empty() {
        ANONYMOUS_NAME.to_string()
    } else {
        trimmed.to_string()
    };

    DonationRecord {
        amount: raw.amount,
        donor_name,
        is_anonymous: raw.is_anonymous,
        created_at: raw.created_at,
    }
}
