use std::collections::HashMap;

use crate::models::{ConsolidatedDonor, DonationRecord};

/// Collapses repeat donations from the same named donor into one entry.
///
/// Entries appear in the order their first donation was seen. A named
/// donor's `created_at` is that of their first donation in feed order.
/// Anonymous donations are never merged, so each keeps its own entry.
pub fn consolidate(records: &[DonationRecord]) -> Vec<ConsolidatedDonor> {
    let mut donors: Vec<ConsolidatedDonor> = Vec::new();
    let mut by_name: HashMap<&str, usize> = HashMap::new();

    for record in records {
        if record.is_anonymous {
            donors.push(single(record));
            continue;
        }

        match by_name.get(record.donor_name.as_str()) {
            Some(&index) => {
                let entry = &mut donors[index];
                entry.amount += record.amount;
                entry.donation_count += 1;
            }
            None => {
                by_name.insert(record.donor_name.as_str(), donors.len());
                donors.push(single(record));
            }
        }
    }

    donors
}

fn single(record: &DonationRecord) -> ConsolidatedDonor {
    ConsolidatedDonor {
        donor_name: record.donor_name.clone(),
        amount: record.amount,
        is_anonymous: record.is_anonymous,
        created_at: record.created_at,
        donation_count: 1,
    }
}
