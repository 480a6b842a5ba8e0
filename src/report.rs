use std::fmt::Write;

use rust_decimal::Decimal;

use crate::analysis::Analysis;
use crate::config::ReportConfig;
use crate::models::{Category, ConsolidatedDonor, StatisticsSummary};

fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

fn write_summary(output: &mut String, category: Category, summary: Option<&StatisticsSummary>) {
    let _ = writeln!(output, "## {}", category.label());

    match summary {
        None => {
            let _ = writeln!(output, "Not applicable: no donations in this category.");
        }
        Some(summary) => {
            let _ = writeln!(output, "- Number of donations: {}", summary.count);
            let _ = writeln!(output, "- Total amount: {}", money(summary.total));
            let _ = writeln!(output, "- Median amount: {}", money(summary.median));
            let _ = writeln!(output, "- Average amount: {}", money(summary.mean));
            let _ = writeln!(output, "- Largest donation: {}", money(summary.max));
        }
    }
}

fn write_donor(output: &mut String, rank: Option<usize>, donor: &ConsolidatedDonor) {
    let prefix = match rank {
        Some(rank) => format!("{rank}."),
        None => "-".to_string(),
    };
    let gifts = if donor.donation_count == 1 {
        String::new()
    } else {
        format!(" across {} donations", donor.donation_count)
    };

    let _ = writeln!(
        output,
        "{} {} {}{} (latest {})",
        prefix,
        donor.donor_name,
        money(donor.amount),
        gifts,
        donor.created_at.format("%Y-%m-%d")
    );
}

pub fn build_report(campaign: &str, analysis: &Analysis, config: &ReportConfig) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Donation Report");
    let _ = writeln!(output, "Campaign: {}", campaign);
    let _ = writeln!(
        output,
        "{} donations from {} named donors ({} gave more than once) and {} anonymous gifts",
        analysis.records.len(),
        analysis.named_donor_count(),
        analysis.repeat_donor_count(),
        analysis.records.iter().filter(|r| r.is_anonymous).count()
    );
    if let Some(share) = analysis.anonymous_share {
        let _ = writeln!(output, "Anonymous share of total: {}%", share);
    }

    for category in [Category::All, Category::Anonymous, Category::Named] {
        let _ = writeln!(output);
        write_summary(&mut output, category, analysis.breakdown.get(category));
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top {} Donors", config.top_n);
    if analysis.top_donors.is_empty() {
        let _ = writeln!(output, "No donations recorded.");
    } else {
        for (index, donor) in analysis.top_donors.iter().enumerate() {
            write_donor(&mut output, Some(index + 1), donor);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(
        output,
        "## Big Donors (at least {})",
        money(config.big_donor_threshold)
    );
    if analysis.big_donors.is_empty() {
        let _ = writeln!(output, "No donors reached the threshold.");
    } else {
        for donor in analysis.big_donors.iter() {
            write_donor(&mut output, None, donor);
        }
    }

    output
}
