//! Reader for a donor list copied from a campaign page into a text file.
//!
//! The page lists each donation as three lines (donor name, amount such as
//! `$1,250`, and an age such as `5 d`), separated by blank lines and the
//! occasional `Join this list. Donate now.` banner.

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::RawDonation;
use crate::normalize::ANONYMOUS_NAME;

const BANNER: &str = "Join this list. Donate now.";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("line {line}: donation starting with `{name}` is missing its amount or age")]
    Incomplete { line: usize, name: String },

    #[error("line {line}: `{value}` is not a dollar amount")]
    Amount { line: usize, value: String },

    #[error("line {line}: `{value}` is not a donation age")]
    Age { line: usize, value: String },
}

pub fn parse_export(text: &str, now: DateTime<Utc>) -> Result<Vec<RawDonation>, ExportError> {
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && *line != BANNER)
        .collect();

    let mut donations = Vec::with_capacity(lines.len() / 3);

    for chunk in lines.chunks(3) {
        let [(_, name), (amount_line, amount), (age_line, age)] = chunk else {
            let (line, name) = chunk[0];
            return Err(ExportError::Incomplete {
                line,
                name: name.to_string(),
            });
        };

        let amount = parse_amount(amount).ok_or_else(|| ExportError::Amount {
            line: *amount_line,
            value: amount.to_string(),
        })?;
        let created_at = parse_age(age)
            .and_then(|age| now.checked_sub_signed(age))
            .ok_or_else(|| ExportError::Age {
                line: *age_line,
                value: age.to_string(),
            })?;

        donations.push(RawDonation {
            amount,
            name: name.to_string(),
            is_anonymous: *name == ANONYMOUS_NAME,
            created_at,
        });
    }

    Ok(donations)
}

fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned: String = value
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    let amount = Decimal::from_str(&cleaned).ok()?;
    (!amount.is_sign_negative()).then_some(amount)
}

fn parse_age(value: &str) -> Option<Duration> {
    let lowered = value.to_ascii_lowercase();
    if lowered == "just now" {
        return Some(Duration::zero());
    }

    let digits_end = lowered
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(lowered.len());
    let quantity: i64 = lowered[..digits_end].parse().ok()?;

    match lowered[digits_end..].trim() {
        "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(quantity),
        "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(quantity),
        "d" | "day" | "days" => Duration::try_days(quantity),
        "mo" | "mos" | "month" | "months" => Duration::try_days(quantity.checked_mul(30)?),
        "yr" | "yrs" | "year" | "years" => Duration::try_days(quantity.checked_mul(365)?),
        _ => None,
    }
}
