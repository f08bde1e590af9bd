use chrono::{DateTime, Utc};
use slipscan_core::{Money, ReceiptRecord, ReceiptSeed};

use crate::extract::{extract_amount, extract_date, extract_phone};
use crate::normalize::join_transcript;

const TOTAL_KEYWORDS: &[&str] = &["total"];
const TAX_KEYWORDS: &[&str] = &["gst", "tax"];
const PHONE_KEYWORDS: &[&str] = &["phone", "tel"];

/// Number of lines after the first that make up the address.
const ADDRESS_LINES: usize = 3;

/// Build a receipt record from ordered transcript lines, stamped with the current time.
pub fn assemble_receipt(lines: &[String], seed: Option<&ReceiptSeed>) -> ReceiptRecord {
    assemble_receipt_at(lines, seed, Utc::now())
}

/// Same as [`assemble_receipt`] with an explicit creation instant.
///
/// `business_name` and `address` fall back to the header lines only when the
/// seed leaves them empty. Total, GST, phone and date are overwritten by
/// every later matching line, so the last match in the transcript wins.
pub fn assemble_receipt_at(
    lines: &[String],
    seed: Option<&ReceiptSeed>,
    now: DateTime<Utc>,
) -> ReceiptRecord {
    let seed = seed.cloned().unwrap_or_default();

    let business_name = non_empty(seed.business_name)
        .or_else(|| lines.first().cloned())
        .unwrap_or_default();

    let mut total_amount = seed.total_amount.unwrap_or_default();
    let mut gst_amount = seed.gst_amount;
    let mut phone_number = seed.phone_number.unwrap_or_default();
    let mut transaction_date = seed.transaction_date.unwrap_or_else(|| now.date_naive());

    for line in lines {
        let lowercased = line.to_lowercase();

        if contains_any(&lowercased, TOTAL_KEYWORDS) {
            if let Some(total) = amount(line) {
                total_amount = total;
            }
        }

        if contains_any(&lowercased, TAX_KEYWORDS) {
            if let Some(gst) = amount(line) {
                gst_amount = Some(gst);
            }
        }

        if contains_any(&lowercased, PHONE_KEYWORDS) {
            if let Some(phone) = extract_phone(line) {
                phone_number = phone;
            }
        }

        if let Some(date) = extract_date(line) {
            transaction_date = date;
        }
    }

    let address = non_empty(seed.address).unwrap_or_else(|| {
        lines
            .iter()
            .skip(1)
            .take(ADDRESS_LINES)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    });

    tracing::debug!(
        lines = lines.len(),
        has_gst = gst_amount.is_some(),
        "Assembled receipt for '{business_name}'"
    );

    ReceiptRecord {
        business_name,
        address,
        phone_number,
        transaction_date,
        total_amount,
        gst_amount,
        raw_text: join_transcript(lines),
        created_at: now,
    }
}

fn amount(line: &str) -> Option<Money> {
    // Extracted amounts carry no sign.
    extract_amount(line).and_then(|d| Money::from_decimal(d).ok())
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
