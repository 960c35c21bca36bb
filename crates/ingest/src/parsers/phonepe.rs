//! PhonePe statement parser (text).
//!
//! Expected extracted-text rows, repeated through the document:
//!   Jan 05, 2026   7:42 pm   DEBIT₹1,250Paid to Sharma Tea Stall
//!   Jan 07, 2026   9:10 am   CREDIT₹500Received from Bela

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::types::{EntryKind, IngestError, StatementEntry};

fn month_number(abbrev: &str) -> Option<u32> {
    let n = match abbrev.to_ascii_lowercase().as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parses `"Jan 5, 2026"` plus `"7:42 pm"` into a naive timestamp.
fn parse_moment(date: &str, time: &str) -> Option<NaiveDateTime> {
    let mut parts = date.split_whitespace();
    let month = month_number(parts.next()?)?;
    let day: u32 = parts.next()?.trim_end_matches(',').parse().ok()?;
    let year: i32 = parts.next()?.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;

    let (clock, meridiem) = time.split_once(' ')?;
    let (hour, minute) = clock.split_once(':')?;
    let mut hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if hour == 12 {
        hour = 0;
    }
    if meridiem.eq_ignore_ascii_case("pm") {
        hour += 12;
    }
    date.and_hms_opt(hour, minute, 0)
}

/// Scans extracted PhonePe statement text for transaction rows and keeps the
/// ones whose date falls inside `[from, to]` (inclusive).
///
/// Rows that match the shape but fail to parse (bad date, bad amount) are
/// skipped rather than failing the whole statement.
pub fn extract_phonepe_text(
    text: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<StatementEntry>, IngestError> {
    // date  time  DEBIT/CREDIT₹amount  counterparty
    let txn_re = Regex::new(concat!(
        r"(?P<date>\w{3} \d{1,2}, \d{4})\s+",
        r"(?P<time>\d{1,2}:\d{2} [ap]m)\s+",
        r"(?P<kind>DEBIT|CREDIT)₹(?P<amount>[\d,]+(?:\.\d{1,2})?)",
        r"(?P<label>Paid to|Received from) (?P<party>.+)"
    ))?;

    let mut out = Vec::new();
    for caps in txn_re.captures_iter(text) {
        let occurred_at = match parse_moment(&caps["date"], &caps["time"]) {
            Some(moment) => moment,
            None => continue,
        };
        if occurred_at.date() < from || occurred_at.date() > to {
            continue;
        }

        let amount = match caps["amount"].replace(',', "").parse() {
            Ok(amount) => amount,
            Err(_) => continue,
        };
        let kind = if &caps["kind"] == "DEBIT" {
            EntryKind::Debit
        } else {
            EntryKind::Credit
        };

        out.push(StatementEntry {
            occurred_at,
            description: format!("{} {}", &caps["label"], caps["party"].trim()),
            kind,
            amount,
        });
    }

    Ok(out)
}
