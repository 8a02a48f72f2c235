//! CSV/JSON import for order exports, session counts and sales series
//!
//! Order CSVs are header-driven so column order does not matter. Required
//! columns: `order_id`, `created_at`, `total`, `units`. Optional:
//! `customer_id`, `shipping_days`, `status`.

use std::collections::HashSet;
use std::io::Read;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::ImportConfig;
use crate::error::{Error, Result};
use crate::models::{MonthlySalesPoint, MonthlySummary, OrderRecord, OrderStatus, YearMonth};

/// Sessions recorded for one calendar month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCount {
    pub period: YearMonth,
    pub sessions: u64,
}

/// Column positions resolved from a header row
struct Columns<'a> {
    headers: &'a StringRecord,
}

impl<'a> Columns<'a> {
    fn new(headers: &'a StringRecord) -> Self {
        Self { headers }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.find(name)
            .ok_or_else(|| Error::Import(format!("Missing required column: {}", name)))
    }
}

/// Parse an order export into order records
pub fn parse_orders_csv<R: Read>(reader: R, config: &ImportConfig) -> Result<Vec<OrderRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cols = Columns::new(&headers);
    let order_id_col = cols.require("order_id")?;
    let date_col = cols.require("created_at")?;
    let total_col = cols.require("total")?;
    let units_col = cols.require("units")?;
    let customer_col = cols.find("customer_id");
    let shipping_col = cols.find("shipping_days");
    let status_col = cols.find("status");

    let mut orders = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = i + 2;

        let order_id = field(&record, order_id_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing order_id", line)))?
            .to_string();
        let date = field(&record, date_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing created_at", line)))
            .and_then(|s| parse_date(s, &config.date_formats))
            .map_err(|e| with_line(e, line))?;
        let total = field(&record, total_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing total", line)))
            .and_then(parse_amount)
            .map_err(|e| with_line(e, line))?;
        let units = field(&record, units_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing units", line)))
            .and_then(parse_units)
            .map_err(|e| with_line(e, line))?;
        let customer_id = customer_col
            .and_then(|c| field(&record, c))
            .map(|s| s.to_string());
        let shipping_days = shipping_col
            .and_then(|c| field(&record, c))
            .map(parse_days)
            .transpose()
            .map_err(|e| with_line(e, line))?;
        let status = match status_col.and_then(|c| field(&record, c)) {
            Some(s) => s
                .parse::<OrderStatus>()
                .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?,
            None => OrderStatus::Completed,
        };

        let import_hash = generate_hash(&order_id, &date, total);

        orders.push(OrderRecord {
            order_id,
            date,
            customer_id,
            total,
            units,
            shipping_days,
            status,
            import_hash,
        });
    }

    debug!("Parsed {} order rows", orders.len());
    Ok(orders)
}

/// Drop rows whose import hash was already seen, keeping the first
pub fn dedupe_orders(orders: Vec<OrderRecord>) -> Vec<OrderRecord> {
    let before = orders.len();
    let mut seen = HashSet::new();
    let unique: Vec<OrderRecord> = orders
        .into_iter()
        .filter(|o| seen.insert(o.import_hash.clone()))
        .collect();

    if unique.len() < before {
        info!(
            duplicates = before - unique.len(),
            "Skipped duplicate order rows"
        );
    }
    unique
}

/// Parse a `month,sessions` CSV (month as YYYY-MM)
pub fn parse_sessions_csv<R: Read>(reader: R) -> Result<Vec<SessionCount>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cols = Columns::new(&headers);
    let month_col = cols.require("month")?;
    let sessions_col = cols.require("sessions")?;

    let mut counts = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 2;
        let period = parse_period(field(&record, month_col), line)?;
        let sessions = field(&record, sessions_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing sessions", line)))
            .and_then(parse_units)
            .map_err(|e| with_line(e, line))?;
        counts.push(SessionCount { period, sessions });
    }

    debug!("Parsed {} session rows", counts.len());
    Ok(counts)
}

/// Parse a `month,units` CSV (month as YYYY-MM) into a sales series
pub fn parse_sales_csv<R: Read>(reader: R) -> Result<Vec<MonthlySalesPoint>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let cols = Columns::new(&headers);
    let month_col = cols.require("month")?;
    let units_col = cols.require("units")?;

    let mut series = Vec::new();
    let mut seen = HashSet::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = i + 2;
        let period = parse_period(field(&record, month_col), line)?;
        if !seen.insert(period) {
            return Err(Error::Import(format!(
                "Line {}: duplicate month {}",
                line, period
            )));
        }
        let units = field(&record, units_col)
            .ok_or_else(|| Error::Import(format!("Line {}: missing units", line)))
            .and_then(parse_units)
            .map_err(|e| with_line(e, line))?;
        let date = period
            .first_day()
            .ok_or_else(|| Error::Import(format!("Line {}: invalid month {}", line, period)))?;
        series.push(MonthlySalesPoint::new(date, units));
    }

    debug!("Parsed {} sales points", series.len());
    Ok(series)
}

/// Read a JSON array of monthly summaries
pub fn load_summaries_json<R: Read>(reader: R) -> Result<Vec<MonthlySummary>> {
    let summaries: Vec<MonthlySummary> = serde_json::from_reader(reader)?;
    for s in &summaries {
        if !(1..=12).contains(&s.month) {
            return Err(Error::InvalidData(format!(
                "Summary for store {} has month {} (expected 1-12)",
                s.store_id, s.month
            )));
        }
    }
    Ok(summaries)
}

/// Read a JSON array of sales points
pub fn load_sales_json<R: Read>(reader: R) -> Result<Vec<MonthlySalesPoint>> {
    Ok(serde_json::from_reader(reader)?)
}

/// Non-empty trimmed field
fn field(record: &StringRecord, col: usize) -> Option<&str> {
    record.get(col).map(str::trim).filter(|s| !s.is_empty())
}

fn with_line(err: Error, line: usize) -> Error {
    match err {
        Error::Import(msg) if !msg.starts_with("Line ") => {
            Error::Import(format!("Line {}: {}", line, msg))
        }
        other => other,
    }
}

fn parse_period(value: Option<&str>, line: usize) -> Result<YearMonth> {
    let value = value.ok_or_else(|| Error::Import(format!("Line {}: missing month", line)))?;
    value
        .parse::<YearMonth>()
        .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))
}

/// Generate a unique hash for deduplication
fn generate_hash(order_id: &str, date: &NaiveDate, total: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(order_id.as_bytes());
    hasher.update(date.to_string().as_bytes());
    hasher.update(total.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a date or timestamp using the configured formats
fn parse_date(s: &str, formats: &[String]) -> Result<NaiveDate> {
    let s = s.trim();

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(datetime.date());
        }
    }

    // Timestamps with zones or fractional seconds: fall back to the date prefix
    if let Some(prefix) = s.get(..10) {
        for fmt in formats {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, fmt) {
                return Ok(date);
            }
        }
    }

    Err(Error::Import(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse amount: {}", s)))
}

/// Non-negative day count; currency formatting is not accepted here
fn parse_days(s: &str) -> Result<f64> {
    let days = s
        .trim()
        .parse::<f64>()
        .map_err(|_| Error::Import(format!("Unable to parse shipping days: {}", s)))?;
    if !days.is_finite() || days < 0.0 {
        return Err(Error::Import(format!(
            "Shipping days must be a non-negative number: {}",
            s
        )));
    }
    Ok(days)
}

fn parse_units(s: &str) -> Result<u64> {
    s.trim()
        .replace(',', "")
        .parse::<u64>()
        .map_err(|_| Error::Import(format!("Unable to parse count: {}", s)))
}
