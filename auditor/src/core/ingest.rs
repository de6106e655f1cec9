//! Spreadsheet ingest
//!
//! Turns raw input bytes into validated [`SubscriptionRecord`]s. Encoding and
//! delimiter are detected, headers are mapped onto canonical fields through
//! [`ColumnAliases`], and every row that fails validation is reported as an
//! [`AuditError`] instead of aborting the batch.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::{AuditError, SubscriptionRecord};

use super::config::ColumnAliases;

/// Category assigned when the column is absent or the cell is blank
pub const UNCATEGORIZED: &str = "uncategorized";

const DELIMITERS: [u8; 4] = [b',', b'\t', b';', b'|'];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

const DATETIME_FORMATS: [&str; 1] = ["%Y-%m-%d %H:%M:%S"];

/// Result of reading one input file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    pub records: Vec<SubscriptionRecord>,
    pub errors: Vec<AuditError>,
}

impl IngestOutcome {
    /// Rows that were present but could not be used
    pub fn skipped(&self) -> usize {
        self.errors
            .iter()
            .filter(|e| matches!(e, AuditError::MalformedRecord { .. }))
            .count()
    }
}

/// Header positions of the canonical fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub monthly_cost: usize,
    pub last_used_date: usize,
    pub usage_count: usize,
    pub category: Option<usize>,
}

/// Decode input bytes as UTF-8 (dropping a BOM), falling back to Latin-1
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        // Every byte is a valid Latin-1 code point
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// First candidate delimiter that splits the header line into several columns
pub fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    DELIMITERS
        .into_iter()
        .find(|&d| header.split(d as char).count() > 1)
        .unwrap_or(b',')
}

/// Lowercase with spaces and hyphens folded to underscores, so `Last Used` matches `last_used`
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Resolve canonical fields against the header row.
///
/// Exact (case-insensitive) matches are resolved for every field before any
/// substring match, and a header claimed by one field is never reused for
/// another. Returns one `MissingColumn` per required field left unresolved.
pub fn map_columns(headers: &[String], aliases: &ColumnAliases) -> Result<ColumnMap, Vec<AuditError>> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let fields: [(&str, &Vec<String>); 5] = [
        ("name", &aliases.name),
        ("monthly_cost", &aliases.monthly_cost),
        ("last_used_date", &aliases.last_used_date),
        ("usage_count", &aliases.usage_count),
        ("category", &aliases.category),
    ];

    let mut resolved: [Option<usize>; 5] = [None; 5];
    let mut claimed = vec![false; normalized.len()];

    for (slot, (_, candidates)) in fields.iter().enumerate() {
        let hit = candidates.iter().find_map(|candidate| {
            let candidate = normalize_header(candidate);
            normalized
                .iter()
                .enumerate()
                .find(|(idx, header)| !claimed[*idx] && !candidate.is_empty() && **header == candidate)
                .map(|(idx, _)| idx)
        });
        if let Some(idx) = hit {
            claimed[idx] = true;
            resolved[slot] = Some(idx);
        }
    }

    for (slot, (_, candidates)) in fields.iter().enumerate() {
        if resolved[slot].is_some() {
            continue;
        }
        let hit = normalized.iter().enumerate().find_map(|(idx, header)| {
            if claimed[idx] || header.is_empty() {
                return None;
            }
            candidates
                .iter()
                .map(|c| normalize_header(c))
                .filter(|c| !c.is_empty())
                .any(|c| header.contains(&c) || c.contains(header.as_str()))
                .then_some(idx)
        });
        if let Some(idx) = hit {
            claimed[idx] = true;
            resolved[slot] = Some(idx);
        }
    }

    let missing: Vec<AuditError> = fields[..4]
        .iter()
        .zip(resolved.iter())
        .filter(|(_, idx)| idx.is_none())
        .map(|((field, _), _)| AuditError::MissingColumn {
            field: field.to_string(),
        })
        .collect();

    match resolved {
        [Some(name), Some(monthly_cost), Some(last_used_date), Some(usage_count), category] => Ok(ColumnMap {
            name,
            monthly_cost,
            last_used_date,
            usage_count,
            category,
        }),
        _ => Err(missing),
    }
}

/// Parse a money amount such as `"$1,299.00"`
pub fn parse_cost(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | '£' | '€' | ',') && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Err("missing monthly_cost".to_string());
    }
    let value: f64 = cleaned
        .parse()
        .map_err(|_| format!("unparseable monthly_cost '{}'", raw.trim()))?;
    if !value.is_finite() {
        return Err(format!("unparseable monthly_cost '{}'", raw.trim()));
    }
    if value < 0.0 {
        return Err(format!("negative monthly_cost {value}"));
    }
    Ok(value)
}

/// Parse a last-used date in any of the accepted layouts
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("missing last_used_date".to_string());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
        .ok_or_else(|| format!("unparseable last_used_date '{raw}'"))
}

/// Parse a usage count; integral floats such as `"12.0"` are accepted
pub fn parse_usage(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("missing usage_count".to_string());
    }
    if let Ok(count) = raw.parse::<u64>() {
        return Ok(count);
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| format!("unparseable usage_count '{raw}'"))?;
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(format!("non-integral usage_count '{raw}'"));
    }
    if value < 0.0 {
        return Err(format!("negative usage_count '{raw}'"));
    }
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it overflows
    if value >= u64::MAX as f64 {
        return Err(format!("usage_count '{raw}' is too large"));
    }
    Ok(value as u64)
}

fn field<'a>(row: &'a csv::StringRecord, idx: usize, name: &str) -> Result<&'a str, String> {
    match row.get(idx).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("missing {name}")),
    }
}

fn parse_row(row: &csv::StringRecord, columns: &ColumnMap, line: usize) -> Result<SubscriptionRecord, String> {
    let name = field(row, columns.name, "name")?.to_string();
    let monthly_cost = parse_cost(field(row, columns.monthly_cost, "monthly_cost")?)?;
    let last_used_date = parse_date(field(row, columns.last_used_date, "last_used_date")?)?;
    let usage_count = parse_usage(field(row, columns.usage_count, "usage_count")?)?;
    let category = columns
        .category
        .and_then(|idx| row.get(idx))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(UNCATEGORIZED)
        .to_string();

    Ok(SubscriptionRecord {
        name,
        monthly_cost,
        last_used_date,
        usage_count,
        category,
        line,
    })
}

/// Parse decoded spreadsheet text into records and per-row errors
pub fn parse_records(content: &str, aliases: &ColumnAliases) -> IngestOutcome {
    let mut outcome = IngestOutcome::default();
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = match reader.headers() {
        Ok(headers) => headers.iter().map(str::to_string).collect(),
        Err(e) => {
            outcome.errors.push(AuditError::malformed(1, format!("unreadable header: {e}")));
            return outcome;
        }
    };
    if headers.iter().all(|h| h.trim().is_empty()) {
        return outcome;
    }

    let columns = match map_columns(&headers, aliases) {
        Ok(columns) => columns,
        Err(missing) => {
            outcome.errors = missing;
            return outcome;
        }
    };

    for result in reader.records() {
        match result {
            Ok(row) => {
                if row.iter().all(|f| f.trim().is_empty()) {
                    continue;
                }
                let line = row.position().map(|p| p.line() as usize).unwrap_or(0);
                match parse_row(&row, &columns, line) {
                    Ok(record) => outcome.records.push(record),
                    Err(reason) => outcome.errors.push(AuditError::malformed(line, reason)),
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                outcome.errors.push(AuditError::malformed(line, e.to_string()));
            }
        }
    }

    outcome
}
