use crate::constants::{HEADER_MARKER, MIN_COLUMNS};
use crate::error::{DirectoryError, Result};
use crate::metrics::ExtractionMetrics;
use crate::types::{BenefitRecord, RawRow};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static REPEATED_QUOTES: Lazy<Regex> = Lazy::new(|| Regex::new(r#""{2,}"#).expect("valid regex"));

/// Column positions in the upstream spreadsheet. This layout is a fixed
/// contract with the sheet and is never inferred from header text.
mod col {
    pub const ID: usize = 0;
    pub const TARGET_AUDIENCE: usize = 1;
    pub const CATEGORY: usize = 2;
    pub const SUBCATEGORY: usize = 3;
    pub const ORGANIZATION: usize = 4;
    pub const DETAILS_LINK: usize = 5;
    pub const LAST_UPDATED: usize = 6;
    pub const DETAILS: usize = 7;
}

/// Map tokenized rows to benefit records.
///
/// Fails only when no header row is found. Short rows, rows with a blank id
/// and rows with neither organization nor details are skipped silently.
pub fn extract(rows: &[RawRow]) -> Result<Vec<BenefitRecord>> {
    let header_index = find_header(rows).ok_or_else(|| DirectoryError::MissingHeader {
        marker: HEADER_MARKER.to_string(),
    })?;

    let data = &rows[header_index + 1..];
    let mut records = Vec::with_capacity(data.len());
    let mut dropped = 0usize;

    for (offset, row) in data.iter().enumerate() {
        match map_row(row) {
            Some(record) if record.is_valid() => records.push(record),
            _ => {
                dropped += 1;
                debug!(row = header_index + 1 + offset, cells = row.len(), "skipping row");
            }
        }
    }

    ExtractionMetrics::record_rows(records.len(), dropped);
    debug!(kept = records.len(), dropped, "extraction finished");
    Ok(records)
}

/// Index of the first row with a cell containing the header marker
pub fn find_header(rows: &[RawRow]) -> Option<usize> {
    rows.iter()
        .position(|row| row.iter().any(|cell| cell.contains(HEADER_MARKER)))
}

fn map_row(row: &RawRow) -> Option<BenefitRecord> {
    if row.len() < MIN_COLUMNS || row[col::ID].trim().is_empty() {
        return None;
    }

    Some(BenefitRecord {
        id: row[col::ID].trim().to_string(),
        target_audience_raw: clean_text(&row[col::TARGET_AUDIENCE]),
        category: clean_text(&row[col::CATEGORY]),
        subcategory: clean_text(&row[col::SUBCATEGORY]),
        organization: clean_text(&row[col::ORGANIZATION]),
        details_link: row[col::DETAILS_LINK].trim().to_string(),
        last_updated: row[col::LAST_UPDATED].trim().to_string(),
        details: clean_text(&row[col::DETAILS]),
    })
}

/// Trim, collapse runs of double quotes, and strip one outer quote or
/// apostrophe from each end.
pub fn clean_text(value: &str) -> String {
    let collapsed = REPEATED_QUOTES.replace_all(value.trim(), "\"");
    let mut s: &str = &collapsed;
    if let Some(rest) = s.strip_prefix(['"', '\'']) {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix(['"', '\'']) {
        s = rest;
    }
    s.trim().to_string()
}

impl BenefitRecord {
    /// A record needs an id and some descriptive content.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && (!self.organization.is_empty() || !self.details.is_empty())
    }
}
