use crate::constants::{AUDIENCE_PREVIEW_COUNT, DETAILS_ELLIPSIS, DETAILS_PREVIEW_CHARS};
use crate::types::{BenefitRecord, DisplayRecord};

/// Presentation projection of a record: truncated details and an audience preview.
pub fn enhance(record: &BenefitRecord) -> DisplayRecord {
    let (details_truncated, has_more_details) = truncate(&record.details, DETAILS_PREVIEW_CHARS);

    let target_audience_array = record.audience_list();
    let target_audience_displayed: Vec<String> = target_audience_array
        .iter()
        .take(AUDIENCE_PREVIEW_COUNT)
        .cloned()
        .collect();
    let additional_audience_count = target_audience_array
        .len()
        .saturating_sub(AUDIENCE_PREVIEW_COUNT);

    DisplayRecord {
        record: record.clone(),
        details_truncated,
        has_more_details,
        target_audience_array,
        target_audience_displayed,
        has_more_audience: additional_audience_count > 0,
        additional_audience_count,
    }
}

pub fn enhance_all(records: &[BenefitRecord]) -> Vec<DisplayRecord> {
    records.iter().map(enhance).collect()
}

/// Cut `text` to `max` UTF-16 code units, appending an ellipsis when cut.
/// Never splits a surrogate pair.
fn truncate(text: &str, max: usize) -> (String, bool) {
    let mut units = 0usize;
    for (idx, ch) in text.char_indices() {
        if units + ch.len_utf16() > max {
            return (format!("{}{}", &text[..idx], DETAILS_ELLIPSIS), true);
        }
        units += ch.len_utf16();
    }
    (text.to_string(), false)
}
