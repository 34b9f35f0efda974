//! Ingestion pipeline: raw tabular text to validated benefit records.

pub mod extractor;
pub mod tokenizer;

pub use extractor::{clean_text, extract};
pub use tokenizer::tokenize;

use crate::error::Result;
use crate::types::BenefitRecord;

/// Tokenize and extract in one step. Either the full record set is produced
/// or the whole payload is rejected.
pub fn ingest(text: &str) -> Result<Vec<BenefitRecord>> {
    let rows = tokenize(text);
    extract(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_multiline_sheet() {
        let csv = "Benefits directory,,,,,,,\r\n\
Post ID,למי זה,קטגוריה,תת קטגוריה,ארגון,לינק,עודכן,פרטים\r\n\
101,\"מילואים, עצמאי\",בנקים,,בנק,https://a,1/1/24,\"שורה ראשונה\nשורה שנייה\"\r\n\
102,כולם,חינוך,,,,,\r\n\
103,כולם,חינוך,,משרד החינוך,,,\r\n";
        let records = ingest(csv).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "101");
        assert_eq!(records[0].details, "שורה ראשונה\nשורה שנייה");
        assert_eq!(records[1].organization, "משרד החינוך");
    }
}
