//! Keyword relevance suggestions for free-form questions.
//!
//! A question is mapped to topic keywords through a synonym table, then every
//! record is scored by where the question, the keywords and their synonyms
//! occur in its text. The best scoring records are returned with a short
//! explanation for display.

use crate::constants::SUGGEST_MAX_RESULTS;
use crate::types::BenefitRecord;
use serde::{Deserialize, Serialize};

const DIRECT_MATCH_SCORE: u32 = 10;
const KEYWORD_SCORE: u32 = 5;
const SYNONYM_SCORE: u32 = 3;
const CATEGORY_SCORE: u32 = 4;
const AUDIENCE_SCORE: u32 = 3;

/// A topic keyword and the words that indicate it, the keyword included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymGroup {
    pub keyword: String,
    pub synonyms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestConfig {
    pub max_results: usize,
    /// Checked in order; keywords are reported in this order
    pub synonyms: Vec<SynonymGroup>,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            max_results: SUGGEST_MAX_RESULTS,
            synonyms: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub query: String,
    pub keywords: Vec<String>,
    pub suggestions: Vec<BenefitRecord>,
    pub explanation: String,
    /// Records with a positive score, before the result limit
    pub total_found: usize,
}

impl SuggestConfig {
    fn synonyms_of(&self, keyword: &str) -> &[String] {
        self.synonyms
            .iter()
            .find(|g| g.keyword == keyword)
            .map(|g| g.synonyms.as_slice())
            .unwrap_or(&[])
    }

    /// Topic keywords whose synonyms occur in `query`
    pub fn extract_keywords(&self, query: &str) -> Vec<String> {
        let query = query.trim().to_lowercase();
        let mut found: Vec<String> = Vec::new();
        for group in &self.synonyms {
            let hit = group
                .synonyms
                .iter()
                .any(|s| !s.is_empty() && query.contains(&s.to_lowercase()));
            if hit && !found.contains(&group.keyword) {
                found.push(group.keyword.clone());
            }
        }
        found
    }

    /// Relevance of `record` to `query`; zero means unrelated
    pub fn score(&self, record: &BenefitRecord, keywords: &[String], query: &str) -> u32 {
        let text = format!(
            "{} {} {} {}",
            record.organization, record.details, record.category, record.target_audience_raw
        )
        .to_lowercase();
        let category = record.category.to_lowercase();
        let audience = record.target_audience_raw.to_lowercase();

        let mut score = 0;
        if text.contains(&query.to_lowercase()) {
            score += DIRECT_MATCH_SCORE;
        }
        for keyword in keywords {
            let keyword_lower = keyword.to_lowercase();
            if text.contains(&keyword_lower) {
                score += KEYWORD_SCORE;
            }
            for synonym in self.synonyms_of(keyword) {
                if text.contains(&synonym.to_lowercase()) {
                    score += SYNONYM_SCORE;
                }
            }
            if category.contains(&keyword_lower) {
                score += CATEGORY_SCORE;
            }
            if audience.contains(&keyword_lower) {
                score += AUDIENCE_SCORE;
            }
        }
        score
    }

    /// Rank `records` against a non-blank `query`
    pub fn suggest(&self, records: &[BenefitRecord], query: &str) -> Suggestion {
        let query = query.trim();
        let keywords = self.extract_keywords(query);

        let mut scored: Vec<(u32, &BenefitRecord)> = records
            .iter()
            .map(|r| (self.score(r, &keywords, query), r))
            .filter(|(score, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        let total_found = scored.len();
        let suggestions: Vec<BenefitRecord> = scored
            .into_iter()
            .take(self.max_results)
            .map(|(_, r)| r.clone())
            .collect();

        Suggestion {
            explanation: explanation(query, &keywords, suggestions.len()),
            query: query.to_string(),
            keywords,
            suggestions,
            total_found,
        }
    }
}

fn explanation(query: &str, keywords: &[String], found: usize) -> String {
    let topics = if keywords.is_empty() {
        "המילים שלכם".to_string()
    } else {
        keywords.join(", ")
    };
    match found {
        0 => format!(
            "לא מצאתי שירותים רלוונטיים לשאלה '{}'. נסו לחפש במילים אחרות או בדקו את הקטגוריות השונות.",
            query
        ),
        1 => format!("מצאתי שירות אחד רלוונטי לשאלה שלכם על {}.", topics),
        n => format!(
            "מצאתי {} שירותים רלוונטיים לשאלה שלכם על {}. השירותים מסודרים לפי רלוונטיות.",
            n, topics
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(keyword: &str, synonyms: &[&str]) -> SynonymGroup {
        SynonymGroup {
            keyword: keyword.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn config() -> SuggestConfig {
        SuggestConfig {
            max_results: 2,
            synonyms: vec![
                group("עסק", &["עסק", "עסקים", "עצמאי"]),
                group("הלוואה", &["הלוואה", "אשראי", "בנק"]),
                group("עצמאי", &["עצמאי", "עצמאים", "עסק"]),
            ],
        }
    }

    fn record(id: &str, category: &str, audience: &str, organization: &str, details: &str) -> BenefitRecord {
        BenefitRecord {
            id: id.to_string(),
            target_audience_raw: audience.to_string(),
            category: category.to_string(),
            subcategory: String::new(),
            organization: organization.to_string(),
            details_link: String::new(),
            last_updated: String::new(),
            details: details.to_string(),
        }
    }

    #[test]
    fn test_keywords_follow_table_order() {
        let keywords = config().extract_keywords("  הלוואה לבעלי עסקים ");
        assert_eq!(keywords, vec!["עסק", "הלוואה", "עצמאי"]);
    }

    #[test]
    fn test_no_keywords_for_unrelated_text() {
        assert!(config().extract_keywords("טיסות").is_empty());
    }

    #[test]
    fn test_score_components() {
        let cfg = config();
        let r = record("1", "הלוואה", "עצמאים", "בנק", "");
        let keywords = vec!["הלוואה".to_string()];
        // direct 10, keyword 5, synonyms "הלוואה" + "בנק" 6, category 4
        assert_eq!(cfg.score(&r, &keywords, "הלוואה"), 25);
        assert_eq!(cfg.score(&r, &[], "טיסות"), 0);
    }

    #[test]
    fn test_suggest_ranks_and_limits() {
        let records = vec![
            record("1", "חינוך", "סטודנטים", "אוניברסיטה", "מלגה"),
            record("2", "בנקים", "עצמאים", "בנק", "הלוואה בתנאים מועדפים"),
            record("3", "הלוואה לעסקים", "עצמאי, בעלי עסקים", "קרן", "הלוואה"),
            record("4", "ביטוח", "כולם", "ביטוח לאומי", "עסק קטן"),
        ];
        let result = config().suggest(&records, "הלוואה");

        assert_eq!(result.keywords, vec!["הלוואה"]);
        assert_eq!(result.total_found, 2);
        let ids: Vec<_> = result.suggestions.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "2"]);
        assert!(result.explanation.contains("מצאתי 2 שירותים"));
    }

    #[test]
    fn test_explanation_variants() {
        assert!(explanation("x", &[], 0).contains("'x'"));
        assert!(explanation("x", &[], 1).contains("המילים שלכם"));
        assert!(explanation("x", &["עסק".to_string()], 3).contains("על עסק."));
    }
}
