use crate::taxonomy::AliasTable;
use crate::types::BenefitRecord;
use serde::{Deserialize, Serialize};

/// Query filters accepted by the search operation. Blank values are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub audience: Option<String>,
}

impl SearchFilters {
    fn text(value: &Option<String>) -> Option<&str> {
        value.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn query(&self) -> Option<&str> {
        Self::text(&self.q)
    }

    pub fn category(&self) -> Option<&str> {
        Self::text(&self.category)
    }

    pub fn audience(&self) -> Option<&str> {
        Self::text(&self.audience)
    }
}

/// Alias tables used to expand canonical names in filters
pub struct FilterContext<'a> {
    pub category_aliases: &'a AliasTable,
    pub audience_aliases: &'a AliasTable,
}

impl FilterContext<'_> {
    pub fn matches(&self, record: &BenefitRecord, filters: &SearchFilters) -> bool {
        filters.query().map_or(true, |q| matches_query(record, q))
            && filters
                .category()
                .map_or(true, |c| matches_category(record, c, self.category_aliases))
            && filters
                .audience()
                .map_or(true, |a| matches_audience(record, a, self.audience_aliases))
    }
}

/// Case-insensitive substring over organization, details, category and audience
pub fn matches_query(record: &BenefitRecord, query: &str) -> bool {
    let haystack = format!(
        "{} {} {} {}",
        record.organization, record.details, record.category, record.target_audience_raw
    )
    .to_lowercase();
    haystack.contains(&query.to_lowercase())
}

/// Exact category match, or keyword match when `category` names an alias group
pub fn matches_category(record: &BenefitRecord, category: &str, aliases: &AliasTable) -> bool {
    match aliases.find(category) {
        Some(group) => record.category == category || group.matches(&record.category),
        None => record.category == category,
    }
}

/// Keyword match when `audience` names an alias group, else substring match
pub fn matches_audience(record: &BenefitRecord, audience: &str, aliases: &AliasTable) -> bool {
    match aliases.find(audience) {
        Some(group) => group.matches_ignore_case(&record.target_audience_raw),
        None => record
            .target_audience_raw
            .to_lowercase()
            .contains(&audience.to_lowercase()),
    }
}
