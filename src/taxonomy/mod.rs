//! Taxonomy consolidation: folds free-text category and audience values into
//! a small set of ranked, user-facing buckets.

pub mod alias;
pub mod classifier;

pub use alias::{AliasGroup, AliasTable};
pub use classifier::{classify, phrases, TaxonomyProfile};

use crate::constants::{
    AUDIENCE_MAX_SPECIFIC, AUDIENCE_MIN_FREQUENCY, ORGANIZATION_MAX_SPECIFIC,
    ORGANIZATION_MIN_FREQUENCY,
};
use crate::types::{BenefitRecord, Entry, TaxonomyField};
use serde::{Deserialize, Serialize};

/// One profile per summarized field, loaded once from configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
    pub audience: TaxonomyProfile,
    pub category: TaxonomyProfile,
    pub organization: TaxonomyProfile,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            audience: TaxonomyProfile {
                min_frequency: AUDIENCE_MIN_FREQUENCY,
                max_specific: Some(AUDIENCE_MAX_SPECIFIC),
                ..TaxonomyProfile::default()
            },
            category: TaxonomyProfile::default(),
            organization: TaxonomyProfile {
                min_frequency: ORGANIZATION_MIN_FREQUENCY,
                max_specific: Some(ORGANIZATION_MAX_SPECIFIC),
                ..TaxonomyProfile::default()
            },
        }
    }
}

impl Taxonomy {
    pub fn profile(&self, field: TaxonomyField) -> &TaxonomyProfile {
        match field {
            TaxonomyField::TargetAudience => &self.audience,
            TaxonomyField::Category => &self.category,
            TaxonomyField::Organization => &self.organization,
        }
    }

    pub fn classify(&self, records: &[BenefitRecord], field: TaxonomyField) -> Vec<Entry> {
        classify(records, self.profile(field), field)
    }

    pub fn classify_categories(&self, records: &[BenefitRecord]) -> Vec<Entry> {
        self.classify(records, TaxonomyField::Category)
    }

    pub fn classify_audiences(&self, records: &[BenefitRecord]) -> Vec<Entry> {
        self.classify(records, TaxonomyField::TargetAudience)
    }

    pub fn classify_organizations(&self, records: &[BenefitRecord]) -> Vec<Entry> {
        self.classify(records, TaxonomyField::Organization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(name: &str) -> BenefitRecord {
        BenefitRecord {
            id: "1".to_string(),
            target_audience_raw: String::new(),
            category: String::new(),
            subcategory: String::new(),
            organization: name.to_string(),
            details_link: String::new(),
            last_updated: String::new(),
            details: String::new(),
        }
    }

    #[test]
    fn test_organizations_need_two_benefits() {
        let records = vec![org("ביטוח לאומי"), org("ביטוח לאומי"), org("רשות המסים")];
        let entries = Taxonomy::default().classify_organizations(&records);
        assert_eq!(entries, vec![Entry::new("ביטוח לאומי", 2)]);
    }

    #[test]
    fn test_default_profiles() {
        let t = Taxonomy::default();
        assert_eq!(t.audience.min_frequency, 3);
        assert_eq!(t.audience.max_specific, Some(15));
        assert_eq!(t.category.min_frequency, 1);
        assert!(t.category.aliases.is_empty());
    }
}
