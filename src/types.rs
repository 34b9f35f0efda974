use serde::{Deserialize, Serialize};

/// A single cleaned row of raw tabular text, one cell per column
pub type RawRow = Vec<String>;

/// One normalized entry of the benefits directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitRecord {
    pub id: String,
    /// Comma-joined free text (column "למי זה")
    #[serde(rename = "targetAudience")]
    pub target_audience_raw: String,
    pub category: String,
    pub subcategory: String,
    pub organization: String,
    pub details_link: String,
    pub last_updated: String,
    pub details: String,
}

impl BenefitRecord {
    /// Audience phrases as shown to users: comma split, trimmed, blanks dropped.
    pub fn audience_list(&self) -> Vec<String> {
        self.target_audience_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Text of the given taxonomy field
    pub fn field(&self, field: TaxonomyField) -> &str {
        match field {
            TaxonomyField::Category => &self.category,
            TaxonomyField::TargetAudience => &self.target_audience_raw,
            TaxonomyField::Organization => &self.organization,
        }
    }
}

/// Presentation projection of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRecord {
    #[serde(flatten)]
    pub record: BenefitRecord,
    pub details_truncated: String,
    pub has_more_details: bool,
    pub target_audience_array: Vec<String>,
    pub target_audience_displayed: Vec<String>,
    pub has_more_audience: bool,
    pub additional_audience_count: usize,
}

/// Detail view of one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailedRecord {
    #[serde(flatten)]
    pub record: BenefitRecord,
    pub target_audience_array: Vec<String>,
}

impl From<BenefitRecord> for DetailedRecord {
    fn from(record: BenefitRecord) -> Self {
        let target_audience_array = record.audience_list();
        Self {
            record,
            target_audience_array,
        }
    }
}

/// Summary bucket produced by the taxonomy classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub count: usize,
}

impl Entry {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

/// Source column a taxonomy summary is computed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyField {
    Category,
    #[serde(alias = "audience")]
    TargetAudience,
    Organization,
}

impl TaxonomyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyField::Category => "category",
            TaxonomyField::TargetAudience => "target_audience",
            TaxonomyField::Organization => "organization",
        }
    }
}
