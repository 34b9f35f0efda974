use serde::{Deserialize, Serialize};

/// A canonical taxonomy bucket and the substrings that fold phrases into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasGroup {
    pub canonical_name: String,
    pub keywords: Vec<String>,
}

impl AliasGroup {
    pub fn new(canonical_name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// Case-sensitive substring match against already cleaned text
    pub fn matches(&self, text: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(k.as_str()))
    }

    /// Case-insensitive variant used by consumer filters
    pub fn matches_ignore_case(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .any(|k| !k.is_empty() && text.contains(&k.to_lowercase()))
    }
}

/// Ordered set of alias groups. Order decides output order for equal counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    groups: Vec<AliasGroup>,
}

impl AliasTable {
    pub fn new(groups: Vec<AliasGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[AliasGroup] {
        &self.groups
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn find(&self, canonical_name: &str) -> Option<&AliasGroup> {
        self.groups
            .iter()
            .find(|g| g.canonical_name == canonical_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_matches_any_keyword() {
        let g = AliasGroup::new("נפגעי רכוש", &["נפגע בית", "נפגע רכב"]);
        assert!(g.matches("נפגע רכב בצפון"));
        assert!(!g.matches("נפגעי גוף"));
    }

    #[test]
    fn test_empty_keyword_never_matches() {
        let g = AliasGroup::new("x", &[""]);
        assert!(!g.matches("anything"));
    }

    #[test]
    fn test_ignore_case_match() {
        let g = AliasGroup::new("Freelancers", &["Freelance"]);
        assert!(g.matches_ignore_case("FREELANCE designers"));
        assert!(!g.matches("FREELANCE designers"));
    }

    #[test]
    fn test_table_find_by_canonical_name() {
        let table = AliasTable::new(vec![AliasGroup::new("a", &["x"]), AliasGroup::new("b", &["y"])]);
        assert_eq!(table.find("b").map(|g| g.keywords.len()), Some(1));
        assert!(table.find("c").is_none());
        assert_eq!(table.len(), 2);
    }
}
