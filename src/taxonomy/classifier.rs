use crate::pipeline::clean_text;
use crate::taxonomy::alias::AliasTable;
use crate::types::{BenefitRecord, Entry, TaxonomyField};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Tuning for one taxonomy summary (aliases, generic phrases, frequency cut-offs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxonomyProfile {
    pub aliases: AliasTable,
    /// Phrases containing any of these substrings never become specific entries
    pub excluded: Vec<String>,
    pub min_frequency: usize,
    /// Keep at most this many specific entries; `None` keeps all
    pub max_specific: Option<usize>,
}

impl Default for TaxonomyProfile {
    fn default() -> Self {
        Self {
            aliases: AliasTable::default(),
            excluded: Vec::new(),
            min_frequency: 1,
            max_specific: None,
        }
    }
}

/// Phrase frequencies in first-seen order
#[derive(Debug, Default)]
struct FrequencyTable {
    index: HashMap<String, usize>,
    entries: Vec<Entry>,
}

impl FrequencyTable {
    fn add(&mut self, phrase: String) {
        match self.index.get(&phrase) {
            Some(&i) => self.entries[i].count += 1,
            None => {
                self.index.insert(phrase.clone(), self.entries.len());
                self.entries.push(Entry::new(phrase, 1));
            }
        }
    }
}

/// Phrases a record contributes for `field`, each at most once.
pub fn phrases(record: &BenefitRecord, field: TaxonomyField) -> Vec<String> {
    let raw = record.field(field);
    let mut seen = HashSet::new();
    let candidates: Vec<String> = match field {
        TaxonomyField::TargetAudience => raw.split(',').map(clean_text).collect(),
        TaxonomyField::Category | TaxonomyField::Organization => vec![raw.trim().to_string()],
    };
    candidates
        .into_iter()
        .filter(|p| !p.is_empty())
        .filter(|p| seen.insert(p.clone()))
        .collect()
}

/// Summarize `field` across `records` into ranked entries.
///
/// Alias groups are counted first as the sum of phrase frequencies matching
/// any of their keywords; a phrase may feed several groups. Frequent phrases
/// that no present group already covers follow. The combined list is stably
/// sorted by descending count, so ties keep groups ahead of phrases.
pub fn classify(records: &[BenefitRecord], profile: &TaxonomyProfile, field: TaxonomyField) -> Vec<Entry> {
    let mut table = FrequencyTable::default();
    for record in records {
        for phrase in phrases(record, field) {
            table.add(phrase);
        }
    }

    let consolidated: Vec<(Entry, usize)> = profile
        .aliases
        .groups()
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let count = table
                .entries
                .iter()
                .filter(|e| group.matches(&e.name))
                .map(|e| e.count)
                .sum();
            (Entry::new(group.canonical_name.clone(), count), i)
        })
        .filter(|(e, _)| e.count > 0)
        .collect();

    let mut specific: Vec<Entry> = table
        .entries
        .into_iter()
        .filter(|e| e.count >= profile.min_frequency)
        .filter(|e| !profile.excluded.iter().any(|x| e.name.contains(x.as_str())))
        .collect();
    specific.sort_by(|a, b| b.count.cmp(&a.count));
    if let Some(max) = profile.max_specific {
        specific.truncate(max);
    }

    let groups = profile.aliases.groups();
    let specific: Vec<Entry> = specific
        .into_iter()
        .filter(|e| !consolidated.iter().any(|(_, i)| groups[*i].matches(&e.name)))
        .collect();

    let mut combined: Vec<Entry> = consolidated.into_iter().map(|(e, _)| e).collect();
    let consolidated_len = combined.len();
    combined.extend(specific);
    debug!(
        field = field.as_str(),
        consolidated = consolidated_len,
        specific = combined.len() - consolidated_len,
        "classified taxonomy"
    );

    combined.sort_by(|a, b| b.count.cmp(&a.count));
    combined
}
