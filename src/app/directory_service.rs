use crate::app::ports::{Clock, RecordSource};
use crate::cache::RecordCache;
use crate::config::Config;
use crate::constants::SERVICE_NAME;
use crate::display::enhance_all;
use crate::error::{DirectoryError, Result};
use crate::infra::{FileSource, HttpSource, SystemClock};
use crate::search::{FilterContext, SearchFilters};
use crate::suggest::{SuggestConfig, Suggestion};
use crate::taxonomy::Taxonomy;
use crate::types::{BenefitRecord, DetailedRecord, DisplayRecord, Entry, TaxonomyField};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Every read operation the API and CLI need, backed by one record cache
pub struct DirectoryService {
    cache: RecordCache,
    taxonomy: Taxonomy,
    suggest: SuggestConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub cached_records: Option<usize>,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

impl DirectoryService {
    pub fn new(cache: RecordCache, taxonomy: Taxonomy, suggest: SuggestConfig) -> Self {
        Self {
            cache,
            taxonomy,
            suggest,
        }
    }

    /// Wire the configured source, the system clock and the cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source: Arc<dyn RecordSource> = match &config.source.file {
            Some(path) => Arc::new(FileSource::new(path.clone())),
            None => Arc::new(HttpSource::new(
                config.source.url.clone(),
                config.source.user_agent.clone(),
                config.source.timeout(),
            )?),
        };
        Ok(Self::with_source(source, Arc::new(SystemClock), config))
    }

    pub fn with_source(source: Arc<dyn RecordSource>, clock: Arc<dyn Clock>, config: &Config) -> Self {
        let cache = RecordCache::new(source, clock, config.cache.ttl());
        Self::new(cache, config.taxonomy.clone(), config.suggest.clone())
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    pub async fn get_records(&self) -> Result<Arc<Vec<BenefitRecord>>> {
        self.cache.get_records().await
    }

    pub async fn enhanced(&self) -> Result<Vec<DisplayRecord>> {
        let records = self.get_records().await?;
        Ok(enhance_all(&records))
    }

    /// First record with `id`
    pub async fn find_by_id(&self, id: &str) -> Result<DetailedRecord> {
        let records = self.get_records().await?;
        records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .map(DetailedRecord::from)
            .ok_or_else(|| DirectoryError::NotFound(format!("benefit '{}'", id)))
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<Vec<DisplayRecord>> {
        let records = self.get_records().await?;
        let ctx = FilterContext {
            category_aliases: &self.taxonomy.category.aliases,
            audience_aliases: &self.taxonomy.audience.aliases,
        };
        let matched: Vec<BenefitRecord> = records
            .iter()
            .filter(|r| ctx.matches(r, filters))
            .cloned()
            .collect();
        debug!(total = records.len(), matched = matched.len(), "search");
        Ok(enhance_all(&matched))
    }

    /// Records most relevant to a free-form question
    pub async fn suggest(&self, query: &str) -> Result<Suggestion> {
        if query.trim().is_empty() {
            return Err(DirectoryError::InvalidQuery("query is required".to_string()));
        }
        let records = self.get_records().await?;
        let suggestion = self.suggest.suggest(&records, query);
        debug!(
            keywords = suggestion.keywords.len(),
            found = suggestion.total_found,
            "suggest"
        );
        Ok(suggestion)
    }

    pub async fn classify(&self, field: TaxonomyField) -> Result<Vec<Entry>> {
        let records = self.get_records().await?;
        Ok(self.taxonomy.classify(&records, field))
    }

    pub async fn categories(&self) -> Result<Vec<Entry>> {
        self.classify(TaxonomyField::Category).await
    }

    pub async fn audiences(&self) -> Result<Vec<Entry>> {
        self.classify(TaxonomyField::TargetAudience).await
    }

    pub async fn organizations(&self) -> Result<Vec<Entry>> {
        self.classify(TaxonomyField::Organization).await
    }

    /// Liveness plus what the cache currently holds. Never triggers a fetch.
    pub async fn health(&self) -> HealthReport {
        let snapshot = self.cache.snapshot().await;
        HealthReport {
            status: "healthy",
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
            cached_records: snapshot.as_ref().map(|s| s.records.len()),
            last_fetched_at: snapshot.map(|s| s.fetched_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::tests::{FakeClock, ScriptedSource};

    const SHEET: &str = "Post ID,למי זה,קטגוריה,תת קטגוריה,ארגון,לינק,עודכן,פרטים
1,\"מילואים, נפגע רכב\",זכויות והטבות לעצמאים,,ביטוח לאומי,,,מענק
2,משרתי מילואים,בנקים,,בנק,,,הלוואה
3,כולם,בנקים,,ביטוח לאומי,,,פטור
";

    fn service() -> DirectoryService {
        let source = Arc::new(ScriptedSource::new(vec![Ok(SHEET.to_string())]));
        DirectoryService::with_source(source, Arc::new(FakeClock::new()), &Config::builtin().unwrap())
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let svc = service();
        let detail = svc.find_by_id("2").await.unwrap();
        assert_eq!(detail.record.organization, "בנק");
        assert_eq!(detail.target_audience_array, vec!["משרתי מילואים"]);
        assert!(matches!(svc.find_by_id("9").await, Err(DirectoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_by_canonical_audience() {
        let svc = service();
        let filters = SearchFilters {
            audience: Some("נפגעי רכוש".to_string()),
            ..Default::default()
        };
        let found = svc.search(&filters).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].record.id, "1");
    }

    #[tokio::test]
    async fn test_summaries() {
        let svc = service();
        assert_eq!(
            svc.categories().await.unwrap(),
            vec![Entry::new("בנקים", 2), Entry::new("זכויות והטבות לעצמאים", 1)]
        );
        assert_eq!(
            svc.organizations().await.unwrap(),
            vec![Entry::new("ביטוח לאומי", 2)]
        );
        let audiences = svc.audiences().await.unwrap();
        assert_eq!(audiences[0], Entry::new("משרתי מילואים", 2));
        assert!(audiences.contains(&Entry::new("נפגעי רכוש", 1)));
    }

    #[tokio::test]
    async fn test_suggest_uses_configured_synonyms() {
        let svc = service();
        let result = svc.suggest("מענק למילואים").await.unwrap();
        assert!(result.keywords.contains(&"מילואים".to_string()));
        assert_eq!(result.suggestions[0].id, "1");
        assert!(result.total_found >= 2);
    }

    #[tokio::test]
    async fn test_blank_suggest_query_is_rejected_without_fetch() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(SHEET.to_string())]));
        let svc = DirectoryService::with_source(source.clone(), Arc::new(FakeClock::new()), &Config::builtin().unwrap());
        assert!(matches!(svc.suggest("   ").await, Err(DirectoryError::InvalidQuery(_))));
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn test_health_does_not_fetch() {
        let svc = service();
        let before = svc.health().await;
        assert_eq!(before.cached_records, None);
        svc.get_records().await.unwrap();
        assert_eq!(svc.health().await.cached_records, Some(3));
    }
}
