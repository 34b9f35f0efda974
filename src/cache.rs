//! Time-boxed record cache with stale-on-error fallback.
//!
//! A snapshot younger than the TTL is served as is. Otherwise one caller
//! refreshes from the source while concurrent callers wait for its outcome.
//! When a refresh fails the previous snapshot, however old, keeps being
//! served; only a cache that never loaded surfaces the error.

use crate::app::ports::{Clock, RecordSource};
use crate::error::{DirectoryError, Result};
use crate::metrics::{CacheMetrics, SourcesMetrics};
use crate::pipeline;
use crate::types::BenefitRecord;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Records from one successful fetch cycle and when they were taken
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub records: Arc<Vec<BenefitRecord>>,
    pub fetched_at: DateTime<Utc>,
}

/// Outcome of the latest refresh attempt, guarded by the refresh lock
#[derive(Debug, Default)]
struct RefreshState {
    last_error: Option<String>,
}

pub struct RecordCache {
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    snapshot: RwLock<Option<Snapshot>>,
    refresh: Mutex<RefreshState>,
    /// Bumped after every finished refresh attempt
    attempts: AtomicU64,
}

impl RecordCache {
    pub fn new(source: Arc<dyn RecordSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        Self {
            source,
            clock,
            ttl,
            snapshot: RwLock::new(None),
            refresh: Mutex::new(RefreshState::default()),
            attempts: AtomicU64::new(0),
        }
    }

    /// Current records, refreshing from the source when the snapshot expired.
    pub async fn get_records(&self) -> Result<Arc<Vec<BenefitRecord>>> {
        if let Some(records) = self.fresh_records().await {
            CacheMetrics::record_hit();
            return Ok(records);
        }

        let seen = self.attempts.load(Ordering::Acquire);
        let mut state = self.refresh.lock().await;
        // another caller may have refreshed while we waited
        if let Some(records) = self.fresh_records().await {
            CacheMetrics::record_hit();
            return Ok(records);
        }
        if self.attempts.load(Ordering::Acquire) != seen {
            // the attempt we waited on failed; share its outcome
            return match self.snapshot().await {
                Some(stale) => {
                    CacheMetrics::record_stale_served();
                    Ok(stale.records)
                }
                None => Err(DirectoryError::Transport {
                    source_name: self.source.describe(),
                    message: state
                        .last_error
                        .clone()
                        .unwrap_or_else(|| "refresh failed".to_string()),
                }),
            };
        }
        CacheMetrics::record_miss();

        let outcome = self.load().await;
        self.attempts.fetch_add(1, Ordering::Release);
        state.last_error = outcome.as_ref().err().map(|e| e.to_string());

        match outcome {
            Ok(records) => {
                let records = Arc::new(records);
                let fetched_at = self.clock.now();
                *self.snapshot.write().await = Some(Snapshot {
                    records: records.clone(),
                    fetched_at,
                });
                CacheMetrics::set_records(records.len());
                info!(records = records.len(), source = %self.source.describe(), "refreshed records");
                Ok(records)
            }
            Err(e) if e.is_fetch_failure() => match self.snapshot().await {
                Some(stale) => {
                    CacheMetrics::record_stale_served();
                    warn!(
                        error = %e,
                        fetched_at = %stale.fetched_at,
                        "refresh failed, serving previous snapshot"
                    );
                    Ok(stale.records)
                }
                None => Err(e),
            },
            Err(e) => Err(e),
        }
    }

    /// Last successful snapshot regardless of age
    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.read().await.clone()
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    async fn fresh_records(&self) -> Option<Arc<Vec<BenefitRecord>>> {
        let guard = self.snapshot.read().await;
        let snapshot = guard.as_ref()?;
        let age = self.clock.now() - snapshot.fetched_at;
        if age < self.ttl {
            debug!(age_secs = age.num_seconds(), "cache hit");
            Some(snapshot.records.clone())
        } else {
            None
        }
    }

    async fn load(&self) -> Result<Vec<BenefitRecord>> {
        let started = Instant::now();
        let text = match self.source.fetch().await {
            Ok(text) => text,
            Err(e) => {
                SourcesMetrics::record_fetch_error(e.kind());
                return Err(e);
            }
        };
        SourcesMetrics::record_fetch_success(started.elapsed().as_secs_f64(), text.len());

        pipeline::ingest(&text).map_err(|e| {
            SourcesMetrics::record_fetch_error(e.kind());
            e
        })
    }
}
