use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Upstream tabular data (network export or local file)
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Read the whole table as text
    async fn fetch(&self) -> Result<String>;

    /// Human readable location, used in logs and errors
    fn describe(&self) -> String;
}

/// Wall clock, injected so cache expiry can be driven by tests
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
