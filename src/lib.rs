pub mod cache;
pub mod config;
pub mod constants;
pub mod display;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod search;
pub mod server;
pub mod suggest;
pub mod taxonomy;
pub mod types;

// Application and infrastructure layers
pub mod app;
pub mod infra;

pub use app::DirectoryService;
pub use cache::RecordCache;
pub use config::Config;
pub use display::enhance;
pub use error::{DirectoryError, Result};
pub use pipeline::{extract, ingest, tokenize};
pub use suggest::{SuggestConfig, Suggestion};
pub use taxonomy::{classify, AliasGroup, AliasTable, Taxonomy, TaxonomyProfile};
pub use types::{BenefitRecord, DisplayRecord, Entry, TaxonomyField};
