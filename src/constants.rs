/// Defaults shared across the ingestion engine, the cache and the API surface.

// Upstream spreadsheet (CSV export of the first sheet)
pub const DEFAULT_SOURCE_URL: &str =
    "https://docs.google.com/spreadsheets/d/1-OhoadrXgz-FJZAgB_43Vdm8TXwgzaEL5pZi40pY0-w/export?format=csv&gid=0";
pub const DEFAULT_USER_AGENT: &str = "benefits-directory/0.1";
pub const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 30;

// Extraction contract with the spreadsheet layout
pub const HEADER_MARKER: &str = "Post ID";
pub const MIN_COLUMNS: usize = 8;

// Cache
pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

// Display projections
pub const DETAILS_PREVIEW_CHARS: usize = 200;
pub const DETAILS_ELLIPSIS: &str = "...";
pub const AUDIENCE_PREVIEW_COUNT: usize = 3;

// Taxonomy defaults
pub const AUDIENCE_MIN_FREQUENCY: usize = 3;
pub const AUDIENCE_MAX_SPECIFIC: usize = 15;
pub const ORGANIZATION_MIN_FREQUENCY: usize = 2;
pub const ORGANIZATION_MAX_SPECIFIC: usize = 15;

// Suggestions
pub const SUGGEST_MAX_RESULTS: usize = 5;

// Server
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const SERVICE_NAME: &str = "benefits-directory";

// Environment overrides
pub const ENV_CONFIG_PATH: &str = "BENEFITS_CONFIG";
pub const ENV_SOURCE_URL: &str = "BENEFITS_SOURCE_URL";
pub const ENV_SOURCE_FILE: &str = "BENEFITS_SOURCE_FILE";
pub const ENV_CACHE_TTL_SECS: &str = "BENEFITS_CACHE_TTL_SECS";
pub const ENV_PORT: &str = "BENEFITS_PORT";
