use crate::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SOURCE_TIMEOUT_SECS, DEFAULT_SOURCE_URL,
    DEFAULT_USER_AGENT,
    ENV_CACHE_TTL_SECS, ENV_CONFIG_PATH, ENV_PORT, ENV_SOURCE_FILE, ENV_SOURCE_URL,
};
use crate::error::{DirectoryError, Result};
use crate::suggest::SuggestConfig;
use crate::taxonomy::{Taxonomy, TaxonomyProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Configuration shipped with the crate, used when no file is given
const BUILTIN_CONFIG: &str = include_str!("../config/directory.toml");

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub server: ServerConfig,
    pub taxonomy: Taxonomy,
    pub suggest: SuggestConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    /// Local CSV export; takes precedence over `url` when set
    pub file: Option<PathBuf>,
    pub user_agent: String,
    /// Upper bound for one upstream request
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            file: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_SOURCE_TIMEOUT_SECS,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
        }
    }
}

impl Config {
    /// Load from `path`, else from `BENEFITS_CONFIG`, else the built-in file,
    /// then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(ENV_CONFIG_PATH).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(env_path) {
            Some(p) => Self::from_file(&p)?,
            None => Self::builtin()?,
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            DirectoryError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parse a config file. Missing `[taxonomy.*]` and `[suggest]` sections
    /// are taken whole from the built-in file.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut table: toml::Table = toml::from_str(content)?;
        inherit_builtin_sections(&mut table)?;
        Ok(toml::Value::Table(table).try_into()?)
    }

    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(url) = std::env::var(ENV_SOURCE_URL) {
            self.source.url = url;
        }
        if let Ok(file) = std::env::var(ENV_SOURCE_FILE) {
            self.source.file = Some(PathBuf::from(file));
        }
        if let Ok(ttl) = std::env::var(ENV_CACHE_TTL_SECS) {
            self.cache.ttl_secs = ttl.parse().map_err(|_| {
                DirectoryError::Config(format!("{} must be a number of seconds, got '{}'", ENV_CACHE_TTL_SECS, ttl))
            })?;
        }
        if let Ok(port) = std::env::var(ENV_PORT) {
            self.server.port = port
                .parse()
                .map_err(|_| DirectoryError::Config(format!("{} must be a port number, got '{}'", ENV_PORT, port)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.file.is_none() && self.source.url.trim().is_empty() {
            return Err(DirectoryError::Config("source needs either a url or a file".to_string()));
        }
        if self.source.timeout_secs == 0 {
            return Err(DirectoryError::Config("source.timeout_secs must be at least 1".to_string()));
        }
        if self.suggest.max_results == 0 {
            return Err(DirectoryError::Config("suggest.max_results must be at least 1".to_string()));
        }
        if let Some(group) = self.suggest.synonyms.iter().find(|g| g.keyword.trim().is_empty()) {
            return Err(DirectoryError::Config(format!(
                "suggest synonym group {:?} has no keyword",
                group.synonyms
            )));
        }
        for (name, profile) in [
            ("audience", &self.taxonomy.audience),
            ("category", &self.taxonomy.category),
            ("organization", &self.taxonomy.organization),
        ] {
            validate_profile(name, profile)?;
        }
        Ok(())
    }
}

fn inherit_builtin_sections(table: &mut toml::Table) -> Result<()> {
    let builtin: toml::Table = toml::from_str(BUILTIN_CONFIG)?;

    if let Some(toml::Value::Table(profiles)) = builtin.get("taxonomy") {
        let taxonomy = table
            .entry("taxonomy")
            .or_insert(toml::Value::Table(toml::Table::new()));
        if let toml::Value::Table(taxonomy) = taxonomy {
            for (name, profile) in profiles {
                taxonomy.entry(name.as_str()).or_insert(profile.clone());
            }
        }
    }
    if let Some(suggest) = builtin.get("suggest") {
        table.entry("suggest").or_insert(suggest.clone());
    }
    Ok(())
}

fn validate_profile(name: &str, profile: &TaxonomyProfile) -> Result<()> {
    if profile.min_frequency == 0 {
        return Err(DirectoryError::Config(format!(
            "taxonomy.{}.min_frequency must be at least 1",
            name
        )));
    }
    for group in profile.aliases.groups() {
        if group.canonical_name.trim().is_empty() {
            return Err(DirectoryError::Config(format!(
                "taxonomy.{} has an alias group without a canonical_name",
                name
            )));
        }
        if group.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(DirectoryError::Config(format!(
                "alias group '{}' in taxonomy.{} has no keywords",
                group.canonical_name, name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_has_seven_audience_groups() {
        let config = Config::builtin().unwrap();
        config.validate().unwrap();
        let audience = &config.taxonomy.audience;
        assert_eq!(audience.aliases.len(), 7);
        assert_eq!(audience.min_frequency, 3);
        assert_eq!(audience.max_specific, Some(15));
        assert!(audience.excluded.contains(&"כולם".to_string()));
        assert!(audience.aliases.find("משרתי מילואים").is_some());
        assert!(config.taxonomy.category.aliases.is_empty());
        assert_eq!(config.taxonomy.organization.min_frequency, 2);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.source.url, DEFAULT_SOURCE_URL);
        assert_eq!(config.source.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = Config::from_toml_str("[source]\ntimeout_secs = 0\n").unwrap();
        assert!(matches!(config.validate(), Err(DirectoryError::Config(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str("[cache]\nttl_secs = 60\n").unwrap();
        let builtin = Config::builtin().unwrap();
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.taxonomy, builtin.taxonomy);
        assert_eq!(config.suggest, builtin.suggest);
    }

    #[test]
    fn test_missing_taxonomy_sections_inherit_builtin_tables() {
        let toml = r#"
[taxonomy.organization]
min_frequency = 5
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.taxonomy.audience.aliases.len(), 7);
        assert!(config.taxonomy.audience.excluded.contains(&"כולם".to_string()));
        // a present section replaces the built-in one
        assert_eq!(config.taxonomy.organization.min_frequency, 5);
        assert_eq!(config.taxonomy.organization.max_specific, None);
    }

    #[test]
    fn test_builtin_suggest_table() {
        let suggest = Config::builtin().unwrap().suggest;
        assert_eq!(suggest.max_results, 5);
        assert_eq!(suggest.synonyms.len(), 25);
        assert_eq!(suggest.synonyms[0].keyword, "ילדים");
        assert!(suggest.extract_keywords("מענק למילואים").contains(&"מילואים".to_string()));
    }

    #[test]
    fn test_custom_alias_table() {
        let toml = r#"
[source]
file = "benefits.csv"

[taxonomy.audience]
min_frequency = 2

[[taxonomy.audience.aliases]]
canonical_name = "Students"
keywords = ["student", "undergrad"]
"#;
        let config = Config::from_toml_str(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.source.file, Some(PathBuf::from("benefits.csv")));
        let group = config.taxonomy.audience.aliases.find("Students").unwrap();
        assert_eq!(group.keywords, vec!["student", "undergrad"]);
    }

    #[test]
    fn test_alias_group_without_keywords_is_rejected() {
        let toml = r#"
[[taxonomy.category.aliases]]
canonical_name = "Empty"
keywords = []
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert!(matches!(config.validate(), Err(DirectoryError::Config(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(matches!(
            Config::from_toml_str("[cache\nttl_secs = 1"),
            Err(DirectoryError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, DirectoryError::Config(_)));
    }
}
