use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Source '{source_name}' could not be read: {message}")]
    Transport {
        source_name: String,
        message: String,
    },

    #[error("Could not find header row (marker '{marker}') in source data")]
    MissingHeader { marker: String },

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl DirectoryError {
    /// Errors raised while reading or extracting the upstream table. These are
    /// the failures the record cache absorbs by serving its previous snapshot.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            DirectoryError::Http(_)
                | DirectoryError::Transport { .. }
                | DirectoryError::MissingHeader { .. }
                | DirectoryError::Io(_)
        )
    }

    /// Short label used for metric and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            DirectoryError::Http(_) => "http",
            DirectoryError::Transport { .. } => "transport",
            DirectoryError::MissingHeader { .. } => "missing_header",
            DirectoryError::Toml(_) => "toml",
            DirectoryError::Io(_) => "io",
            DirectoryError::Config(_) => "config",
            DirectoryError::NotFound(_) => "not_found",
            DirectoryError::InvalidQuery(_) => "invalid_query",
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;
