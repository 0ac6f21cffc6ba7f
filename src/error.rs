//! Custom error types for the changelog generator.

use thiserror::Error;

/// Main error type for changelog generation.
#[derive(Error, Debug)]
pub enum ChangelogError {
    // Cli args errors
    #[error("Invalid arguments: {0}")]
    InvalidArgs(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Interval errors
    #[error("Can't find tag {0} -> exit")]
    TagNotFound(String),

    #[error("Can't find tag -> terminate")]
    MissingNewerTag,

    #[error("No {field} timestamp available for #{number}")]
    UnresolvedTimestamp { number: u64, field: &'static str },

    #[error("Failed to resolve close date for issue #{number}: {reason}")]
    EventResolutionFailure { number: u64, reason: String },

    // Forge errors
    #[error("Forge operation failed: {0}")]
    ForgeError(String),

    #[error("API rate limit exceeded")]
    RateLimitExceeded,

    // Parsing errors
    #[error("Git URL parse error: {0}")]
    GitUrlError(#[from] git_url_parse::GitUrlParseError),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] log::SetLoggerError),

    // Generic wrapper for other errors
    #[error(transparent)]
    Other(#[from] color_eyre::Report),
}

/// Result type alias using ChangelogError
pub type Result<T> = std::result::Result<T, ChangelogError>;

impl ChangelogError {
    /// Create a forge error with context
    pub fn forge(msg: impl Into<String>) -> Self {
        Self::ForgeError(msg.into())
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a tag not found error
    pub fn tag_not_found(tag: impl Into<String>) -> Self {
        Self::TagNotFound(tag.into())
    }

    /// Create an isolated close date resolution failure for an issue
    pub fn event_resolution(number: u64, reason: impl ToString) -> Self {
        Self::EventResolutionFailure {
            number,
            reason: reason.to_string(),
        }
    }
}

// Implement From for std::io::Error - wraps in Other variant for generic I/O errors
impl From<std::io::Error> for ChangelogError {
    fn from(err: std::io::Error) -> Self {
        Self::Other(color_eyre::Report::from(err))
    }
}

// Implement From for octocrab errors (GitHub API)
impl From<octocrab::Error> for ChangelogError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. }
                if source.message.contains("rate limit") =>
            {
                Self::RateLimitExceeded
            }
            _ => Self::ForgeError(format!("GitHub API error: {}", err)),
        }
    }
}
