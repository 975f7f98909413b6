use thiserror::Error as ThisError;

/// Different errors that building a signed request can raise
#[derive(Debug, ThisError)]
pub enum RequestError {
    /// Error returned when the locale code is not one of the supported regions
    #[error("invalid locale {0:?}")]
    InvalidLocale(String),
    /// Error returned when a URL is built before the associate tag is set
    #[error("missing associate tag")]
    MissingTag,
    /// Error returned when a credential source cannot supply a required value
    #[error("missing credential {0}")]
    MissingCredentials(String),
    /// Error returned if a credentials document cannot be parsed
    #[error("invalid credentials document")]
    InvalidCredentials(#[from] serde_json::Error),
    /// Error returned when the signature cannot be computed
    #[error("failed to sign request: {0}")]
    SigningFailure(String),
}
