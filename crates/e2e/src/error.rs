//! Error types for the E2E suite

use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Assertion failed: {0}")]
    AssertionFailed(String),

    #[error("Timeout waiting for: {0}")]
    Timeout(String),

    #[error("Unrecognized input: {0}")]
    UnrecognizedInput(String),

    #[error("chromedriver failed to start: {0}")]
    DriverStartup(String),

    #[error("chromedriver health check failed after {0} attempts")]
    DriverHealthCheck(usize),

    #[error("API response missing or not yet fetched: {0}")]
    NoApiData(String),

    #[error("WebDriver error: {0}")]
    WebDriver(#[from] thirtyfour::error::WebDriverError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;

impl E2eError {
    /// Shorthand for a failed expectation with context about what was violated.
    pub fn assertion(msg: impl Into<String>) -> Self {
        E2eError::AssertionFailed(msg.into())
    }
}
