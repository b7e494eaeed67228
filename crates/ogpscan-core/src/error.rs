use thiserror::Error;

/// Application-wide error types.
///
/// This enum represents all possible errors that can occur while scanning a
/// catalogue and exporting inventories. It uses the `thiserror` crate for
/// ergonomic error handling and automatic conversion from underlying library
/// errors.
///
/// # Error Conversion
///
/// - `serde_json::Error` → `AppError::SerializationError`
///
/// # Examples
///
/// ```
/// use ogpscan_core::error::AppError;
///
/// fn example() -> Result<(), AppError> {
///     Err(AppError::Generic("Something went wrong".to_string()))
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// The catalogue API is unreachable after exhausting retries.
    ///
    /// This is fatal for the whole scan: without the registry there is
    /// nothing to inventory.
    #[error("Catalogue unreachable: {0}")]
    RemoteUnavailable(String),

    /// A dataset disappeared between listing and detail fetch.
    ///
    /// Recovered locally: the scan skips the dataset and continues with the
    /// remaining ids.
    #[error("Dataset gone from catalogue: {0}")]
    DatasetGone(String),

    /// The organization matched zero datasets and the scan is configured to
    /// treat that as an input error (`fail_on_empty_org`).
    #[error("No datasets found for organization: {0}")]
    OrgNotFound(String),

    /// The export sink could not write an inventory file.
    ///
    /// Fatal, but never corrupts a previously written file: exports go
    /// through a temporary file that is renamed into place.
    #[error("Export failed: {0}")]
    ExportFailure(String),

    /// HTTP client request failed.
    #[error("API Client error: {0}")]
    ClientError(String),

    /// Request timeout.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Please wait and try again.")]
    RateLimitExceeded,

    /// Invalid catalogue portal URL provided.
    #[error("Invalid registry URL: {0}")]
    InvalidPortalUrl(String),

    /// JSON serialization or deserialization failed.
    ///
    /// Typically occurs when parsing a catalogue API response.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Generic application error for cases not covered by specific variants.
    ///
    /// Use this sparingly - prefer creating specific error variants
    /// for better error handling and debugging.
    #[error("Error: {0}")]
    Generic(String),
}

impl AppError {
    /// Returns a user-friendly error message suitable for CLI output.
    pub fn user_message(&self) -> String {
        match self {
            AppError::RemoteUnavailable(msg) => {
                format!(
                    "Cannot reach the catalogue: {}\n   Check your internet connection and the registry URL.",
                    msg
                )
            }
            AppError::OrgNotFound(org) => {
                format!(
                    "No datasets found for '{}'.\n   Check the department name, or drop --fail-on-empty-org to accept an empty inventory.",
                    org
                )
            }
            AppError::ExportFailure(msg) => {
                format!(
                    "Could not write inventory file: {}\n   Check that the output directory is writable.",
                    msg
                )
            }
            AppError::ClientError(msg) => {
                if msg.contains("timeout") || msg.contains("timed out") {
                    "Request timed out. The catalogue may be slow or unreachable.\n   Try again later or check the registry URL.".to_string()
                } else {
                    format!("API error: {}", msg)
                }
            }
            AppError::Timeout(secs) => {
                format!(
                    "Request timed out after {} seconds.\n   The server may be overloaded. Try again later.",
                    secs
                )
            }
            AppError::RateLimitExceeded => {
                "Too many requests. Please wait a moment and try again.".to_string()
            }
            AppError::InvalidPortalUrl(url) => {
                format!(
                    "Invalid registry URL: {}\n   Example: https://open.canada.ca/data/en",
                    url
                )
            }
            AppError::ConfigError(msg) => {
                format!(
                    "Configuration error: {}\n   Check your configuration file.",
                    msg
                )
            }
            _ => self.to_string(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// # Examples
    ///
    /// ```
    /// use ogpscan_core::error::AppError;
    ///
    /// // Rate limits are retryable (after a delay)
    /// assert!(AppError::RateLimitExceeded.is_retryable());
    ///
    /// // A vanished dataset is NOT retryable
    /// assert!(!AppError::DatasetGone("d1".to_string()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Timeout(_) | AppError::RateLimitExceeded | AppError::ClientError(_)
        )
    }

    /// Returns true if this error aborts the whole scan.
    ///
    /// Per-record failures (`DatasetGone`, per-id client errors) are isolated
    /// by the inventory loop and never reach the caller; everything that does
    /// reach the caller except `DatasetGone` is fatal.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AppError::DatasetGone(_))
    }
}
