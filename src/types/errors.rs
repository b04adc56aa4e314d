use thiserror::Error;

// === StoreError ===

/// Errors raised by the persisted key/value store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying database operation failed.
    #[error("Store database error: {0}")]
    DatabaseError(String),
    /// The stored value could not be encoded or decoded.
    #[error("Store serialization error: {0}")]
    SerializationError(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

// === ProfileError ===

/// Errors related to profile registry operations.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile name is reserved or empty.
    #[error("Invalid profile name: {0}")]
    InvalidName(String),
    /// Reading or writing the profile document failed.
    #[error("Profile storage error: {0}")]
    StorageError(String),
    /// The persisted profile document is not valid JSON.
    #[error("Profile serialization error: {0}")]
    SerializationError(String),
}

impl From<StoreError> for ProfileError {
    fn from(e: StoreError) -> Self {
        ProfileError::StorageError(e.to_string())
    }
}

// === RuleError ===

/// Errors related to match rule persistence and editing.
#[derive(Debug, Error)]
pub enum RuleError {
    /// Rule with the given ID was not found.
    #[error("Rule not found: {0}")]
    NotFound(String),
    /// The provided rule index is out of bounds.
    #[error("Invalid rule index: {0}")]
    InvalidIndex(usize),
    /// A url or profile token would not survive the rules text format.
    #[error("Invalid rule: {0}")]
    InvalidRule(String),
    /// Reading or writing the rules document failed.
    #[error("Rule storage error: {0}")]
    StorageError(String),
}

impl From<StoreError> for RuleError {
    fn from(e: StoreError) -> Self {
        RuleError::StorageError(e.to_string())
    }
}

// === UrlError ===

/// Errors related to URL parsing and translation.
#[derive(Debug, Error)]
pub enum UrlError {
    /// The input is not an absolute URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

// === GitLabError ===

/// Errors related to GitLab REST API calls.
#[derive(Debug, Error)]
pub enum GitLabError {
    /// The project address could not be turned into an API base URL.
    #[error("Invalid project address: {0}")]
    InvalidProjectAddress(String),
    /// GitLab answered with an error body carrying a `message`.
    #[error("{message}")]
    ApiError { operation: String, message: String },
    /// GitLab answered with a non-success status and no usable message.
    #[error("{operation} failed, status: {status}")]
    StatusError { operation: String, status: u16 },
    /// The request could not be sent or the response could not be read.
    #[error("GitLab network error: {0}")]
    NetworkError(String),
    /// The response body did not have the expected shape.
    #[error("Unexpected GitLab response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GitLabError {
    fn from(e: reqwest::Error) -> Self {
        GitLabError::NetworkError(e.to_string())
    }
}

// === IssueError ===

/// Errors related to composing and submitting an issue.
#[derive(Debug, Error)]
pub enum IssueError {
    /// A required draft field is empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The screenshot payload could not be decoded.
    #[error("Invalid screenshot: {0}")]
    InvalidScreenshot(String),
    /// A GitLab call failed; the workflow was aborted.
    #[error(transparent)]
    GitLab(#[from] GitLabError),
}

// === CaptureError ===

/// Errors related to the capture channel between extension surfaces.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// The owner task is no longer running.
    #[error("Capture channel closed")]
    ChannelClosed,
    /// The data URL is malformed.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    IoError(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    SerializationError(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}
