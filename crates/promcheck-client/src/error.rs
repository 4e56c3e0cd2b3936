/// Errors that can occur when querying the Prometheus HTTP API.
///
/// # Examples
///
/// ```rust
/// use promcheck_client::error::ClientError;
///
/// let err = ClientError::UnexpectedResultType("vector".to_string());
/// assert!(err.to_string().contains("vector"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Non-2xx status with a body that is not a Prometheus error envelope.
    #[error("Prometheus API HTTP error: status={status}, body={body}")]
    Api { status: u16, body: String },

    /// The API answered with `status: "error"` in its JSON envelope.
    #[error("Prometheus query error ({error_type}): {error}")]
    ErrorResponse { error_type: String, error: String },

    /// A range query must return a matrix; anything else means the
    /// expression does not evaluate to a range vector.
    #[error("unexpected result type '{0}', expected 'matrix'")]
    UnexpectedResultType(String),

    /// A sample's timestamp or value could not be decoded.
    #[error("invalid sample in response: {0}")]
    InvalidSample(String),

    /// A 2xx response whose body does not match the expected envelope.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// An underlying HTTP transport error from `reqwest`.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON deserialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias so callers can write `error::Result<T>`.
pub type Result<T> = std::result::Result<T, ClientError>;
