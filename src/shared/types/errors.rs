use thiserror::Error;

/// Errors raised by the local session store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Session store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session store is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session store lock poisoned")]
    Poisoned,
}

/// Errors surfaced by any backend call
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection, TLS or timeout failure
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response whose body could not be understood
    #[error("Invalid response: {0}")]
    Decode(String),

    /// The stored credential expired and the session was cleared
    #[error("Session expired, please sign in again")]
    SessionExpired,

    #[error("Validation: {0}")]
    Validation(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Invalid QR payload: {0}")]
    Qr(#[from] base64::DecodeError),
}

impl ClientError {
    /// HTTP status of an application error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401) || matches!(self, Self::SessionExpired)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(409)
    }

    /// Response body of an application error, empty otherwise
    pub fn body(&self) -> &str {
        match self {
            Self::Status { body, .. } => body,
            _ => "",
        }
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// Failure of a single page load, carrying the underlying cause
#[derive(Debug, Error)]
#[error("Failed to load page {page}: {source}")]
pub struct LoadError {
    pub page: u32,
    #[source]
    pub source: ClientError,
}

pub type ClientResult<T> = Result<T, ClientError>;
