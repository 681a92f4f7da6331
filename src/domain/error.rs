use thiserror::Error;

/// Status reserved for failures where no HTTP response was received
pub const STATUS_UNREACHABLE: u16 = 0;

/// Status used when the server answered 2xx with a body we cannot decode
pub const STATUS_INVALID_RESPONSE: u16 = 502;

/// Uniform failure shape for every backend call
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("API error ({status}): {message}")]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// DNS failure, refused connection, timeout
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(STATUS_UNREACHABLE, message)
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(STATUS_INVALID_RESPONSE, message)
    }

    /// Generic message for a status the server did not explain
    pub fn generic(status: u16) -> Self {
        Self::new(status, format!("Request failed with status {}", status))
    }

    pub fn is_network(&self) -> bool {
        self.status == STATUS_UNREACHABLE
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

/// Login failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Session storage error: {0}")]
    Storage(String),
}

impl From<ApiError> for AuthError {
    fn from(error: ApiError) -> Self {
        match error.status {
            STATUS_UNREACHABLE => Self::Network(error.message),
            400..=499 => Self::InvalidCredentials(error.message),
            status => Self::Server {
                status,
                message: error.message,
            },
        }
    }
}

/// Durable session storage failures
#[derive(Debug, Error)]
pub enum SessionStorageError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupt: {0}")]
    Corrupt(String),

    #[error("Session storage lock poisoned: {0}")]
    Lock(String),
}
