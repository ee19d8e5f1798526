use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlDbiError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Statement error: {0}")]
    StatementError(String),

    #[error("Bind error: {0}")]
    BindError(String),

    #[error("Cursor error: {0}")]
    CursorError(String),

    #[error(transparent)]
    SerializationError(#[from] serde_json::Error),
}

/// Category of a [`SqlDbiError`], for callers that only care which kind of
/// failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Statement,
    Bind,
    Cursor,
    Serialization,
}

impl SqlDbiError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            SqlDbiError::ConnectionError(_) => ErrorKind::Connection,
            SqlDbiError::StatementError(_) => ErrorKind::Statement,
            SqlDbiError::BindError(_) => ErrorKind::Bind,
            SqlDbiError::CursorError(_) => ErrorKind::Cursor,
            SqlDbiError::SerializationError(_) => ErrorKind::Serialization,
        }
    }

    pub(crate) fn closed_handle() -> Self {
        SqlDbiError::ConnectionError("connection is closed".into())
    }
}
