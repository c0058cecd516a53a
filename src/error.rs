use thiserror::Error;
use warp::http::StatusCode;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Tournament {0} not found")]
    NotFound(i64),

    #[error("Tournament {0} is deleted")]
    Gone(i64),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

impl From<&str> for Error {
    fn from(str: &str) -> Self {
        Self::Validation(str.to_owned())
    }
}

impl From<String> for Error {
    fn from(str: String) -> Self {
        Self::Validation(str)
    }
}

impl Error {
    /// HTTP status reported to clients for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Gone(_) => StatusCode::GONE,
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::Storage(_) | Error::Json(_) | Error::IO(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to hand back to a client. Storage internals are not exposed.
    pub fn client_message(&self) -> String {
        match self {
            Error::NotFound(_) => "Tournament not found".to_string(),
            Error::Gone(_) => "Tournament is deleted".to_string(),
            Error::Validation(_) => self.to_string(),
            Error::Storage(_) | Error::Json(_) | Error::IO(_) => {
                "Internal server error".to_string()
            }
        }
    }
}
