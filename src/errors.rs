use axum::http::StatusCode;
use sqlx::error::ErrorKind;
use std::error::Error;
use std::fmt;
use validator::ValidationErrors;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),

    ValidationError(ValidationErrors),

    Sqlx(sqlx::Error),

    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> u16 {
        use AppError::*;

        match self {
            BadRequest(_) | ValidationError(_) => 400,
            NotFound(_) => 404,
            Sqlx(error) => match error {
                sqlx::Error::Database(dbe) => match dbe.kind() {
                    ErrorKind::UniqueViolation => 409,
                    ErrorKind::ForeignKeyViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::CheckViolation => 400,
                    _ => 500,
                },
                sqlx::Error::RowNotFound => 404,
                _ => 500,
            },
            Anyhow(_) => 500,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_)) || self.code() == 404
    }

    /// True when the store rejected a write because of a UNIQUE constraint.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Sqlx(sqlx::Error::Database(dbe)) => dbe.is_unique_violation(),
            _ => false,
        }
    }

    fn reason(&self) -> &str {
        self.status().canonical_reason().unwrap_or("Unknown error")
    }

    pub fn message(&self) -> Option<String> {
        use AppError::*;
        match self {
            BadRequest(msg) | NotFound(msg) => Some(msg.clone()),
            ValidationError(err) => Some(err.to_string().replace('\n', "; ")),
            Sqlx(_) | Anyhow(_) => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message() {
            Some(message) => write!(f, "{}: {}", self.reason(), message),
            None => write!(f, "{}", self.reason()),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use AppError::*;
        match self {
            ValidationError(err) => Some(err),
            Sqlx(err) => Some(err),
            Anyhow(err) => err.source(),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Sqlx(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Anyhow(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::ValidationError(err)
    }
}

pub fn bad_request(msg: &str) -> AppError {
    AppError::BadRequest(msg.to_string())
}

pub fn not_found(msg: &str) -> AppError {
    AppError::NotFound(msg.to_string())
}
