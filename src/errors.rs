use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

pub type MealResult<T> = Result<T, MealError>;

#[derive(Debug, Error)]
pub enum MealError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("connection error: {0}")]
    Connection(#[from] diesel::r2d2::PoolError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MealError {
    pub fn validation<T, R>(msg: T) -> MealResult<R>
    where
        T: Into<String>,
    {
        Err(MealError::Validation(msg.into()))
    }

    pub fn not_found<T, R>(msg: T) -> MealResult<R>
    where
        T: Into<String>,
    {
        Err(MealError::NotFound(msg.into()))
    }

    pub fn conflict<T, R>(msg: T) -> MealResult<R>
    where
        T: Into<String>,
    {
        Err(MealError::Conflict(msg.into()))
    }
}

impl ResponseError for MealError {
    fn status_code(&self) -> StatusCode {
        match self {
            MealError::Validation(_) => StatusCode::BAD_REQUEST,
            MealError::NotFound(_) => StatusCode::NOT_FOUND,
            MealError::Conflict(_) => StatusCode::CONFLICT,
            MealError::Request(_) | MealError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "error": self.to_string() }))
    }
}
