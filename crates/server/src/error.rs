use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::{mission::MissionError, spy_cat::SpyCatError, target::TargetError};
use services::services::breed::BreedError;
use thiserror::Error;
use utils::response::ApiResponse;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    SpyCat(#[from] SpyCatError),
    #[error(transparent)]
    Mission(#[from] MissionError),
    #[error(transparent)]
    Target(#[from] TargetError),
    #[error(transparent)]
    Breed(#[from] BreedError),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Internal Server Error: {0}")]
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status_code, error_type) = match &self {
            ApiError::SpyCat(err) => match err {
                SpyCatError::NotFound => (StatusCode::NOT_FOUND, "SpyCatError"),
                SpyCatError::InvalidBreed(_) => (StatusCode::BAD_REQUEST, "SpyCatError"),
                SpyCatError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "SpyCatError"),
            },
            ApiError::Mission(err) => match err {
                MissionError::NotFound | MissionError::CatNotFound => {
                    (StatusCode::NOT_FOUND, "MissionError")
                }
                MissionError::InvalidTargetCount(_) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "MissionError")
                }
                MissionError::CatBusy(_)
                | MissionError::AssignedToCat
                | MissionError::AlreadyComplete => (StatusCode::BAD_REQUEST, "MissionError"),
                MissionError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "MissionError"),
            },
            ApiError::Target(err) => match err {
                TargetError::NotFound | TargetError::MissionNotFound => {
                    (StatusCode::NOT_FOUND, "TargetError")
                }
                TargetError::NotesLocked => (StatusCode::BAD_REQUEST, "TargetError"),
                TargetError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TargetError"),
            },
            ApiError::Breed(_) => (StatusCode::SERVICE_UNAVAILABLE, "BreedError"),
            ApiError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DatabaseError"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IoError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BadRequest"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NotFound"),
            ApiError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        };

        let error_message = match &self {
            ApiError::SpyCat(SpyCatError::Database(_))
            | ApiError::Mission(MissionError::Database(_))
            | ApiError::Target(TargetError::Database(_)) => {
                format!("{}: {}", error_type, self)
            }
            ApiError::BadRequest(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::InternalError(msg) => msg.clone(),
            ApiError::Database(_) | ApiError::Io(_) => format!("{}: {}", error_type, self),
            _ => self.to_string(),
        };
        let response = ApiResponse::<()>::error(&error_message);
        (status_code, Json(response)).into_response()
    }
}
