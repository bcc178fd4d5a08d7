use crate::api::v1::handler::ApiResponse;
use crate::application_port::*;
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    let (code, message) = if let Some(code) = err.find::<ApiErrorCode>() {
        (code.clone(), code.to_string())
    } else if err.is_not_found() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else if let Some(e) = err.find::<warp::body::BodyDeserializeError>() {
        (ApiErrorCode::BadRequest, format!("Malformed request: {}", e))
    } else if err.find::<reject::UnsupportedMediaType>().is_some() {
        (ApiErrorCode::BadRequest, "Expected a JSON body".to_string())
    } else if err.find::<reject::MethodNotAllowed>().is_some() {
        (ApiErrorCode::NotFound, ApiErrorCode::NotFound.to_string())
    } else {
        warn!("unhandled rejection: {:?}", err);
        (
            ApiErrorCode::InternalError,
            ApiErrorCode::InternalError.to_string(),
        )
    };

    let status = code.status();
    let json = warp::reply::json(&ApiResponse::<()>::err(code, message));
    Ok(warp::reply::with_status(json, status))
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub title: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("{}", INVALID_CREDENTIALS_MESSAGE)]
    InvalidCredentials,
    #[error("Not signed in")]
    InvalidSession,
    #[error("Missing or invalid CSRF token")]
    CsrfMismatch,
    #[error("Malformed request")]
    BadRequest,
    #[error("Not found")]
    NotFound,
    #[error("{}", SERVER_ERROR_MESSAGE)]
    InternalError,
}

impl ApiErrorCode {
    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials | ApiErrorCode::InvalidSession => {
                StatusCode::UNAUTHORIZED
            }
            ApiErrorCode::CsrfMismatch => StatusCode::FORBIDDEN,
            ApiErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidSession => ApiErrorCode::InvalidSession,
            AuthError::CsrfMismatch => ApiErrorCode::CsrfMismatch,
            AuthError::Store(e) => ApiErrorCode::internal(e),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<RejectReason> for ApiErrorCode {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::Invalid => ApiErrorCode::InvalidCredentials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_faults_never_look_like_bad_credentials() {
        let code = ApiErrorCode::from(AuthError::Store("redis down".to_string()));
        assert!(matches!(code, ApiErrorCode::InternalError));
        assert_eq!(code.to_string(), "Server error");
        assert_eq!(code.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn rejection_maps_to_fixed_text() {
        let code = ApiErrorCode::from(RejectReason::Invalid);
        assert_eq!(code.to_string(), "Incorrect username or password.");
        assert_eq!(code.status(), StatusCode::UNAUTHORIZED);
    }
}
