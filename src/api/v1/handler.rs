use super::cookie::CookiePolicy;
use super::error::*;
use crate::application_port::*;
use crate::domain_model::*;
use crate::logger::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::header::SET_COOKIE;
use warp::{self, Reply, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                title: LOGIN_ERROR_TITLE,
                message: message.into(),
            }),
        }
    }
}

#[derive(Deserialize)]
pub struct SigninRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub user_id: UserId,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn signin(
    body: SigninRequest,
    auth_service: Arc<dyn AuthService>,
    cookie_policy: Arc<CookiePolicy>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let credentials = Credentials::new(body.username, body.password);
    let result = auth_service
        .validate(credentials)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let issued = match result {
        AuthResult::Authenticated(issued) => issued,
        AuthResult::Rejected { reason } => {
            return Err(reject::custom(ApiErrorCode::from(reason)));
        }
    };

    let cookies = cookie_policy
        .issue(&issued)
        .map_err(ApiErrorCode::internal)
        .map_err(reject::custom)?;

    let response = SigninResponse {
        user_id: issued.user_id,
        username: issued.username,
        expires_at: issued.expires_at,
    };
    let mut reply = warp::reply::json(&ApiResponse::ok(response)).into_response();
    for cookie in cookies {
        reply.headers_mut().append(SET_COOKIE, cookie);
    }
    Ok(reply)
}

#[derive(Debug, Serialize)]
pub struct SignoutResponse;

pub async fn signout(
    session: SessionToken,
    csrf: Option<String>,
    auth_service: Arc<dyn AuthService>,
    cookie_policy: Arc<CookiePolicy>,
) -> Result<warp::reply::Response, warp::Rejection> {
    let csrf = csrf
        .map(CsrfToken::from)
        .ok_or_else(|| reject::custom(ApiErrorCode::CsrfMismatch))?;

    auth_service
        .logout(&session, &csrf)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let mut reply = warp::reply::json(&ApiResponse::ok(SignoutResponse)).into_response();
    for cookie in cookie_policy.clear() {
        reply.headers_mut().append(SET_COOKIE, cookie);
    }
    Ok(reply)
}

pub async fn whoami(
    session: SessionToken,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let info = auth_service
        .resolve_session(&session)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;
    debug!(user_id = %info.user_id, "whoami");

    Ok(warp::reply::json(&ApiResponse::ok(info)))
}
