use super::cookie::*;
use super::error::*;
use super::handler;
use crate::domain_model::SessionToken;
use crate::server::*;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let signin = warp::post()
        .and(warp::path("signin"))
        .and(warp::path::end())
        .and(warp::body::content_length_limit(16 * 1024))
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and(with(server.cookie_policy.clone()))
        .and_then(handler::signin);

    let signout = warp::post()
        .and(warp::path("signout"))
        .and(warp::path::end())
        .and(with_session())
        .and(warp::header::optional::<String>(CSRF_HEADER))
        .and(with(server.auth_service.clone()))
        .and(with(server.cookie_policy.clone()))
        .and_then(handler::signout);

    let whoami = warp::get()
        .and(warp::path("whoami"))
        .and(warp::path::end())
        .and(with_session())
        .and(with(server.auth_service.clone()))
        .and_then(handler::whoami);

    signin.or(signout).or(whoami)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Session token from the `session` cookie; the session itself is checked by the handler.
fn with_session() -> impl Filter<Extract = (SessionToken,), Error = warp::Rejection> + Clone {
    warp::cookie::optional::<String>(SESSION_COOKIE).and_then(|token: Option<String>| async move {
        match token {
            Some(token) if !token.is_empty() => Ok(SessionToken::from(token)),
            _ => Err(reject::custom(ApiErrorCode::InvalidSession)),
        }
    })
}
