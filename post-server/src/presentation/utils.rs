use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::user::Principal;
use crate::presentation::middleware::{BearerCredentials, RequestId};

/// Resolves the bearer token stored by `JwtAuthMiddleware`. Extract as
/// `Option<Principal>` to let the service decide what anonymous callers may do.
impl FromRequest for Principal {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(principal) = req.extensions().get::<Principal>() {
            let principal = principal.clone();
            return Box::pin(async move { Ok(principal) });
        }

        let credentials = req.extensions().get::<BearerCredentials>().cloned();
        let req = req.clone();

        Box::pin(async move {
            let Some(credentials) = credentials else {
                return Err::<Principal, Error>(DomainError::Unauthorized.into());
            };
            match credentials.authenticator.authenticate(&credentials.token).await {
                Ok(principal) => {
                    req.extensions_mut().insert(principal.clone());
                    Ok(principal)
                }
                Err(err) => {
                    debug!(error = %err, "bearer token rejected");
                    Err(DomainError::Unauthorized.into())
                }
            }
        })
    }
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
