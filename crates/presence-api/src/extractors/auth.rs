//! Caller token extractor
//!
//! Pulls the bearer token out of the Authorization header. Verification is
//! left to the identity resolver, so a missing or malformed header is not a
//! rejection: it yields an anonymous caller and each operation decides what
//! that means.

use std::convert::Infallible;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

/// Bearer token of the request, if any
#[derive(Debug, Clone, Default)]
pub struct CallerToken(pub Option<String>);

impl CallerToken {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
            .filter(|token| !token.is_empty());

        if token.is_none() {
            tracing::trace!("Request carries no bearer token");
        }
        Ok(CallerToken(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> CallerToken {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("authorization", value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        CallerToken::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[tokio::test]
    async fn test_bearer_token() {
        assert_eq!(extract(Some("Bearer abc.def")).await.token(), Some("abc.def"));
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header() {
        assert!(extract(None).await.token().is_none());
        assert!(extract(Some("Basic dXNlcjpwdw==")).await.token().is_none());
        assert!(extract(Some("Bearer")).await.token().is_none());
    }
}
