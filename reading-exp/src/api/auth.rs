//! Internal token extraction
//!
//! The token may arrive as the `internal_token` query parameter or the
//! `x-internal-token` header, checked in that order. Whether it is required
//! at all is decided by [`TokenPolicy`] in [`crate::AppState`].

use std::collections::HashMap;
use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use reading_common::api::{TokenPolicy, INTERNAL_TOKEN_HEADER, INTERNAL_TOKEN_PARAM};

/// Token supplied by the caller, if any
///
/// Never rejects; handlers decide which status a bad token maps to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidedToken(pub Option<String>);

impl ProvidedToken {
    /// Fall back to a token carried in the request body
    pub fn or_body(self, body_token: Option<&str>) -> Self {
        match self.0 {
            Some(_) => self,
            None => ProvidedToken(non_empty(body_token)),
        }
    }

    pub fn is_allowed_by(&self, policy: &TokenPolicy) -> bool {
        let allowed = policy.check(self.0.as_deref());
        if !allowed {
            tracing::warn!(
                token_present = self.0.is_some(),
                "Internal token rejected"
            );
        }
        allowed
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for ProvidedToken
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let from_query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(params)| {
                non_empty(params.get(INTERNAL_TOKEN_PARAM).map(String::as_str))
            });

        if from_query.is_some() {
            return Ok(ProvidedToken(from_query));
        }

        let from_header = parts
            .headers
            .get(INTERNAL_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());

        Ok(ProvidedToken(non_empty(from_header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> ProvidedToken {
        let (mut parts, _) = req.into_parts();
        match ProvidedToken::from_request_parts(&mut parts, &()).await {
            Ok(token) => token,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn test_query_takes_precedence() {
        let req = Request::builder()
            .uri("/experiences?openid=o1&internal_token=from-query")
            .header(INTERNAL_TOKEN_HEADER, "from-header")
            .body(())
            .unwrap();

        assert_eq!(extract(req).await, ProvidedToken(Some("from-query".into())));
    }

    #[tokio::test]
    async fn test_header_fallback() {
        let req = Request::builder()
            .uri("/experiences?openid=o1&internal_token=")
            .header(INTERNAL_TOKEN_HEADER, "from-header")
            .body(())
            .unwrap();

        assert_eq!(extract(req).await, ProvidedToken(Some("from-header".into())));
    }

    #[tokio::test]
    async fn test_absent() {
        let req = Request::builder().uri("/experiences").body(()).unwrap();
        assert_eq!(extract(req).await, ProvidedToken(None));
    }

    #[test]
    fn test_body_fallback_only_when_missing() {
        let token = ProvidedToken(None).or_body(Some("body"));
        assert_eq!(token, ProvidedToken(Some("body".into())));

        let token = ProvidedToken(Some("query".into())).or_body(Some("body"));
        assert_eq!(token, ProvidedToken(Some("query".into())));
    }

    #[test]
    fn test_policy_check() {
        let policy = TokenPolicy::enforced("secret");
        assert!(ProvidedToken(Some("secret".into())).is_allowed_by(&policy));
        assert!(!ProvidedToken(Some("wrong".into())).is_allowed_by(&policy));
        assert!(!ProvidedToken(None).is_allowed_by(&policy));
        assert!(ProvidedToken(None).is_allowed_by(&TokenPolicy::disabled()));
    }
}
