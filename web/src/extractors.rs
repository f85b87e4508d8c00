//! Custom Axum extractors.

use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// Bearer credential from the `Authorization` header.
///
/// Extraction only peels the header; resolving the credential to a
/// partner is the job of the portal auth provider, called inside the
/// handler so the failure can carry a domain error.
///
/// # Example
///
/// ```ignore
/// async fn handler(bearer: BearerToken) -> Result<Json<Response>, AppError> {
///     let partner = state.auth.authenticate_portal_actor(&bearer.0).await?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Expected a bearer credential"))?
            .trim();

        if token.is_empty() {
            return Err(AppError::unauthorized("Empty bearer credential"));
        }

        Ok(Self(token.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<BearerToken, AppError> {
        let (mut parts, ()) = request.into_parts();
        BearerToken::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn extracts_bearer_credential() {
        let req = Request::builder()
            .header("Authorization", "Bearer session-abc123")
            .body(())
            .expect("Valid request");

        let token = extract(req).await.expect("Should extract");
        assert_eq!(token.0, "session-abc123");
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let req = Request::builder().body(()).expect("Valid request");
        assert!(extract(req).await.is_err());
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_rejected() {
        let req = Request::builder()
            .header("Authorization", "Basic dXNlcjpwdw==")
            .body(())
            .expect("Valid request");
        assert!(extract(req).await.is_err());
    }

    #[tokio::test]
    async fn empty_credential_is_rejected() {
        let req = Request::builder()
            .header("Authorization", "Bearer   ")
            .body(())
            .expect("Valid request");
        assert!(extract(req).await.is_err());
    }
}
