use std::sync::atomic::Ordering;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use chirpy_types::error::{CoreError, CoreResult};

use crate::error::ApiError;
use crate::jwt::validate_access_token;
use crate::state::AppState;

/// Caller identified by a valid access token in `Authorization: Bearer`.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: u64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let user_id = validate_access_token(token, &state.jwt_secret)?;
        Ok(AuthUser { user_id })
    }
}

/// Token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> CoreResult<&str> {
    authorization_credential(headers, "Bearer")
}

/// Key from `Authorization: ApiKey <key>`.
pub fn extract_api_key(headers: &HeaderMap) -> CoreResult<&str> {
    authorization_credential(headers, "ApiKey")
}

fn authorization_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> CoreResult<&'a str> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| CoreError::unauthorized("missing Authorization header"))?
        .to_str()
        .map_err(|_| CoreError::unauthorized("malformed Authorization header"))?;

    let credential = value
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
        .ok_or_else(|| CoreError::unauthorized(format!("expected {} credentials", scheme)))?;

    if credential.is_empty() {
        return Err(CoreError::unauthorized(format!("empty {} credentials", scheme)));
    }
    Ok(credential)
}

/// Count every request routed through the static file server.
pub async fn count_hits(State(state): State<AppState>, req: Request, next: Next) -> Response {
    state.file_server_hits.fetch_add(1, Ordering::Relaxed);
    next.run(req).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn bearer_token_is_extracted() {
        let headers = with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn malformed_bearer_headers_are_rejected() {
        assert!(matches!(
            extract_bearer_token(&HeaderMap::new()),
            Err(CoreError::Unauthorized(_))
        ));
        for value in ["Bearer", "Bearer ", "Basic abc", "Bearerabc", "ApiKey abc"] {
            assert!(
                matches!(
                    extract_bearer_token(&with_auth(value)),
                    Err(CoreError::Unauthorized(_))
                ),
                "{value:?} should be rejected"
            );
        }
    }

    #[test]
    fn api_key_is_extracted() {
        let headers = with_auth("ApiKey f271c81ff7084ee5b99a5091b42d486e");
        assert_eq!(
            extract_api_key(&headers).unwrap(),
            "f271c81ff7084ee5b99a5091b42d486e"
        );
        assert!(extract_api_key(&with_auth("Bearer f271")).is_err());
    }
}
