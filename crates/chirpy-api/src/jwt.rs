//! HS256 access tokens.
//!
//! Access tokens are short-lived and not individually revocable; only
//! refresh tokens (see [`crate::sessions`]) can be revoked.

use chirpy_types::api::Claims;
use chirpy_types::error::{CoreError, CoreResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

/// `iss` claim stamped on every access token.
pub const ISSUER: &str = "chirpy";

/// Default access token lifetime.
pub const DEFAULT_ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Sign an access token for `user_id`, valid for `ttl` from now.
pub fn issue_access_token(user_id: u64, secret: &str, ttl: Duration) -> CoreResult<String> {
    issue_access_token_at(user_id, secret, ttl, Utc::now())
}

/// Sign an access token as if issued at `now`. Identical inputs produce an
/// identical token.
pub fn issue_access_token_at(
    user_id: u64,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> CoreResult<String> {
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| CoreError::Internal(format!("sign access token: {}", e)))
}

/// Verify signature, issuer and expiry, returning the user ID in `sub`.
pub fn validate_access_token(token: &str, secret: &str) -> CoreResult<u64> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| CoreError::unauthorized(format!("invalid access token: {}", e)))?;

    data.claims
        .sub
        .parse()
        .map_err(|_| CoreError::unauthorized("invalid subject in access token"))
}
