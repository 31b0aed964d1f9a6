//! Refresh tokens: opaque random strings persisted with their owner and
//! expiry. A token is Active until it expires or is revoked; both are
//! terminal.

use chirpy_db::Database;
use chirpy_types::error::{CoreError, CoreResult};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tracing::debug;

/// Lifetime of a refresh token from the moment it is issued.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Generate a new opaque token (32 random bytes, hex encoded). Not persisted.
pub fn issue_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Issue a refresh token for `user_id` and persist it with a fixed expiry.
pub fn create_session(db: &Database, user_id: u64) -> CoreResult<String> {
    let token = issue_refresh_token();
    let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);
    db.save_refresh_token(&token, user_id, expires_at)?;
    Ok(token)
}

/// Owner of an active refresh token.
pub fn resolve_refresh_token(db: &Database, token: &str) -> CoreResult<u64> {
    resolve_refresh_token_at(db, token, Utc::now())
}

pub fn resolve_refresh_token_at(db: &Database, token: &str, now: DateTime<Utc>) -> CoreResult<u64> {
    let record = match db.get_refresh_token(token) {
        Ok(record) => record,
        Err(CoreError::NotFound(_)) => return Err(CoreError::unauthorized("unknown refresh token")),
        Err(e) => return Err(e),
    };

    if record.is_revoked() {
        debug!("Rejected revoked refresh token for user {}", record.user_id);
        return Err(CoreError::unauthorized("refresh token revoked"));
    }
    if record.is_expired_at(now) {
        debug!("Rejected expired refresh token for user {}", record.user_id);
        return Err(CoreError::unauthorized("refresh token expired"));
    }

    Ok(record.user_id)
}

/// Revoke a refresh token. Unknown tokens are `NotFound`; revoking twice is
/// a no-op.
pub fn revoke_refresh_token(db: &Database, token: &str) -> CoreResult<()> {
    db.revoke_refresh_token(token, Utc::now())?;
    Ok(())
}
