use chirpy_types::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::Database;
use crate::models::{Chirp, RefreshToken, User, next_id};

/// Longest accepted chirp body, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Reject empty bodies and bodies over [`MAX_CHIRP_LENGTH`] characters.
pub fn validate_chirp_body(body: &str) -> CoreResult<()> {
    if body.is_empty() {
        return Err(CoreError::Validation("Chirp body is empty".into()));
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(CoreError::Validation("Chirp is too long".into()));
    }
    Ok(())
}

impl Database {
    // -- Chirps --

    pub fn create_chirp(&self, body: &str, author_id: u64) -> CoreResult<Chirp> {
        validate_chirp_body(body)?;

        self.with_snapshot_mut(|snapshot| {
            let chirp = Chirp {
                id: next_id(&snapshot.chirps)?,
                author_id,
                body: body.to_string(),
            };
            snapshot.chirps.insert(chirp.id, chirp.clone());

            debug!("Created chirp {} by user {}", chirp.id, author_id);
            Ok(chirp)
        })
    }

    /// All chirps, ascending by ID.
    pub fn get_chirps(&self) -> CoreResult<Vec<Chirp>> {
        // BTreeMap iterates in key order
        self.with_snapshot(|snapshot| Ok(snapshot.chirps.values().cloned().collect()))
    }

    pub fn get_chirp(&self, id: u64) -> CoreResult<Chirp> {
        self.with_snapshot(|snapshot| {
            snapshot
                .chirps
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found(format!("Chirp {}", id)))
        })
    }

    /// Delete a chirp on behalf of `requesting_user_id`, who must be its author.
    pub fn delete_chirp(&self, id: u64, requesting_user_id: u64) -> CoreResult<()> {
        self.with_snapshot_mut(|snapshot| {
            let chirp = snapshot
                .chirps
                .get(&id)
                .ok_or_else(|| CoreError::not_found(format!("Chirp {}", id)))?;

            if chirp.author_id != requesting_user_id {
                return Err(CoreError::Forbidden(format!(
                    "user {} is not the author of chirp {}",
                    requesting_user_id, id
                )));
            }

            snapshot.chirps.remove(&id);
            debug!("Deleted chirp {}", id);
            Ok(())
        })
    }

    // -- Users --

    pub fn create_user(&self, email: &str, hashed_password: &str) -> CoreResult<User> {
        if email.is_empty() {
            return Err(CoreError::Validation("Email is empty".into()));
        }

        self.with_snapshot_mut(|snapshot| {
            if snapshot.users.values().any(|u| u.email == email) {
                return Err(CoreError::AlreadyExists(format!("User {}", email)));
            }

            let user = User {
                id: next_id(&snapshot.users)?,
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
                is_promoted: false,
            };
            snapshot.users.insert(user.id, user.clone());

            debug!("Created user {}", user.id);
            Ok(user)
        })
    }

    /// All users, ascending by ID.
    pub fn get_users(&self) -> CoreResult<Vec<User>> {
        self.with_snapshot(|snapshot| Ok(snapshot.users.values().cloned().collect()))
    }

    pub fn get_user(&self, id: u64) -> CoreResult<User> {
        self.with_snapshot(|snapshot| {
            snapshot
                .users
                .get(&id)
                .cloned()
                .ok_or_else(|| CoreError::not_found(format!("User {}", id)))
        })
    }

    /// Exact, case-sensitive email lookup.
    pub fn get_user_by_email(&self, email: &str) -> CoreResult<User> {
        self.with_snapshot(|snapshot| {
            snapshot
                .users
                .values()
                .find(|u| u.email == email)
                .cloned()
                .ok_or_else(|| CoreError::not_found(format!("User {}", email)))
        })
    }

    /// Overwrite both mutable fields of a user.
    pub fn update_user(&self, id: u64, email: &str, hashed_password: &str) -> CoreResult<User> {
        if email.is_empty() {
            return Err(CoreError::Validation("Email is empty".into()));
        }

        self.with_snapshot_mut(|snapshot| {
            if !snapshot.users.contains_key(&id) {
                return Err(CoreError::not_found(format!("User {}", id)));
            }
            if snapshot
                .users
                .values()
                .any(|u| u.id != id && u.email == email)
            {
                return Err(CoreError::AlreadyExists(format!("User {}", email)));
            }

            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found(format!("User {}", id)))?;
            user.email = email.to_string();
            user.hashed_password = hashed_password.to_string();

            debug!("Updated user {}", id);
            Ok(user.clone())
        })
    }

    /// Set the promoted flag. Idempotent.
    pub fn upgrade_user(&self, id: u64) -> CoreResult<User> {
        self.with_snapshot_mut(|snapshot| {
            let user = snapshot
                .users
                .get_mut(&id)
                .ok_or_else(|| CoreError::not_found(format!("User {}", id)))?;
            user.is_promoted = true;

            debug!("Upgraded user {}", id);
            Ok(user.clone())
        })
    }

    // -- Refresh tokens --

    pub fn save_refresh_token(
        &self,
        token: &str,
        user_id: u64,
        expires_at: DateTime<Utc>,
    ) -> CoreResult<RefreshToken> {
        self.with_snapshot_mut(|snapshot| {
            if snapshot.refresh_tokens.contains_key(token) {
                return Err(CoreError::AlreadyExists("Refresh token".into()));
            }

            let record = RefreshToken {
                user_id,
                expires_at,
                revoked_at: None,
            };
            snapshot
                .refresh_tokens
                .insert(token.to_string(), record.clone());

            debug!("Saved refresh token for user {}", user_id);
            Ok(record)
        })
    }

    pub fn get_refresh_token(&self, token: &str) -> CoreResult<RefreshToken> {
        self.with_snapshot(|snapshot| {
            snapshot
                .refresh_tokens
                .get(token)
                .cloned()
                .ok_or_else(|| CoreError::not_found("Refresh token"))
        })
    }

    /// Mark a refresh token revoked at `at`. A second revoke keeps the
    /// original timestamp.
    pub fn revoke_refresh_token(&self, token: &str, at: DateTime<Utc>) -> CoreResult<RefreshToken> {
        self.with_snapshot_mut(|snapshot| {
            let record = snapshot
                .refresh_tokens
                .get_mut(token)
                .ok_or_else(|| CoreError::not_found("Refresh token"))?;
            if record.revoked_at.is_none() {
                record.revoked_at = Some(at);
                debug!("Revoked refresh token for user {}", record.user_id);
            }
            Ok(record.clone())
        })
    }

    /// Drop every refresh token that expired before `now`. Returns how many
    /// were removed.
    pub fn prune_expired_refresh_tokens(&self, now: DateTime<Utc>) -> CoreResult<usize> {
        self.with_snapshot_mut(|snapshot| {
            let before = snapshot.refresh_tokens.len();
            snapshot
                .refresh_tokens
                .retain(|_, record| !record.is_expired_at(now));
            Ok(before - snapshot.refresh_tokens.len())
        })
    }
}
