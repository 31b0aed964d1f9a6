//! Persisted record types. These map directly onto the JSON document and are
//! distinct from the chirpy-types API views, so the password hash stays here.

use std::collections::BTreeMap;

use chirpy_types::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The entire persisted state, read and rewritten as one unit.
///
/// Numeric keys serialize as JSON object keys (`"1"`, `"2"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub chirps: BTreeMap<u64, Chirp>,
    #[serde(default)]
    pub users: BTreeMap<u64, User>,
    #[serde(default)]
    pub refresh_tokens: BTreeMap<String, RefreshToken>,
}

impl Snapshot {
    /// Every chirp and user must be stored under its own ID.
    pub(crate) fn check_keys(&self) -> Result<(), String> {
        if let Some((key, chirp)) = self.chirps.iter().find(|(key, c)| **key != c.id) {
            return Err(format!("chirp stored under key {} has id {}", key, chirp.id));
        }
        if let Some((key, user)) = self.users.iter().find(|(key, u)| **key != u.id) {
            return Err(format!("user stored under key {} has id {}", key, user.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub author_id: u64,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub hashed_password: String,
    #[serde(default)]
    pub is_promoted: bool,
}

/// Refresh-token record, keyed by the token string in [`Snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub user_id: u64,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshToken {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Next free ID: one past the highest live ID.
pub(crate) fn next_id<V>(map: &BTreeMap<u64, V>) -> CoreResult<u64> {
    match map.keys().next_back() {
        None => Ok(1),
        Some(id) => id
            .checked_add(1)
            .ok_or_else(|| CoreError::Internal("ID space exhausted".into())),
    }
}

impl From<User> for chirpy_types::api::UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_promoted: user.is_promoted,
        }
    }
}

impl From<Chirp> for chirpy_types::api::ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            author_id: chirp.author_id,
            body: chirp.body,
        }
    }
}
