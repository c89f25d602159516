//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::constants::ROLE_USER;
use crate::id::AccountId;

/// Account domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub username: String,
    /// Salted password hash. Never rendered.
    #[serde(default, skip_serializing)]
    pub password: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Remaining profile fields, stored as given
    #[serde(default = "empty_profile")]
    pub profile: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account creation payload.
///
/// `password` must already be a hash; the store writes it unchanged.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewAccount {
    pub email: String,
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default = "empty_profile")]
    pub profile: Value,
}

impl NewAccount {
    /// Create a payload with an empty profile
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password_hash.into(),
            role: role.into(),
            avatar_url: None,
            profile: empty_profile(),
        }
    }

    /// Attach opaque profile fields
    pub fn with_profile(mut self, profile: Value) -> Self {
        self.profile = profile;
        self
    }

    /// Attach an avatar URL
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(url.into());
        self
    }
}

/// Partial account update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AccountPatch {
    pub email: Option<String>,
    pub username: Option<String>,
    /// New password hash
    pub password: Option<String>,
    pub role: Option<String>,
    /// `Some(None)` clears the stored URL; an explicit JSON `null` does the same
    #[serde(default, deserialize_with = "present_or_null")]
    pub avatar_url: Option<Option<String>>,
    /// Replaces the stored profile object
    pub profile: Option<Value>,
}

impl AccountPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn password(mut self, password_hash: impl Into<String>) -> Self {
        self.password = Some(password_hash.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = Some(Some(url.into()));
        self
    }

    pub fn clear_avatar_url(mut self) -> Self {
        self.avatar_url = Some(None);
        self
    }

    pub fn profile(mut self, profile: Value) -> Self {
        self.profile = Some(profile);
        self
    }

    /// True when no field would be written
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.role.is_none()
            && self.avatar_url.is_none()
            && self.profile.is_none()
    }
}

/// Outcome of a delete by identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    /// 0 when nothing matched, otherwise 1
    pub deleted_count: u64,
}

/// Outcome of an update by identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

fn default_role() -> String {
    ROLE_USER.to_string()
}

fn empty_profile() -> Value {
    Value::Object(Default::default())
}

// Absent field stays `None`; a present field, `null` included, becomes `Some`
fn present_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
