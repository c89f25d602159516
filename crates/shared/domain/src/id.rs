//! Account identifier value object.

use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Store-assigned account identifier.
///
/// Rendered as a 24-character lowercase hex token. Parsing anything else
/// fails with [`DomainError::MalformedId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(ObjectId);

impl AccountId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(ObjectId::new())
    }

    /// Parse an identifier token
    pub fn parse(token: &str) -> DomainResult<Self> {
        ObjectId::parse_str(token)
            .map(Self)
            .map_err(|_| DomainError::malformed_id(token))
    }

    /// Hex rendering used for storage and display
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl FromStr for AccountId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(id: AccountId) -> Self {
        id.to_hex()
    }
}
