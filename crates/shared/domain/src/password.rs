//! Password value object - salted Argon2 hashing.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::constants::MIN_HASH_COST;
use crate::error::{DomainError, DomainResult};

/// Hash cost factor.
///
/// Maps to the Argon2 time cost (iteration count); memory and parallelism
/// stay at the argon2 crate defaults.
#[derive(Debug, Clone)]
pub struct HashCost {
    params: Params,
}

impl HashCost {
    /// Validate a cost factor
    pub fn new(rounds: u32) -> DomainResult<Self> {
        if rounds < MIN_HASH_COST {
            return Err(DomainError::invalid_cost(format!(
                "cost must be at least {}, got {}",
                MIN_HASH_COST, rounds
            )));
        }

        let params = Params::new(
            Params::DEFAULT_M_COST,
            rounds,
            Params::DEFAULT_P_COST,
            None,
        )
        .map_err(|e| DomainError::invalid_cost(e.to_string()))?;

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

/// Password value object holding a hash, never the plain text.
#[derive(Clone, PartialEq, Eq)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash the plain text with a fresh random salt.
    ///
    /// Two calls with the same input produce different hashes.
    pub fn hash(plain_text: &str, cost: &HashCost) -> DomainResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = cost
            .argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::password(format!("hash failed: {}", e)))?;

        Ok(Self {
            hash: hash.to_string(),
        })
    }

    /// Wrap an existing hash (from the store).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify plain text against this hash. Unparseable hashes never match.
    pub fn verify(&self, plain_text: &str) -> bool {
        self.try_verify(plain_text).unwrap_or(false)
    }

    /// Verify plain text, failing when the stored hash cannot be parsed.
    ///
    /// The cost parameters are read back from the hash string itself.
    pub fn try_verify(&self, plain_text: &str) -> DomainResult<bool> {
        let parsed = PasswordHash::new(&self.hash)
            .map_err(|e| DomainError::password(format!("invalid hash format: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(plain_text.as_bytes(), &parsed)
            .is_ok())
    }
}

impl From<Password> for String {
    fn from(password: Password) -> Self {
        password.hash
    }
}
