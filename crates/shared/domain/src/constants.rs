//! Domain-level constants.

// =============================================================================
// Account Roles
// =============================================================================

/// Default role assigned to new accounts
pub const ROLE_USER: &str = "user";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Identifiers
// =============================================================================

/// Length of a rendered account identifier (12 bytes, hex encoded)
pub const ACCOUNT_ID_HEX_LENGTH: usize = 24;

// =============================================================================
// Avatars
// =============================================================================

/// Folder on the image host that receives every avatar upload
pub const AVATAR_FOLDER: &str = "/adanest-avatars";

/// File name prefix for uploaded avatars
pub const AVATAR_FILE_PREFIX: &str = "avatar";

// =============================================================================
// Password hashing
// =============================================================================

/// Smallest accepted hash cost (Argon2 time cost)
pub const MIN_HASH_COST: u32 = 1;
