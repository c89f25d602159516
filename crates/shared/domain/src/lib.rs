//! Domain layer - Account entity and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Storage, configuration and the image host live in the service crate.

pub mod account;
pub mod avatar;
pub mod constants;
pub mod error;
pub mod id;
pub mod password;

pub use account::{Account, AccountPatch, DeleteOutcome, NewAccount, UpdateOutcome};
pub use avatar::AvatarFile;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use id::AccountId;
pub use password::{HashCost, Password};
