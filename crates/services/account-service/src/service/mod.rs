//! Service layer - the account facade.

mod account_service;

pub use account_service::{hash_password_with, AccountManager, AccountService};
