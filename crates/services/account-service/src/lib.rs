//! Account Service Library
//!
//! Data-access facade for user accounts: CRUD against the account store,
//! password hashing and avatar uploads to the image host.

pub mod config;
pub mod image_host;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use common::ConfigProvider;

use crate::config::AccountServiceConfig;
use crate::image_host::ImageKitClient;
use crate::infra::Database;
use crate::repository::AccountStore;
use crate::service::AccountManager;

/// Connect to the store, apply migrations and wire the facade.
///
/// `settings` is consulted on every hash and upload call.
pub async fn build_account_service(
    config: &AccountServiceConfig,
    settings: Arc<dyn ConfigProvider>,
) -> Result<AccountManager, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database_url).await?;
    let store = Arc::new(AccountStore::new(db.get_connection()));
    let image_host = Arc::new(ImageKitClient::new(
        config.imagekit_upload_url.clone(),
        config.imagekit_timeout_ms,
    )?);

    info!(upload_url = %config.imagekit_upload_url, "Account service ready");
    Ok(AccountManager::new(store, settings, image_host))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = AccountServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database_url).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
