//! Account service - the facade over the account store.
//!
//! Every operation is one independent call against the store, the hash
//! primitive or the image host. Nothing is cached and nothing is retried.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use common::{AppError, AppResult, ConfigProvider, OptionExt};
use domain::{
    Account, AccountId, AccountPatch, AvatarFile, DeleteOutcome, HashCost, NewAccount, Password,
    UpdateOutcome,
};

use crate::config::SALT_ROUNDS_KEY;
use crate::image_host::{ImageHost, ImageHostCredentials, UploadRequest};
use crate::repository::AccountRepository;

/// Account operations exposed to upstream callers.
///
/// Identifier arguments are raw tokens; anything that is not a 24-character
/// hex string fails with [`AppError::MalformedId`] before the store is touched.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Persist a new account. `password` must already be hashed.
    async fn create_account(&self, account: NewAccount) -> AppResult<Account>;

    /// Every stored account
    async fn list_accounts(&self) -> AppResult<Vec<Account>>;

    /// Fails with `NotFound` when absent
    async fn get_account_by_id(&self, id: &str) -> AppResult<Account>;

    async fn get_account_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn get_account_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    async fn list_accounts_by_role(&self, role: &str) -> AppResult<Vec<Account>>;

    async fn account_exists(&self, id: &str) -> AppResult<bool>;

    async fn is_email_taken(&self, email: &str) -> AppResult<bool>;

    /// Deleting a missing account reports zero deletions
    async fn delete_account(&self, id: &str) -> AppResult<DeleteOutcome>;

    /// Updating a missing account reports zero matches
    async fn update_account(&self, id: &str, patch: AccountPatch) -> AppResult<UpdateOutcome>;

    /// Stored password hash only, for credential checks
    async fn get_password_hash(&self, id: &str) -> AppResult<Option<String>>;

    /// Salted hash at the cost factor configured right now
    async fn hash_password(&self, plain_text: &str) -> AppResult<String>;

    /// Check plain text against a stored hash
    fn verify_password(&self, plain_text: &str, hash: &str) -> AppResult<bool>;

    /// Upload an avatar and return its public URL, `None` if the host gave none.
    ///
    /// Every image host failure becomes [`AppError::Upload`].
    async fn upload_avatar(&self, account_id: &str, file: AvatarFile) -> AppResult<Option<String>>;
}

/// Hash with the cost factor read from `config`.
///
/// Shared by the facade and the CLI.
pub fn hash_password_with(config: &dyn ConfigProvider, plain_text: &str) -> AppResult<String> {
    let raw = config
        .get(SALT_ROUNDS_KEY)
        .ok_or_else(|| AppError::config(format!("{} is not set", SALT_ROUNDS_KEY)))?;

    let rounds: u32 = raw.trim().parse().map_err(|_| {
        AppError::config(format!("{} must be an integer, got '{}'", SALT_ROUNDS_KEY, raw))
    })?;

    let cost = HashCost::new(rounds)?;
    let password = Password::hash(plain_text, &cost)?;
    Ok(password.into_string())
}

/// Facade implementation over injected collaborators.
pub struct AccountManager {
    store: Arc<dyn AccountRepository>,
    config: Arc<dyn ConfigProvider>,
    image_host: Arc<dyn ImageHost>,
}

impl AccountManager {
    pub fn new(
        store: Arc<dyn AccountRepository>,
        config: Arc<dyn ConfigProvider>,
        image_host: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            store,
            config,
            image_host,
        }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn create_account(&self, account: NewAccount) -> AppResult<Account> {
        self.store.insert(account).await
    }

    async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        self.store.find_all().await
    }

    async fn get_account_by_id(&self, id: &str) -> AppResult<Account> {
        let id = AccountId::parse(id)?;
        self.store.find_by_id(id).await?.ok_or_not_found()
    }

    async fn get_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.store.find_by_email(email).await
    }

    async fn get_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        self.store.find_by_username(username).await
    }

    async fn list_accounts_by_role(&self, role: &str) -> AppResult<Vec<Account>> {
        self.store.find_by_role(role).await
    }

    async fn account_exists(&self, id: &str) -> AppResult<bool> {
        let id = AccountId::parse(id)?;
        self.store.exists_by_id(id).await
    }

    async fn is_email_taken(&self, email: &str) -> AppResult<bool> {
        self.store.exists_by_email(email).await
    }

    async fn delete_account(&self, id: &str) -> AppResult<DeleteOutcome> {
        let id = AccountId::parse(id)?;
        let outcome = self.store.delete_by_id(id).await?;
        debug!(account_id = %id, deleted = outcome.deleted_count, "Account delete");
        Ok(outcome)
    }

    async fn update_account(&self, id: &str, patch: AccountPatch) -> AppResult<UpdateOutcome> {
        let id = AccountId::parse(id)?;
        let outcome = self.store.update_by_id(id, patch).await?;
        debug!(account_id = %id, matched = outcome.matched_count, "Account update");
        Ok(outcome)
    }

    async fn get_password_hash(&self, id: &str) -> AppResult<Option<String>> {
        let id = AccountId::parse(id)?;
        self.store.find_password_hash(id).await
    }

    async fn hash_password(&self, plain_text: &str) -> AppResult<String> {
        let config = Arc::clone(&self.config);
        let plain_text = plain_text.to_owned();

        // Argon2 is CPU bound; keep it off the async workers
        tokio::task::spawn_blocking(move || hash_password_with(config.as_ref(), &plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Hash task join error: {}", e)))?
    }

    fn verify_password(&self, plain_text: &str, hash: &str) -> AppResult<bool> {
        Ok(Password::from_hash(hash).try_verify(plain_text)?)
    }

    async fn upload_avatar(&self, account_id: &str, file: AvatarFile) -> AppResult<Option<String>> {
        let request = UploadRequest::avatar(account_id, file);
        let file_name = request.file_name.clone();

        let result = match ImageHostCredentials::from_provider(self.config.as_ref()) {
            Ok(credentials) => self.image_host.upload(&credentials, request).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(uploaded) => {
                debug!(file_name = %file_name, url = ?uploaded.url, "Avatar uploaded");
                Ok(uploaded.url)
            }
            Err(err) => {
                warn!(file_name = %file_name, error = %err, "Avatar upload failed");
                Err(AppError::upload(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IMAGEKIT_PRIVATE_KEY, IMAGEKIT_PUBLIC_KEY, IMAGEKIT_URL_ENDPOINT};
    use crate::image_host::{ImageHostError, MockImageHost, UploadedImage};
    use crate::repository::MockAccountRepository;
    use chrono::Utc;
    use common::StaticConfig;
    use domain::ROLE_USER;
    use mockall::predicate::eq;

    const ID: &str = "507f1f77bcf86cd799439011";

    fn test_account(id: AccountId) -> Account {
        Account {
            id,
            email: "a@x.com".to_string(),
            username: "a".to_string(),
            password: "hashed".to_string(),
            role: ROLE_USER.to_string(),
            avatar_url: None,
            profile: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn image_config() -> StaticConfig {
        StaticConfig::new()
            .with(IMAGEKIT_PUBLIC_KEY, "public_abc")
            .with(IMAGEKIT_PRIVATE_KEY, "private_xyz")
            .with(IMAGEKIT_URL_ENDPOINT, "https://ik.imagekit.io/demo")
    }

    fn manager(
        repo: MockAccountRepository,
        config: StaticConfig,
        host: MockImageHost,
    ) -> AccountManager {
        AccountManager::new(Arc::new(repo), Arc::new(config), Arc::new(host))
    }

    /// Manager whose collaborators expect no calls at all
    fn untouched_manager() -> AccountManager {
        manager(MockAccountRepository::new(), StaticConfig::new(), MockImageHost::new())
    }

    #[tokio::test]
    async fn test_get_account_by_id_success() {
        let id = AccountId::parse(ID).unwrap();
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(id))
            .returning(|id| Ok(Some(test_account(id))));

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());
        let account = service.get_account_by_id(ID).await.unwrap();

        assert_eq!(account.id, id);
    }

    #[tokio::test]
    async fn test_get_account_by_id_not_found() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());
        let result = service.get_account_by_id(ID).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_malformed_id_never_reaches_store() {
        // No expectations: any store call would panic
        let service = untouched_manager();

        assert!(matches!(
            service.get_account_by_id("not-a-valid-id").await,
            Err(AppError::MalformedId(_))
        ));
        assert!(matches!(service.account_exists("xyz").await, Err(AppError::MalformedId(_))));
        assert!(matches!(service.delete_account("xyz").await, Err(AppError::MalformedId(_))));
        assert!(matches!(
            service.update_account("xyz", AccountPatch::new().role("admin")).await,
            Err(AppError::MalformedId(_))
        ));
        assert!(matches!(service.get_password_hash("xyz").await, Err(AppError::MalformedId(_))));
    }

    #[tokio::test]
    async fn test_create_passes_conflict_through() {
        let mut repo = MockAccountRepository::new();
        repo.expect_insert()
            .returning(|_| Err(AppError::Conflict("accounts.email".to_string())));

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());
        let result = service
            .create_account(NewAccount::new("a@x.com", "a", "hash", ROLE_USER))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_is_zero_not_error() {
        let mut repo = MockAccountRepository::new();
        repo.expect_delete_by_id()
            .returning(|_| Ok(DeleteOutcome { deleted_count: 0 }));

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());
        let outcome = service.delete_account(ID).await.unwrap();

        assert_eq!(outcome.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_update_forwards_patch() {
        let id = AccountId::parse(ID).unwrap();
        let mut repo = MockAccountRepository::new();
        repo.expect_update_by_id()
            .withf(move |got, patch| *got == id && patch.username.as_deref() == Some("renamed"))
            .returning(|_, _| {
                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                })
            });

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());
        let outcome = service
            .update_account(ID, AccountPatch::new().username("renamed"))
            .await
            .unwrap();

        assert_eq!(outcome.matched_count, 1);
    }

    #[tokio::test]
    async fn test_is_email_taken() {
        let mut repo = MockAccountRepository::new();
        repo.expect_exists_by_email()
            .withf(|email| email == "a@x.com")
            .returning(|_| Ok(true));
        repo.expect_exists_by_email()
            .withf(|email| email == "b@x.com")
            .returning(|_| Ok(false));

        let service = manager(repo, StaticConfig::new(), MockImageHost::new());

        assert!(service.is_email_taken("a@x.com").await.unwrap());
        assert!(!service.is_email_taken("b@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_password_fresh_salt_each_call() {
        let config = StaticConfig::new().with(SALT_ROUNDS_KEY, "2");
        let service = manager(MockAccountRepository::new(), config, MockImageHost::new());

        let first = service.hash_password("hunter2").await.unwrap();
        let second = service.hash_password("hunter2").await.unwrap();

        assert_ne!(first, second);
        assert_ne!(first, "hunter2");
        assert!(service.verify_password("hunter2", &first).unwrap());
        assert!(service.verify_password("hunter2", &second).unwrap());
        assert!(!service.verify_password("hunter3", &first).unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_hash_password_concurrent_calls() {
        let config = StaticConfig::new().with(SALT_ROUNDS_KEY, "1");
        let service = Arc::new(manager(MockAccountRepository::new(), config, MockImageHost::new()));

        let tasks: Vec<_> = (0..4)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move { service.hash_password(&format!("pw-{}", i)).await })
            })
            .collect();

        for (i, task) in tasks.into_iter().enumerate() {
            let hash = task.await.unwrap().unwrap();
            assert!(service.verify_password(&format!("pw-{}", i), &hash).unwrap());
        }
    }

    #[tokio::test]
    async fn test_hash_password_config_errors() {
        for config in [
            StaticConfig::new(),
            StaticConfig::new().with(SALT_ROUNDS_KEY, "ten"),
            StaticConfig::new().with(SALT_ROUNDS_KEY, "-3"),
            StaticConfig::new().with(SALT_ROUNDS_KEY, "0"),
        ] {
            let service = manager(MockAccountRepository::new(), config, MockImageHost::new());
            let result = service.hash_password("hunter2").await;
            assert!(matches!(result, Err(AppError::Config(_))), "got {:?}", result);
        }
    }

    #[test]
    fn test_hash_cost_read_at_call_time() {
        let mut config = StaticConfig::new().with(SALT_ROUNDS_KEY, "1");
        let low = hash_password_with(&config, "pw").unwrap();

        config.set(SALT_ROUNDS_KEY, "3");
        let high = hash_password_with(&config, "pw").unwrap();

        assert!(low.contains("t=1"));
        assert!(high.contains("t=3"));
    }

    #[test]
    fn test_verify_rejects_unparseable_hash() {
        let service = untouched_manager();
        let result = service.verify_password("hunter2", "hunter2");

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_upload_avatar_success() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .withf(|credentials, request| {
                credentials.private_key == "private_xyz"
                    && request.file_name == format!("avatar-{}.png", ID)
                    && request.folder == "/adanest-avatars"
                    && request.use_unique_file_name
            })
            .times(1)
            .returning(|_, _| {
                Ok(UploadedImage {
                    url: Some("https://ik.imagekit.io/demo/avatar.png".to_string()),
                    ..Default::default()
                })
            });

        let service = manager(MockAccountRepository::new(), image_config(), host);
        let url = service
            .upload_avatar(ID, AvatarFile::new(vec![1, 2, 3], "image/png"))
            .await
            .unwrap();

        assert_eq!(url.as_deref(), Some("https://ik.imagekit.io/demo/avatar.png"));
    }

    #[tokio::test]
    async fn test_upload_avatar_without_url() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .returning(|_, _| Ok(UploadedImage::default()));

        let service = manager(MockAccountRepository::new(), image_config(), host);
        let url = service
            .upload_avatar(ID, AvatarFile::new(vec![1], "image/jpeg"))
            .await
            .unwrap();

        assert!(url.is_none());
    }

    #[tokio::test]
    async fn test_upload_quota_error_collapses_to_upload_error() {
        let mut host = MockImageHost::new();
        host.expect_upload().returning(|_, _| {
            Err(ImageHostError::Rejected {
                status: 403,
                message: "Storage quota exceeded".to_string(),
            })
        });

        // Store has no expectations: nothing may be recorded
        let service = manager(MockAccountRepository::new(), image_config(), host);
        let err = service
            .upload_avatar(ID, AvatarFile::new(vec![1], "image/png"))
            .await
            .unwrap_err();

        match err {
            AppError::Upload(msg) => assert_eq!(msg, "Storage quota exceeded"),
            other => panic!("expected upload error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_upload_network_error_collapses_to_upload_error() {
        let mut host = MockImageHost::new();
        host.expect_upload()
            .returning(|_, _| Err(ImageHostError::Request("connection reset".to_string())));

        let service = manager(MockAccountRepository::new(), image_config(), host);
        let err = service
            .upload_avatar(ID, AvatarFile::new(vec![1], "image/png"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(ref msg) if msg == "connection reset"));
    }

    #[tokio::test]
    async fn test_upload_missing_credentials_is_upload_error() {
        // Host must not be called
        let service = untouched_manager();
        let err = service
            .upload_avatar(ID, AvatarFile::new(vec![1], "image/png"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Upload(ref msg) if msg.contains("publicKey")));
    }
}
