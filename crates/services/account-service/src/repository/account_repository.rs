//! Account repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QuerySelect, Set,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::AppResult;
use domain::{Account, AccountId, AccountPatch, DeleteOutcome, NewAccount, UpdateOutcome};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Store handle scoped to the account collection.
///
/// Each method issues exactly one query. Absence is reported through
/// `Option`, empty vectors or zero counts, never as an error.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account and return it with its assigned identifier
    async fn insert(&self, account: NewAccount) -> AppResult<Account>;

    /// All accounts, unpaginated
    async fn find_all(&self) -> AppResult<Vec<Account>>;

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>>;

    async fn find_by_role(&self, role: &str) -> AppResult<Vec<Account>>;

    async fn exists_by_id(&self, id: AccountId) -> AppResult<bool>;

    async fn exists_by_email(&self, email: &str) -> AppResult<bool>;

    /// Permanently remove the account
    async fn delete_by_id(&self, id: AccountId) -> AppResult<DeleteOutcome>;

    /// Merge the patch into the stored account
    async fn update_by_id(&self, id: AccountId, patch: AccountPatch) -> AppResult<UpdateOutcome>;

    /// Select only the stored password hash
    async fn find_password_hash(&self, id: AccountId) -> AppResult<Option<String>>;
}

/// SeaORM implementation of [`AccountRepository`]
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn to_accounts(models: Vec<account::Model>) -> AppResult<Vec<Account>> {
        models.into_iter().map(Account::try_from).collect()
    }
}

#[async_trait]
impl AccountRepository for AccountStore {
    async fn insert(&self, account: NewAccount) -> AppResult<Account> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(AccountId::generate().to_hex()),
            email: Set(account.email),
            username: Set(account.username),
            password: Set(account.password),
            role: Set(account.role),
            avatar_url: Set(account.avatar_url),
            profile: Set(account.profile),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await?;
        tracing::debug!(account_id = %model.id, "Account inserted");
        Account::try_from(model)
    }

    async fn find_all(&self) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find().all(&self.db).await?;
        Self::to_accounts(models)
    }

    async fn find_by_id(&self, id: AccountId) -> AppResult<Option<Account>> {
        AccountEntity::find_by_id(id.to_hex())
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        AccountEntity::find()
            .filter(account::Column::Username.eq(username))
            .one(&self.db)
            .await?
            .map(Account::try_from)
            .transpose()
    }

    async fn find_by_role(&self, role: &str) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .filter(account::Column::Role.eq(role))
            .all(&self.db)
            .await?;
        Self::to_accounts(models)
    }

    async fn exists_by_id(&self, id: AccountId) -> AppResult<bool> {
        let count = AccountEntity::find()
            .filter(account::Column::Id.eq(id.to_hex()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let count = AccountEntity::find()
            .filter(account::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    async fn delete_by_id(&self, id: AccountId) -> AppResult<DeleteOutcome> {
        let result = AccountEntity::delete_by_id(id.to_hex())
            .exec(&self.db)
            .await?;

        Ok(DeleteOutcome {
            deleted_count: result.rows_affected,
        })
    }

    async fn update_by_id(&self, id: AccountId, patch: AccountPatch) -> AppResult<UpdateOutcome> {
        let mut active = ActiveModel::new();

        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(username) = patch.username {
            active.username = Set(username);
        }
        if let Some(password) = patch.password {
            active.password = Set(password);
        }
        if let Some(role) = patch.role {
            active.role = Set(role);
        }
        if let Some(avatar_url) = patch.avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        if let Some(profile) = patch.profile {
            active.profile = Set(profile);
        }
        // Every matched row is rewritten, so matched == modified
        active.updated_at = Set(chrono::Utc::now());

        let result = AccountEntity::update_many()
            .set(active)
            .filter(account::Column::Id.eq(id.to_hex()))
            .exec(&self.db)
            .await?;

        Ok(UpdateOutcome {
            matched_count: result.rows_affected,
            modified_count: result.rows_affected,
        })
    }

    async fn find_password_hash(&self, id: AccountId) -> AppResult<Option<String>> {
        let hash = AccountEntity::find_by_id(id.to_hex())
            .select_only()
            .column(account::Column::Password)
            .into_tuple::<String>()
            .one(&self.db)
            .await?;
        Ok(hash)
    }
}
