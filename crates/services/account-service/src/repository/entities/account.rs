//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{Account, AccountId};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    /// 24-character hex identifier
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub profile: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity.
///
/// Fails only if the stored identifier is not a valid hex token.
impl TryFrom<Model> for Account {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let id = AccountId::parse(&model.id).map_err(|_| {
            AppError::internal(format!("stored account id '{}' is corrupt", model.id))
        })?;

        Ok(Account {
            id,
            email: model.email,
            username: model.username,
            password: model.password,
            role: model.role,
            avatar_url: model.avatar_url,
            profile: model.profile,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
