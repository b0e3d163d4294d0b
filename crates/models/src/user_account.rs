//! `user_account` table: one row per registered username.

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_account")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn new_row(username: &str, password: &str) -> Result<ActiveModel, ModelError> {
    if username.is_empty() {
        return Err(ModelError::Validation("username required".into()));
    }
    Ok(ActiveModel {
        username: Set(username.to_string()),
        password: Set(password.to_string()),
        created_at: Set(Utc::now().into()),
    })
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(username.to_string()).one(db).await?)
}

/// Insert the row unless the username exists. Returns `true` when a row was written.
pub async fn insert_if_absent<C: ConnectionTrait>(db: &C, username: &str, password: &str) -> Result<bool, ModelError> {
    let am = new_row(username, password)?;
    let rows = Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Username).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(rows > 0)
}

/// Insert or overwrite the password for `username`.
pub async fn upsert<C: ConnectionTrait>(db: &C, username: &str, password: &str) -> Result<(), ModelError> {
    let am = new_row(username, password)?;
    Entity::insert(am)
        .on_conflict(OnConflict::column(Column::Username).update_column(Column::Password).to_owned())
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;

    async fn sqlite() -> anyhow::Result<sea_orm::DatabaseConnection> {
        let cfg = configs::DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
        let db = crate::db::connect_with_config(&cfg).await?;
        migration::Migrator::up(&db, None).await?;
        Ok(db)
    }

    #[tokio::test]
    async fn insert_if_absent_keeps_first_row() -> anyhow::Result<()> {
        let db = sqlite().await?;
        assert!(insert_if_absent(&db, "alice", "pw1").await?);
        assert!(!insert_if_absent(&db, "alice", "pw2").await?);
        let row = find_by_username(&db, "alice").await?.unwrap();
        assert_eq!(row.password, "pw1");
        Ok(())
    }

    #[tokio::test]
    async fn upsert_overwrites_password() -> anyhow::Result<()> {
        let db = sqlite().await?;
        upsert(&db, "bob", "old").await?;
        upsert(&db, "bob", "new").await?;
        assert_eq!(find_by_username(&db, "bob").await?.unwrap().password, "new");
        assert!(find_by_username(&db, "carol").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn empty_username_is_rejected() -> anyhow::Result<()> {
        let db = sqlite().await?;
        assert!(matches!(insert_if_absent(&db, "", "pw").await, Err(ModelError::Validation(_))));
        Ok(())
    }
}
