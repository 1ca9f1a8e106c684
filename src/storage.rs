//! Durable key/value storage for client-side state (the kiosk's equivalent
//! of browser local storage).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveValue::Set, EntityTrait, sea_query::OnConflict};

use crate::{
    db::OrmConn,
    entity::local_storage::{ActiveModel as StorageActive, Column as StorageCol, Entity as LocalStorage},
    error::AppResult,
};

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// `local_storage` table backed store.
#[derive(Clone)]
pub struct SqlKeyValueStore {
    orm: OrmConn,
}

impl SqlKeyValueStore {
    pub fn new(orm: OrmConn) -> Self {
        Self { orm }
    }
}

#[async_trait]
impl KeyValueStore for SqlKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let entry = LocalStorage::find_by_id(key.to_string())
            .one(&self.orm)
            .await?;
        Ok(entry.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let entry = StorageActive {
            storage_key: Set(key.to_string()),
            value: Set(value.to_string()),
            updated_at: Set(Utc::now()),
        };

        LocalStorage::insert(entry)
            .on_conflict(
                OnConflict::column(StorageCol::StorageKey)
                    .update_columns([StorageCol::Value, StorageCol::UpdatedAt])
                    .to_owned(),
            )
            .exec(&self.orm)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        LocalStorage::delete_by_id(key.to_string())
            .exec(&self.orm)
            .await?;
        Ok(())
    }
}
