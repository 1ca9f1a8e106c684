use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    db::{DbPool, OrmConn},
    entity::audit_logs::{Column as AuditCol, Entity as AuditLogs, Model as AuditModel},
    error::AppResult,
    routes::params::SortOrder,
};

pub async fn log_audit(
    pool: &DbPool,
    action: &str,
    resource: Option<&str>,
    metadata: Option<Value>,
) -> AppResult<()> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, action, resource, metadata, created_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(action)
    .bind(resource)
    .bind(metadata)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Record an audit entry; failures are logged and otherwise ignored.
pub async fn record(pool: &DbPool, action: &str, resource: &str, metadata: Value) {
    if let Err(err) = log_audit(pool, action, Some(resource), Some(metadata)).await {
        tracing::warn!(error = %err, action, "audit log failed");
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: chrono::DateTime<Utc>,
}

impl From<AuditModel> for AuditEntry {
    fn from(model: AuditModel) -> Self {
        Self {
            id: model.id,
            action: model.action,
            resource: model.resource,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}

pub async fn list_audit_logs(
    orm: &OrmConn,
    sort_order: SortOrder,
    limit: u64,
    offset: u64,
) -> AppResult<(Vec<AuditEntry>, u64)> {
    let finder = match sort_order {
        SortOrder::Asc => AuditLogs::find().order_by_asc(AuditCol::CreatedAt),
        SortOrder::Desc => AuditLogs::find().order_by_desc(AuditCol::CreatedAt),
    };
    let total = finder.clone().count(orm).await?;
    let entries = finder
        .limit(limit)
        .offset(offset)
        .all(orm)
        .await?
        .into_iter()
        .map(AuditEntry::from)
        .collect();
    Ok((entries, total))
}
