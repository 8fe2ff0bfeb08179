//! Durable alert record store.
//!
//! Owns every write to the `alert_message` table on behalf of the
//! dispatcher. Raw status strings are normalized to [`AlertStatus`] at this
//! boundary; nothing outside the store builds status values by hand.

use crate::entity::alert_message;
use crate::event::EventType;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use std::fmt;
use std::sync::Arc;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertStatus {
    Pending,
    Success,
    Error,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "success" => Some(Self::Success),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct AlertStore {
    db: Arc<DatabaseConnection>,
}

impl AlertStore {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Start a new dispatch attempt in `pending`.
    pub async fn create(
        &self,
        shop_id: &str,
        event: &EventType,
        message: &str,
    ) -> Result<alert_message::Model, DbErr> {
        let record = alert_message::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            shop_id: Set(shop_id.to_string()),
            alert_type: Set(event.as_topic().to_string()),
            message: Set(message.to_string()),
            status: Set(AlertStatus::Pending.as_str().to_string()),
            error_message: Set(None),
            created_at: Set(OffsetDateTime::now_utc()),
        };
        record.insert(self.db.as_ref()).await
    }

    /// Resend transition: put an existing record back to `pending` and clear
    /// the previous error detail. Returns `None` for an unknown id.
    pub async fn mark_pending(&self, id: &str) -> Result<Option<alert_message::Model>, DbErr> {
        let Some(record) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut active: alert_message::ActiveModel = record.into();
        active.status = Set(AlertStatus::Pending.as_str().to_string());
        active.error_message = Set(None);
        active.update(self.db.as_ref()).await.map(Some)
    }

    /// Transition a record to a terminal status. Last write wins; repeating
    /// the same transition is harmless.
    pub async fn update_status(
        &self,
        id: &str,
        status: AlertStatus,
        error: Option<String>,
    ) -> Result<Option<alert_message::Model>, DbErr> {
        let Some(record) = self.find_by_id(id).await? else {
            return Ok(None);
        };
        let mut active: alert_message::ActiveModel = record.into();
        active.status = Set(status.as_str().to_string());
        active.error_message = Set(error);
        active.update(self.db.as_ref()).await.map(Some)
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<alert_message::Model>, DbErr> {
        alert_message::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Newest-first page of a shop's alert history. `page` is 1-based; the
    /// total counts every row for the shop regardless of the window.
    pub async fn list_by_shop(
        &self,
        shop_id: &str,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<alert_message::Model>, u64), DbErr> {
        let paginator = alert_message::Entity::find()
            .filter(alert_message::Column::ShopId.eq(shop_id))
            .order_by_desc(alert_message::Column::CreatedAt)
            .paginate(self.db.as_ref(), page_size.max(1));
        let total = paginator.num_items().await?;
        let records = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((records, total))
    }
}
