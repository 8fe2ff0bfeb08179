//! Per-shop delivery channel credentials.
//!
//! `receiver_platform` names the selected channel ("telegram", "email",
//! "slack"). Rows written before that column existed carry only
//! `is_telegram_enabled`; the gate resolves the precedence in one place,
//! see [`crate::gate`].

use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "receiver_configuration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub shop_id: String,
    pub is_telegram_enabled: bool,
    #[serde(skip_serializing)]
    pub telegram_bot_token: Option<String>,
    pub telegram_receiver_chat_ids: Option<String>, // comma-separated, ordered
    pub receiver_platform: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
