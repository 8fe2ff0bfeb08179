//! Per-shop alert flags. One row per shop; no row means every alert type is
//! disabled. Written only by the configuration API, read by the gate.

use sea_orm::entity::prelude::*;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, ToSchema)]
#[sea_orm(table_name = "alert_configuration")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub shop_id: String,
    pub products_create: bool,
    pub products_update: bool,
    pub products_delete: bool,
    pub orders_paid: bool,
    pub customers_create: bool,
    pub customers_update: bool,
    pub customers_delete: bool,
    pub customers_redact: bool,
    pub checkouts_create: bool,
    pub checkouts_update: bool,
    pub inventory_levels_update: bool,
    pub themes_create: bool,
    pub themes_update: bool,
    pub themes_delete: bool,
    pub themes_publish: bool,
    pub shop_update: bool,
    pub system_issue: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
