use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Per-shop event flags. One row per shop; a missing row means every alert
/// type is disabled.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertConfiguration::Table)
                    .if_not_exists()
                    .col(string(AlertConfiguration::ShopId).primary_key())
                    .col(boolean(AlertConfiguration::ProductsCreate).default(false))
                    .col(boolean(AlertConfiguration::ProductsUpdate).default(false))
                    .col(boolean(AlertConfiguration::ProductsDelete).default(false))
                    .col(boolean(AlertConfiguration::OrdersPaid).default(false))
                    .col(boolean(AlertConfiguration::CustomersCreate).default(false))
                    .col(boolean(AlertConfiguration::CustomersUpdate).default(false))
                    .col(boolean(AlertConfiguration::CustomersDelete).default(false))
                    .col(boolean(AlertConfiguration::CustomersRedact).default(false))
                    .col(boolean(AlertConfiguration::CheckoutsCreate).default(false))
                    .col(boolean(AlertConfiguration::CheckoutsUpdate).default(false))
                    .col(boolean(AlertConfiguration::InventoryLevelsUpdate).default(false))
                    .col(boolean(AlertConfiguration::ThemesCreate).default(false))
                    .col(boolean(AlertConfiguration::ThemesUpdate).default(false))
                    .col(boolean(AlertConfiguration::ThemesDelete).default(false))
                    .col(boolean(AlertConfiguration::ThemesPublish).default(false))
                    .col(boolean(AlertConfiguration::ShopUpdate).default(false))
                    .col(boolean(AlertConfiguration::SystemIssue).default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertConfiguration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AlertConfiguration {
    Table,
    ShopId,
    ProductsCreate,
    ProductsUpdate,
    ProductsDelete,
    OrdersPaid,
    CustomersCreate,
    CustomersUpdate,
    CustomersDelete,
    CustomersRedact,
    CheckoutsCreate,
    CheckoutsUpdate,
    InventoryLevelsUpdate,
    ThemesCreate,
    ThemesUpdate,
    ThemesDelete,
    ThemesPublish,
    ShopUpdate,
    SystemIssue,
}
