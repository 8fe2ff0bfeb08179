use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Durable log of dispatch attempts, one row per attempt.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AlertMessage::Table)
                    .if_not_exists()
                    .col(string(AlertMessage::Id).primary_key())
                    .col(string(AlertMessage::ShopId))
                    .col(string(AlertMessage::AlertType))
                    .col(text(AlertMessage::Message))
                    .col(
                        ColumnDef::new(AlertMessage::Status)
                            .string()
                            .not_null()
                            .comment("One of 'pending', 'success', 'error'"),
                    )
                    .col(string_null(AlertMessage::ErrorMessage))
                    .col(
                        timestamp_with_time_zone(AlertMessage::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .index(
                        Index::create()
                            .name("idx_alert_message_shop_id")
                            .col(AlertMessage::ShopId),
                    )
                    .index(
                        Index::create()
                            .name("idx_alert_message_created_at")
                            .col(AlertMessage::CreatedAt),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AlertMessage::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum AlertMessage {
    Table,
    Id,
    ShopId,
    AlertType,
    Message,
    Status,
    ErrorMessage,
    CreatedAt,
}
