use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Per-shop delivery channel credentials. Chat ids are stored as one
/// comma-separated column to match the admin form's single text field.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReceiverConfiguration::Table)
                    .if_not_exists()
                    .col(string(ReceiverConfiguration::ShopId).primary_key())
                    .col(
                        boolean(ReceiverConfiguration::IsTelegramEnabled)
                            .default(false)
                            .not_null(),
                    )
                    .col(string_null(ReceiverConfiguration::TelegramBotToken))
                    .col(string_null(ReceiverConfiguration::TelegramReceiverChatIds))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReceiverConfiguration::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum ReceiverConfiguration {
    Table,
    ShopId,
    IsTelegramEnabled,
    TelegramBotToken,
    TelegramReceiverChatIds,
}
