use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Replace the telegram-only boolean with a named platform column. Existing
/// rows keep `is_telegram_enabled`; readers treat an explicit platform name
/// as authoritative and fall back to the boolean for old rows.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ReceiverConfiguration::Table)
                    .add_column(string_null(ReceiverConfiguration::ReceiverPlatform))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(ReceiverConfiguration::Table)
                    .drop_column(ReceiverConfiguration::ReceiverPlatform)
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum ReceiverConfiguration {
    Table,
    ReceiverPlatform,
}
