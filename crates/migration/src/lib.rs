pub use sea_orm_migration::prelude::*;

mod m20250903_120000_add_alert_configuration;
mod m20250903_121500_add_receiver_configuration;
mod m20250910_090000_add_alert_message;
mod m20260115_100000_add_receiver_platform;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250903_120000_add_alert_configuration::Migration),
            Box::new(m20250903_121500_add_receiver_configuration::Migration),
            Box::new(m20250910_090000_add_alert_message::Migration),
            Box::new(m20260115_100000_add_receiver_platform::Migration),
        ]
    }
}
