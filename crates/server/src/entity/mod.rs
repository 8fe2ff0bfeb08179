//! SeaORM entities for the notifier's three tables.

pub mod alert_configuration;
pub mod alert_message;
pub mod receiver_configuration;
