use config::Config;
use sea_orm_migration::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    // Take DATABASE_URL from the environment when set, otherwise fall back
    // to the service's config.yaml so both binaries share one source.
    if env::var("DATABASE_URL").is_err() {
        let settings = Config::builder()
            .add_source(config::File::with_name("config.yaml"))
            .build()
            .unwrap();
        if let Ok(url) = settings.get_string("database_url") {
            env::set_var("DATABASE_URL", url);
        }
    }
    cli::run_cli(migration::Migrator).await;
}
