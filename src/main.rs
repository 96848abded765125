use anyhow::Context;
use env_logger::Env;
use pocketbudget::{config::Config, front, migration, store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::try_init_from_env(Env::default().default_filter_or("pocketbudget=debug"))
        .context("cannot init logger")?;

    let config = Config::from_env()?;
    log::debug!("{:?}", config);

    let pool = store::connect(&config).await?;
    migration::migrate(&pool, &config.migrations_dir).await?;
    front::start_web_server(pool, &config).await
}
