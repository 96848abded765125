use std::{env, path::PathBuf, str::FromStr};

use anyhow::Context;

const PREFIX: &str = "POCKETBUDGET_";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub max_connections: u32,
    pub templates_dir: PathBuf,
    pub public_dir: PathBuf,
    pub migrations_dir: PathBuf,
    /// Label printed in front of limits in budget notices.
    pub currency: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://budget.db".to_string(),
            listen_addr: "0.0.0.0:3000".to_string(),
            max_connections: 5,
            templates_dir: PathBuf::from("./src/front/templates"),
            public_dir: PathBuf::from("./src/front/public"),
            migrations_dir: PathBuf::from("./migrations"),
            currency: "BND".to_string(),
        }
    }
}

impl Config {
    /// Reads `POCKETBUDGET_*` variables, missing ones keep their default.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut c = Self::default();
        if let Some(v) = var("DATABASE_URL") {
            c.database_url = v;
        }
        if let Some(v) = var("LISTEN_ADDR") {
            c.listen_addr = v;
        }
        if let Some(v) = parsed("MAX_CONNECTIONS")? {
            c.max_connections = v;
        }
        if let Some(v) = var("TEMPLATES_DIR") {
            c.templates_dir = v.into();
        }
        if let Some(v) = var("PUBLIC_DIR") {
            c.public_dir = v.into();
        }
        if let Some(v) = var("MIGRATIONS_DIR") {
            c.migrations_dir = v.into();
        }
        if let Some(v) = var("CURRENCY") {
            c.currency = v;
        }
        Ok(c)
    }
}

fn var(name: &str) -> Option<String> {
    env::var(format!("{PREFIX}{name}"))
        .ok()
        .filter(|v| !v.trim().is_empty())
}

fn parsed<T>(name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var(name)
        .map(|v| {
            v.trim()
                .parse()
                .with_context(|| format!("{PREFIX}{name} has invalid value '{v}'"))
        })
        .transpose()
}
