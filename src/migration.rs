use std::{fs, path::Path, path::PathBuf};

use anyhow::{anyhow, Context};
use sqlx::SqlitePool;

/// Runs every `NNN_name.sql` file of `dir` in numeric order.
///
/// Migrations are written to be idempotent and are applied on every start.
pub async fn migrate(p: &SqlitePool, dir: &Path) -> anyhow::Result<()> {
    let mut migration_files: Vec<(usize, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("cannot read {}", dir.display()))? {
        let entry = entry?;

        if !entry.metadata()?.is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "sql") {
            continue;
        }

        migration_files.push((migration_number(&path)?, path));
    }

    migration_files.sort_by_key(|v| v.0);

    log::info!("starting migration of {} files", migration_files.len());
    for (_, path) in &migration_files {
        let content = fs::read_to_string(path)?;
        log::debug!("migrating {}", path.display());
        sqlx::raw_sql(&content)
            .execute(p)
            .await
            .with_context(|| format!("migration {} failed", path.display()))?;
    }

    log::info!("migration end");
    Ok(())
}

fn migration_number(path: &Path) -> anyhow::Result<usize> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("bad migration file name {}", path.display()))?;
    let (number, _) = name
        .split_once('_')
        .ok_or_else(|| anyhow!("migration {name} should look like 001_name.sql"))?;
    number
        .parse()
        .with_context(|| format!("migration {name} should start with a number"))
}
