//! Environment/runtime helpers
//!
//! Sanity checks run once at startup, before the database is opened.

use std::path::PathBuf;

use tracing::info;

/// File path behind a SQLite connection URL, if it names one.
///
/// `sqlite:///tmp/a.db?mode=rwc` → `/tmp/a.db`, `sqlite:data/a.db` → `data/a.db`.
/// In-memory databases and non-SQLite URLs yield `None`.
pub fn sqlite_file_path(url: &str) -> Option<PathBuf> {
    let lower = url.to_lowercase();
    if !lower.starts_with("sqlite:") {
        return None;
    }
    let rest = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Ensure the directory holding a SQLite database file exists.
pub async fn ensure_database_dir(url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(url) else {
        return Ok(());
    };
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if tokio::fs::metadata(parent).await.is_err() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
        info!(dir = %parent.display(), "created database directory");
    }
    Ok(())
}
