//! Optional cleanup of generated artifacts.
//!
//! Artifacts are kept forever unless `ARTIFACT_RETENTION_HOURS` is set, in
//! which case a background worker periodically removes expired files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::common::XLSX_EXTENSION;

/// Delete `<prefix>*.xlsx` files in `dir` whose modification time is older
/// than `max_age`. Returns the number of removed files.
pub fn sweep_expired(dir: &Path, prefix: &str, max_age: Duration) -> io::Result<usize> {
    let now = SystemTime::now();
    let mut removed = 0;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !is_artifact(&path, prefix) {
            continue;
        }

        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }

        let age = metadata
            .modified()
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .unwrap_or_default();

        if age >= max_age {
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => log::warn!("failed to remove expired artifact {}: {}", path.display(), e),
            }
        }
    }

    Ok(removed)
}

fn is_artifact(path: &Path, prefix: &str) -> bool {
    let has_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(prefix));
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(XLSX_EXTENSION));
    has_prefix && has_extension
}

/// Starts the background retention worker.
pub fn spawn_sweeper(dir: PathBuf, prefix: String, max_age: Duration) {
    let period = (max_age / 4).clamp(Duration::from_secs(60), Duration::from_secs(3600));

    tokio::spawn(async move {
        log::info!(
            "Artifact retention worker started (max age {}s, every {}s)",
            max_age.as_secs(),
            period.as_secs()
        );
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let dir = dir.clone();
            let prefix = prefix.clone();
            let result =
                tokio::task::spawn_blocking(move || sweep_expired(&dir, &prefix, max_age)).await;
            match result {
                Ok(Ok(0)) => {}
                Ok(Ok(count)) => log::info!("Removed {} expired artifacts", count),
                Ok(Err(e)) => log::error!("Artifact retention sweep failed: {}", e),
                Err(e) => log::error!("Artifact retention worker panicked: {}", e),
            }
        }
    });
}
