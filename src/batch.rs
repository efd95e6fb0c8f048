use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::db::{self, DbPool};
use crate::error::IngestError;
use crate::mapper::CveMapper;

/// Aggregate counters for one batch run.
#[derive(Debug, Default)]
pub struct BatchStats {
    pub total_files: usize,
    pub ingested: usize,
    pub quarantined: usize,
}

impl std::fmt::Display for BatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} files ({} ingested, {} quarantined)",
            self.total_files, self.ingested, self.quarantined
        )
    }
}

/// Ingest every `*.json` document under `input_dir`, recursively, in path
/// order. A document that fails to map or write is moved to the quarantine
/// directory and logged; the batch itself keeps going.
pub async fn run_batch(
    pool: &DbPool,
    input_dir: &Path,
    quarantine_dir: &Path,
) -> Result<BatchStats> {
    let documents = discover_documents(input_dir)?;
    let mut stats = BatchStats {
        total_files: documents.len(),
        ..Default::default()
    };
    info!("📦 Found {} CVE documents under {}", stats.total_files, input_dir.display());

    for path in &documents {
        match process_document(pool, path).await {
            Ok(cve_id) => {
                stats.ingested += 1;
                info!(
                    "✅ Ingested {} ({}/{})",
                    cve_id, stats.ingested, stats.total_files
                );
            }
            Err(err) => {
                stats.quarantined += 1;
                warn!(
                    "⚠️ Quarantining {} ({}/{}): {err}",
                    path.display(),
                    stats.quarantined,
                    stats.total_files
                );
                // Bookkeeping trouble must not take down the batch.
                if let Err(move_err) = quarantine_file(path, quarantine_dir, &err) {
                    warn!("failed to quarantine {}: {move_err:#}", path.display());
                }
            }
        }
    }

    info!("🏁 Batch complete: {stats}");
    Ok(stats)
}

/// All `*.json` files under the input root, sorted for a deterministic
/// processing order.
fn discover_documents(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = input_dir.join("**").join("*.json");
    let pattern = pattern
        .to_str()
        .with_context(|| format!("input path is not valid UTF-8: {}", input_dir.display()))?;

    let mut documents: Vec<PathBuf> = glob::glob(pattern)
        .with_context(|| format!("invalid glob pattern: {pattern}"))?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(err) => {
                warn!("skipping unreadable path during discovery: {err}");
                None
            }
        })
        .collect();
    documents.sort();
    Ok(documents)
}

/// Map and persist a single document, returning its CVE id for logging.
async fn process_document(pool: &DbPool, path: &Path) -> Result<String, IngestError> {
    let record = CveMapper::map_file(path)?;
    let cve_id = record
        .cve_metadata
        .as_ref()
        .and_then(|m| m.cve_id.clone())
        .unwrap_or_else(|| "<unknown>".to_string());
    db::insert_record(pool, &record).await?;
    Ok(cve_id)
}

/// Move a failed document into the quarantine directory and append one line
/// to its failure log. Rename is attempted first; a copy-and-remove fallback
/// covers quarantine directories on a different filesystem.
fn quarantine_file(path: &Path, quarantine_dir: &Path, err: &IngestError) -> Result<()> {
    fs::create_dir_all(quarantine_dir)
        .with_context(|| format!("failed to create quarantine dir {}", quarantine_dir.display()))?;

    let file_name = path
        .file_name()
        .with_context(|| format!("document has no file name: {}", path.display()))?;
    let target = quarantine_dir.join(file_name);

    if fs::rename(path, &target).is_err() {
        fs::copy(path, &target)
            .with_context(|| format!("failed to copy {} into quarantine", path.display()))?;
        fs::remove_file(path)
            .with_context(|| format!("failed to remove {} after copy", path.display()))?;
    }

    let mut log = OpenOptions::new()
        .create(true)
        .append(true)
        .open(quarantine_dir.join("failures.log"))
        .context("failed to open quarantine failure log")?;
    writeln!(log, "{}\t{}\t{err}", Utc::now().to_rfc3339(), path.display())
        .context("failed to append to quarantine failure log")?;

    Ok(())
}
