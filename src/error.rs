use thiserror::Error;

/// Failures raised while mapping a single CVE document into the record model.
///
/// All of these are document-scoped: the batch driver quarantines the file
/// and moves on to the next one.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CVE JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("missing cveMetadata or cveId")]
    MissingMetadata,
}

/// A database operation failed mid-transaction. The per-document transaction
/// has already been rolled back by the time this surfaces.
#[derive(Debug, Error)]
#[error("database write failed: {source}")]
pub struct WriteError {
    #[from]
    pub source: sqlx::Error,
}

/// Union of the per-document failure modes the batch driver routes to the
/// quarantine directory.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Write(#[from] WriteError),
}
