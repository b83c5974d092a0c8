//! Recovered triples as a pretty-printed JSON file.

use kg_types::Triple;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Write `triples` to `path` as an array of 3-element arrays, replacing any existing file.
pub async fn save_triples(path: &Path, triples: &[Triple]) -> Result<(), PersistError> {
    let mut json = serde_json::to_string_pretty(triples)?;
    json.push('\n');
    tokio::fs::write(path, json).await?;
    tracing::debug!(path = %path.display(), triples = triples.len(), "saved triples");
    Ok(())
}

pub async fn load_triples(path: &Path) -> Result<Vec<Triple>, PersistError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}
