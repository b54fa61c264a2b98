use crate::error::{LoadError, Result};
use release_model::Release;
use std::path::Path;

/// Load a reference release from its JSON description
pub async fn load_reference(path: &Path) -> Result<Release> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::ReadFile {
            what: "reference",
            path: path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        what: "reference",
        path: path.to_path_buf(),
        source,
    })
}
