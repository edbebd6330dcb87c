//! Mirrors rewritten documents into the output tree.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures::future::try_join_all;
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{Error, Result};

/// Write every document under `output_root`, mirroring its path relative to
/// `source_root` and preserving directory structure.
///
/// Documents are grouped by destination directory. Each directory is ensured
/// once (idempotent, ancestors included) and acts as the readiness barrier
/// for the writes inside it; files within one directory are written
/// concurrently once it is ready, and distinct directories proceed
/// independently. The first failure fails the whole operation; there is no
/// partial-success reporting and no retry.
pub async fn write_documents(
    documents: &FxHashMap<PathBuf, String>,
    output_root: &Path,
    source_root: &Path,
) -> Result<()> {
    let mut groups: BTreeMap<PathBuf, Vec<(PathBuf, &String)>> = BTreeMap::new();

    for (path, markup) in documents {
        let relative = path.strip_prefix(source_root).map_err(|_| {
            Error::InvalidOutputPath(format!(
                "document '{}' lies outside the analysis root '{}'",
                path.display(),
                source_root.display()
            ))
        })?;
        let destination = output_root.join(relative);
        let directory = destination.parent().unwrap_or(output_root).to_path_buf();
        groups
            .entry(directory)
            .or_default()
            .push((destination, markup));
    }

    try_join_all(groups.into_iter().map(|(directory, files)| async move {
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            Error::WriteFailure(format!(
                "failed to create output directory '{}': {e}",
                directory.display()
            ))
        })?;
        try_join_all(files.into_iter().map(|(destination, markup)| async move {
            debug!(file = %destination.display(), "writing document");
            tokio::fs::write(&destination, markup).await.map_err(|e| {
                Error::WriteFailure(format!("failed to write '{}': {e}", destination.display()))
            })
        }))
        .await?;
        Ok::<_, Error>(())
    }))
    .await?;

    Ok(())
}
