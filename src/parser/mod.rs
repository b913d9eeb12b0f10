//! Parser module — load a man page source from disk.

pub mod refentry;

use crate::error::{Error, Result};
use crate::model::ManPageDoc;
use std::fs;
use std::path::Path;

/// Read and parse one man page source.
pub fn read(path: &Path) -> Result<ManPageDoc> {
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = refentry::parse(path, &content)?;
    tracing::debug!(
        path = %path.display(),
        title = %doc.title,
        section = %doc.section,
        names = doc.names.len(),
        "parsed"
    );
    Ok(doc)
}
