//! Error types for reading man page sources and collecting rules.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: not well-formed XML: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },

    #[error("{}: missing {field}", path.display())]
    Schema { path: PathBuf, field: &'static str },

    #[error(
        "refmeta and refnamediv disagree: {}: title '{title}' but first name '{name}'",
        path.display()
    )]
    TitleMismatch {
        path: PathBuf,
        title: String,
        name: String,
    },

    #[error(
        "duplicate page name {alias}: declared by {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateAlias {
        alias: String,
        first: PathBuf,
        second: PathBuf,
    },
}
