use std::path::PathBuf;

use crate::block::BlockId;

/// Errors from id-addressed edits on a [`Document`](crate::Document).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("block `{0}` not found")]
    NotFound(BlockId),

    #[error("duplicate block id `{0}`")]
    DuplicateId(BlockId),

    /// A columns block was aimed at a columns zone.
    #[error("columns block `{0}` cannot be placed inside another columns block")]
    NestedColumns(BlockId),

    #[error("block `{0}` is not a columns block")]
    NotColumns(BlockId),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("heading level must be 1, 2 or 3, got {0}")]
pub struct InvalidHeadingLevel(pub u8);
