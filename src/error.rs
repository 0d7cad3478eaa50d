//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for docsearch application code.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the binary and server setup paths.
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced to callers of the lookup engine.
///
/// Zero matches is never an error; it is an empty result set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// A query was issued before any index was built.
    #[error("symbol index has not been built yet; load search-index files first")]
    NotBuilt,
    /// A selection referred to a position outside the presented results.
    #[error("no presented result at position {position} ({available} available)")]
    NoSuchResult { position: usize, available: usize },
}

/// Error returned when reading a search-index file fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file does not contain a JSON array of entries.
    #[error("no search-index array found in {}", path.display())]
    MissingArray { path: PathBuf },
    /// The array could not be decoded into entries.
    #[error("failed to parse entries in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Walking a documentation directory failed.
    #[error("failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: ignore::Error,
    },
}
