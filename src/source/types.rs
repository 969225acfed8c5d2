//! Full-translation source type definitions.

use std::path::PathBuf;

use futures::future::BoxFuture;
use thiserror::Error;

use crate::input::translation::{
    TableParseError,
    TranslationTable,
};
use crate::types::Language;

#[derive(Error, Debug)]
pub enum FetchError {
    /// The source has no full table for the language
    #[error("No full translations available for '{0}'")]
    NotFound(Language),
    /// Error when failing to read a translation file
    #[error("Failed to read translation file {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// Error when a translation file is not a valid table
    #[error("Failed to parse translation file {}: {source}", path.display())]
    Parse {
        /// File that could not be parsed
        path: PathBuf,
        /// Why the content is not a table
        #[source]
        source: TableParseError,
    },
    /// Invalid file discovery pattern
    #[error("Invalid translation file pattern '{pattern}': {message}")]
    Pattern {
        /// The rejected glob
        pattern: String,
        /// Message from the glob compiler
        message: String,
    },
    /// Other generic error
    #[error("Translation fetch failed: {0}")]
    Other(String),
}

/// Asynchronous provider of full translation tables.
///
/// Implementations may hit the network, the file system or an in-memory
/// bundle. The store calls `fetch` at most once per language per session.
pub trait TranslationSource: Send + Sync + 'static {
    /// Fetch the full table for `language`.
    fn fetch(&self, language: Language) -> BoxFuture<'_, Result<TranslationTable, FetchError>>;
}
