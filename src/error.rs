//! Harness error handling
//!
//! Two failure domains exist: loading a module (`LoadError`) and
//! watching a path for changes (`WatchError`). `HarnessError` wraps both
//! for the crate boundary. Whether a failure is fatal depends on when it
//! happens, not on its kind: during bootstrap there is no previous state
//! to fall back to, so everything is fatal; once the loop runs, load
//! failures keep the previous state active and watch failures degrade
//! that path to no-further-hot-reload.

use std::path::PathBuf;

use thiserror::Error;

/// Type alias for harness results
pub type HarnessResult<T> = Result<T, HarnessError>;

/// A module failed to resolve or did not satisfy its contract
#[derive(Debug, Error)]
pub enum LoadError {
    /// The path did not resolve to readable content
    #[error("module at {} did not resolve: {source}", path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content did not parse in the expected format
    #[error("metadata at {} failed to parse: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    /// The parsed content violates the module contract
    #[error("module at {} is malformed: {reason}", path.display())]
    Shape { path: PathBuf, reason: String },

    /// The dynamic library could not be opened
    #[error("library at {} failed to load: {reason}", path.display())]
    Library { path: PathBuf, reason: String },

    /// A required export is missing from the library
    #[error("module at {} is missing symbol {symbol}: {reason}", path.display())]
    Symbol {
        path: PathBuf,
        symbol: &'static str,
        reason: String,
    },

    /// The module targets a different harness ABI
    #[error("module at {} targets API version {got}, expected {expected}", path.display())]
    ApiVersion { path: PathBuf, got: u32, expected: u32 },

    /// The module's constructor returned nothing
    #[error("module at {} returned a null instance", path.display())]
    NullInstance { path: PathBuf },
}

/// The underlying watch mechanism failed
#[derive(Debug, Error)]
pub enum WatchError {
    /// The OS watch could not be established
    #[error("failed to start watching {}: {reason}", path.display())]
    Init { path: PathBuf, reason: String },

    /// The watch stopped delivering events and will not recover
    #[error("watch on {} closed unexpectedly", path.display())]
    Closed { path: PathBuf },
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Watch(#[from] WatchError),
}
