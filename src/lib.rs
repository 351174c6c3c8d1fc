//! hotloop: live-reload harness for a real-time render loop.
//!
//! Watches a metadata descriptor and a game-logic module and hot-swaps
//! them into a running 60 Hz frame loop without restarting the process.
//! The harness owns change detection, metadata diffing, and the flagged
//! reconciliation that orders resize/rename/reload side effects between
//! frames; the actual windowing stack sits behind the
//! [`GraphicsRuntime`] trait and game content behind [`GameModule`].

pub mod constants;
pub mod error;
pub mod flags;
pub mod library;
pub mod loader;
pub mod metadata;
pub mod runtime;
pub mod session;
pub mod watcher;

use std::path::PathBuf;
use std::time::Duration;

pub use error::{HarnessError, HarnessResult, LoadError, WatchError};
pub use flags::{Flag, ReloadFlags};
pub use library::LibrarySource;
pub use loader::{AssetHandle, GameModule, GamePayload, ModuleSource};
pub use metadata::{Metadata, MetadataDiff};
pub use runtime::{Color, GraphicsRuntime, HeadlessRuntime};
pub use session::{FrameTicker, ReloadSession};
pub use watcher::{FileWatcher, WatchEvent, WatchEventKind};

/// Harness configuration
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Path of the metadata descriptor. The game entry point comes from
    /// the descriptor itself and may change between reloads; this path
    /// never does.
    pub metadata_path: PathBuf,

    /// Frame rate the loop is paced to
    pub target_fps: u32,

    /// Debounce window applied to change notifications
    pub debounce: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            metadata_path: PathBuf::from("metadata.toml"),
            target_fps: constants::frame::TARGET_FPS,
            debounce: Duration::from_millis(constants::watch::DEFAULT_DEBOUNCE_MS),
        }
    }
}
