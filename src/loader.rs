//! Module loading seam
//!
//! [`ModuleSource`] is the pluggable provider the frame loop pulls
//! metadata records and game payloads from. The concrete source shipped
//! with the harness loads dynamic libraries (see [`crate::library`]);
//! tests substitute scripted sources. Whatever the mechanism, a load
//! either yields a complete payload or fails; the caller never installs
//! a partial result.

use std::path::Path;

use crate::error::LoadError;
use crate::metadata::Metadata;

/// A releasable graphics-runtime resource owned by a game payload
pub trait AssetHandle {
    /// Release the underlying runtime resource
    fn unload(&mut self);
}

/// Contract every loaded game module satisfies
pub trait GameModule {
    /// Advance game state by one frame
    fn tick(&mut self);

    /// Issue draw calls for the current frame
    fn draw(&mut self);

    /// Hand over the runtime resources this module allocated at load.
    ///
    /// Called once by the payload wrapper right after a successful load;
    /// modules without runtime resources keep the default.
    fn assets(&mut self) -> Vec<Box<dyn AssetHandle>> {
        Vec::new()
    }
}

/// The active game module together with the runtime resources it owns.
///
/// Exactly one payload is active at a time; a successful reload replaces
/// it wholesale and the superseded payload's assets are released before
/// it is dropped.
pub struct GamePayload {
    module: Box<dyn GameModule>,
    assets: Vec<Box<dyn AssetHandle>>,
}

impl GamePayload {
    /// Wrap a freshly loaded module, collecting its asset handles
    pub fn new(mut module: Box<dyn GameModule>) -> Self {
        let assets = module.assets();
        Self { module, assets }
    }

    pub fn tick(&mut self) {
        self.module.tick();
    }

    pub fn draw(&mut self) {
        self.module.draw();
    }

    /// Number of runtime resources currently held
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    /// Release every held runtime resource, in load order
    pub fn release_assets(&mut self) {
        for asset in &mut self.assets {
            asset.unload();
        }
        self.assets.clear();
    }
}

/// Pluggable source of metadata records and game payloads
pub trait ModuleSource {
    /// Load the metadata descriptor at `path`, observing current on-disk
    /// content
    fn load_metadata(&mut self, path: &Path) -> Result<Metadata, LoadError>;

    /// Load the game module at `path`. Each call must observe the
    /// current content even when the same logical path was loaded
    /// before.
    fn load_game(&mut self, path: &Path) -> Result<GamePayload, LoadError>;
}
