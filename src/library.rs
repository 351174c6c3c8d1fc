//! Dynamic-library module source
//!
//! Game modules are compiled as dynamic libraries exporting a small C
//! ABI: `game_api_version`, `game_create`, and `game_destroy`. The OS
//! loader caches libraries by path, so a straight re-open of a rebuilt
//! module would hand back the stale mapping; every load therefore stages
//! the file under a counter-prefixed name in a scratch directory first,
//! making each load a distinct resource.
//!
//! A module crate looks like this:
//!
//! ```ignore
//! use hotloop::GameModule;
//!
//! struct MyGame;
//!
//! impl GameModule for MyGame {
//!     fn tick(&mut self) { /* advance state */ }
//!     fn draw(&mut self) { /* issue draw calls */ }
//! }
//!
//! #[no_mangle]
//! pub extern "C" fn game_api_version() -> u32 {
//!     1
//! }
//!
//! #[no_mangle]
//! pub extern "C" fn game_create() -> *mut dyn GameModule {
//!     Box::into_raw(Box::new(MyGame)) as *mut dyn GameModule
//! }
//!
//! #[no_mangle]
//! pub unsafe extern "C" fn game_destroy(instance: *mut dyn GameModule) {
//!     if !instance.is_null() {
//!         let _ = Box::from_raw(instance);
//!     }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use libloading::Library;

use crate::constants::module_api;
use crate::error::LoadError;
use crate::loader::{AssetHandle, GameModule, GamePayload, ModuleSource};
use crate::metadata::{self, Metadata};

/// Function types for game module entry points
pub type GameApiVersionFn = unsafe extern "C" fn() -> u32;
pub type GameCreateFn = unsafe extern "C" fn() -> *mut dyn GameModule;
pub type GameDestroyFn = unsafe extern "C" fn(*mut dyn GameModule);

/// A game module instance held open together with its library.
///
/// The instance points into the library's mapping, so it is destroyed
/// first; the library field drops after and unmaps.
struct LoadedGame {
    instance: *mut dyn GameModule,
    destroy_fn: GameDestroyFn,
    _library: Library,
}

impl GameModule for LoadedGame {
    fn tick(&mut self) {
        unsafe { (*self.instance).tick() }
    }

    fn draw(&mut self) {
        unsafe { (*self.instance).draw() }
    }

    fn assets(&mut self) -> Vec<Box<dyn AssetHandle>> {
        unsafe { (*self.instance).assets() }
    }
}

impl Drop for LoadedGame {
    fn drop(&mut self) {
        unsafe { (self.destroy_fn)(self.instance) };
    }
}

/// Module source backed by dynamic libraries on disk
pub struct LibrarySource {
    /// Scratch directory holding cache-busted library copies
    staging_dir: PathBuf,

    /// Monotonic counter making every staged copy a distinct resource
    reload_counter: u64,
}

impl LibrarySource {
    /// Create a source staging into the system temp directory
    pub fn new() -> Result<Self, LoadError> {
        Self::with_staging_dir(std::env::temp_dir().join("hotloop_modules"))
    }

    /// Create a source staging into `dir`
    pub fn with_staging_dir(dir: impl Into<PathBuf>) -> Result<Self, LoadError> {
        let staging_dir = dir.into();
        fs::create_dir_all(&staging_dir).map_err(|source| LoadError::Resolve {
            path: staging_dir.clone(),
            source,
        })?;

        Ok(Self {
            staging_dir,
            reload_counter: 0,
        })
    }

    /// Copy the module to a fresh staged name so the OS loader treats
    /// this load as a new library
    fn stage(&mut self, path: &Path) -> Result<PathBuf, LoadError> {
        self.reload_counter += 1;

        let file_name = path.file_name().ok_or_else(|| LoadError::Shape {
            path: path.to_path_buf(),
            reason: "module path has no file name".to_string(),
        })?;

        let staged = self.staging_dir.join(format!(
            "{}_{}",
            self.reload_counter,
            file_name.to_string_lossy()
        ));

        fs::copy(path, &staged).map_err(|source| LoadError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(staged)
    }
}

impl ModuleSource for LibrarySource {
    fn load_metadata(&mut self, path: &Path) -> Result<Metadata, LoadError> {
        metadata::load_from_path(path)
    }

    fn load_game(&mut self, path: &Path) -> Result<GamePayload, LoadError> {
        let staged = self.stage(path)?;

        let library = unsafe { Library::new(&staged) }.map_err(|e| LoadError::Library {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let api_version: GameApiVersionFn = unsafe {
            library
                .get::<GameApiVersionFn>(module_api::API_VERSION_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|e| LoadError::Symbol {
                    path: path.to_path_buf(),
                    symbol: "game_api_version",
                    reason: e.to_string(),
                })?
        };

        let version = unsafe { api_version() };
        if version != module_api::GAME_API_VERSION {
            return Err(LoadError::ApiVersion {
                path: path.to_path_buf(),
                got: version,
                expected: module_api::GAME_API_VERSION,
            });
        }

        let create_fn: GameCreateFn = unsafe {
            library
                .get::<GameCreateFn>(module_api::CREATE_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|e| LoadError::Symbol {
                    path: path.to_path_buf(),
                    symbol: "game_create",
                    reason: e.to_string(),
                })?
        };

        let destroy_fn: GameDestroyFn = unsafe {
            library
                .get::<GameDestroyFn>(module_api::DESTROY_SYMBOL)
                .map(|symbol| *symbol)
                .map_err(|e| LoadError::Symbol {
                    path: path.to_path_buf(),
                    symbol: "game_destroy",
                    reason: e.to_string(),
                })?
        };

        let instance = unsafe { create_fn() };
        if instance.is_null() {
            return Err(LoadError::NullInstance {
                path: path.to_path_buf(),
            });
        }

        let loaded = LoadedGame {
            instance,
            destroy_fn,
            _library: library,
        };

        log::info!("Loaded game module from {}", path.display());
        Ok(GamePayload::new(Box::new(loaded)))
    }
}
