//! Window metadata descriptor
//!
//! The metadata file drives the window: dimensions, title, and the path
//! of the game module to run. It is re-read when the watcher reports a
//! change, and the freshly parsed record is compared field by field
//! against the active one to decide which runtime actions are due.
//!
//! Descriptor format (TOML):
//!
//! ```toml
//! screen_width = 800
//! screen_height = 600
//! screen_title = "Demo"
//! entry_point = "./game.mod"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::LoadError;

/// Window metadata record.
///
/// Immutable once loaded; a successful reload replaces the active record
/// wholesale. Exactly one record is active at a time, owned by the
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Metadata {
    /// Window width in pixels
    #[serde(rename = "screen_width")]
    pub width: u32,

    /// Window height in pixels
    #[serde(rename = "screen_height")]
    pub height: u32,

    /// Window title
    #[serde(rename = "screen_title")]
    pub title: String,

    /// Path of the game module
    pub entry_point: PathBuf,
}

/// Field-level outcome of comparing two metadata records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetadataDiff {
    /// Width or height changed
    pub resize: bool,

    /// Title changed
    pub title: bool,

    /// Entry point changed
    pub game: bool,
}

impl MetadataDiff {
    /// True when no field differs
    pub fn is_empty(&self) -> bool {
        !(self.resize || self.title || self.game)
    }
}

impl Metadata {
    /// Compare this record against a freshly loaded one.
    ///
    /// Dimension changes coalesce into a single resize. The fields are
    /// independent: any combination of them can differ at once.
    pub fn diff(&self, new: &Metadata) -> MetadataDiff {
        MetadataDiff {
            resize: new.width != self.width || new.height != self.height,
            title: new.title != self.title,
            game: new.entry_point != self.entry_point,
        }
    }

    fn validate(self, path: &Path) -> Result<Self, LoadError> {
        if self.width == 0 || self.height == 0 {
            return Err(LoadError::Shape {
                path: path.to_path_buf(),
                reason: format!(
                    "screen dimensions must be positive, got {}x{}",
                    self.width, self.height
                ),
            });
        }
        Ok(self)
    }
}

/// Read and parse a metadata descriptor from disk.
///
/// Nothing is cached between calls; every invocation observes the
/// current on-disk content. A record that fails to parse or validate is
/// never returned partially.
pub fn load_from_path(path: &Path) -> Result<Metadata, LoadError> {
    let raw = fs::read_to_string(path).map_err(|source| LoadError::Resolve {
        path: path.to_path_buf(),
        source,
    })?;

    let metadata: Metadata = toml::from_str(&raw).map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    metadata.validate(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(width: u32, height: u32, title: &str, entry: &str) -> Metadata {
        Metadata {
            width,
            height,
            title: title.to_string(),
            entry_point: PathBuf::from(entry),
        }
    }

    #[test]
    fn diff_of_identical_records_is_empty() {
        let old = record(800, 600, "Demo", "./game.mod");
        assert!(old.diff(&old.clone()).is_empty());
    }

    #[test]
    fn diff_detects_each_field_independently() {
        let old = record(800, 600, "Demo", "./game.mod");

        let wider = record(1024, 600, "Demo", "./game.mod");
        assert_eq!(
            old.diff(&wider),
            MetadataDiff { resize: true, title: false, game: false }
        );

        let taller = record(800, 768, "Demo", "./game.mod");
        assert!(old.diff(&taller).resize);

        let renamed = record(800, 600, "Demo 2", "./game.mod");
        assert_eq!(
            old.diff(&renamed),
            MetadataDiff { resize: false, title: true, game: false }
        );

        let retargeted = record(800, 600, "Demo", "./game2.mod");
        assert_eq!(
            old.diff(&retargeted),
            MetadataDiff { resize: false, title: false, game: true }
        );
    }

    #[test]
    fn diff_combines_simultaneous_changes() {
        let old = record(800, 600, "Demo", "./game.mod");
        let new = record(1024, 768, "Other", "./game2.mod");
        assert_eq!(
            old.diff(&new),
            MetadataDiff { resize: true, title: true, game: true }
        );
    }

    #[test]
    fn parses_a_complete_descriptor() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("metadata.toml");
        fs::write(
            &path,
            "screen_width = 800\nscreen_height = 600\nscreen_title = \"Demo\"\nentry_point = \"./game.mod\"\n",
        )
        .expect("write descriptor");

        let metadata = load_from_path(&path).expect("load descriptor");
        assert_eq!(metadata, record(800, 600, "Demo", "./game.mod"));
    }

    #[test]
    fn missing_file_is_a_resolve_error() {
        let err = load_from_path(Path::new("/nonexistent/metadata.toml"))
            .expect_err("should not resolve");
        assert!(matches!(err, LoadError::Resolve { .. }));
    }

    #[test]
    fn missing_key_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("metadata.toml");
        fs::write(&path, "screen_width = 800\nscreen_height = 600\n").expect("write descriptor");

        let err = load_from_path(&path).expect_err("should not parse");
        assert!(matches!(err, LoadError::Parse { .. }));
    }

    #[test]
    fn zero_dimensions_violate_the_contract() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("metadata.toml");
        fs::write(
            &path,
            "screen_width = 0\nscreen_height = 600\nscreen_title = \"Demo\"\nentry_point = \"./game.mod\"\n",
        )
        .expect("write descriptor");

        let err = load_from_path(&path).expect_err("should not validate");
        assert!(matches!(err, LoadError::Shape { .. }));
    }
}
