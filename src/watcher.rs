//! Filesystem change watching
//!
//! One [`FileWatcher`] observes one path. Events arrive on a channel fed
//! by the notify backend's callback thread and are drained without
//! blocking from the frame loop; a consumer that stops pulling stops
//! seeing events. Dropping the watcher disposes the underlying OS watch
//! together with any notifications still queued, which is how the
//! session retargets the game watcher when the entry point moves.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, TryRecvError};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::WatchError;

/// Type of file change event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEventKind {
    Created,
    Modified,
    Deleted,
}

/// File watch event
#[derive(Debug, Clone)]
pub struct WatchEvent {
    pub path: PathBuf,
    pub kind: WatchEventKind,
}

/// Watcher over a single path.
///
/// Events within the debounce window of the previous forwarded event are
/// dropped on the producer side; an editor save that fires several
/// notifications in quick succession surfaces as one.
pub struct FileWatcher {
    /// Notify watcher instance; holds the OS watch for our lifetime
    _watcher: RecommendedWatcher,

    /// Event receiver drained by the frame loop
    rx: Receiver<WatchEvent>,

    /// Watched path
    path: PathBuf,
}

impl FileWatcher {
    /// Start watching a single path.
    pub fn new(path: impl AsRef<Path>, debounce: Duration) -> Result<Self, WatchError> {
        let path = path.as_ref().to_path_buf();
        let (tx, rx) = crossbeam_channel::unbounded();
        let last_sent: Arc<Mutex<Option<Instant>>> = Arc::new(Mutex::new(None));

        let mut watcher =
            notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(_) => return,
                };

                let kind = match event.kind {
                    EventKind::Create(_) => WatchEventKind::Created,
                    EventKind::Modify(_) => WatchEventKind::Modified,
                    EventKind::Remove(_) => WatchEventKind::Deleted,
                    _ => return,
                };

                let now = Instant::now();
                if let Ok(mut last) = last_sent.lock() {
                    if let Some(prev) = *last {
                        if now.duration_since(prev) < debounce {
                            return;
                        }
                    }
                    *last = Some(now);
                }

                for path in event.paths {
                    let _ = tx.send(WatchEvent { path, kind });
                }
            })
            .map_err(|e| WatchError::Init {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        watcher
            .watch(&path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::Init {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            _watcher: watcher,
            rx,
            path,
        })
    }

    /// Pull one pending event without blocking.
    ///
    /// `Ok(None)` means nothing is queued right now. `Err(Closed)` means
    /// the backend stopped delivering and no further events will arrive.
    pub fn try_next(&self) -> Result<Option<WatchEvent>, WatchError> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WatchError::Closed {
                path: self.path.clone(),
            }),
        }
    }

    /// Path this watcher observes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn wait_for_event(watcher: &FileWatcher) -> Option<WatchEvent> {
        for _ in 0..200 {
            if let Ok(Some(event)) = watcher.try_next() {
                return Some(event);
            }
            thread::sleep(Duration::from_millis(20));
        }
        None
    }

    #[test]
    fn reports_modifications_to_the_watched_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("meta.toml");
        fs::write(&file, "before").expect("seed file");

        let watcher = FileWatcher::new(&file, Duration::from_millis(10)).expect("watcher");
        // Let the OS watch settle before mutating the file.
        thread::sleep(Duration::from_millis(100));
        fs::write(&file, "after").expect("modify file");

        let event = wait_for_event(&watcher).expect("a change notification");
        assert_eq!(event.kind, WatchEventKind::Modified);
        assert_eq!(event.path.file_name(), file.file_name());
    }

    #[test]
    fn try_next_is_empty_when_nothing_changed() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("meta.toml");
        fs::write(&file, "content").expect("seed file");

        let watcher = FileWatcher::new(&file, Duration::from_millis(10)).expect("watcher");
        assert!(matches!(watcher.try_next(), Ok(None)));
    }

    #[test]
    fn watching_a_missing_path_fails_to_initialize() {
        let temp_dir = TempDir::new().expect("temp dir");
        let missing = temp_dir.path().join("absent.toml");

        let err = FileWatcher::new(&missing, Duration::from_millis(10))
            .err()
            .expect("watch should fail");
        assert!(matches!(err, WatchError::Init { .. }));
    }
}
