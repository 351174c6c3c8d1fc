//! Frame loop driver
//!
//! [`ReloadSession`] owns all live-reload state: the active metadata
//! record, the active game payload, the reconciliation flags, and one
//! watcher per watched path. Each frame runs in fixed order (drain
//! change notifications, reconcile pending flags into runtime actions,
//! advance the game, render) and the whole loop is single-threaded:
//! one frame completes before the next begins, and nothing mutates the
//! active state but the session itself.

use std::path::Path;
use std::time::{Duration, Instant};

use crate::constants::render;
use crate::error::HarnessResult;
use crate::flags::{Flag, ReloadFlags};
use crate::loader::{GamePayload, ModuleSource};
use crate::metadata::Metadata;
use crate::runtime::GraphicsRuntime;
use crate::watcher::{FileWatcher, WatchEvent, WatchEventKind};
use crate::HarnessConfig;

/// Which watched path a drained notification belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WatchTarget {
    Metadata,
    Game,
}

/// Fixed-rate scheduler pacing the frame loop
pub struct FrameTicker {
    period: Duration,
    next_deadline: Instant,
}

impl FrameTicker {
    pub fn new(fps: u32) -> Self {
        let period = Duration::from_secs(1) / fps.max(1);
        Self {
            period,
            next_deadline: Instant::now() + period,
        }
    }

    /// Sleep until the next frame deadline. A frame that overran its
    /// budget skips ahead instead of accumulating debt.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.period;
        } else {
            self.next_deadline = now + self.period;
        }
    }
}

/// The live-reload session driving one window and one game module
pub struct ReloadSession<S: ModuleSource, R: GraphicsRuntime> {
    config: HarnessConfig,
    source: S,
    runtime: R,

    /// Active metadata record; replaced wholesale on successful reload
    metadata: Metadata,

    /// Active game payload; absent only before the first successful load
    payload: Option<GamePayload>,

    flags: ReloadFlags,

    /// Watcher over the metadata descriptor; None once degraded
    meta_watcher: Option<FileWatcher>,

    /// Watcher over the game entry point; retargeted when it moves,
    /// None once degraded
    game_watcher: Option<FileWatcher>,
}

impl<S: ModuleSource, R: GraphicsRuntime> ReloadSession<S, R> {
    /// Load both modules, arm the watchers, and bring the runtime up.
    ///
    /// Any failure here is fatal: there is no previous record or payload
    /// to fall back to, and the runtime must not be initialized with
    /// undefined metadata.
    pub fn bootstrap(config: HarnessConfig, mut source: S, mut runtime: R) -> HarnessResult<Self> {
        let metadata = source.load_metadata(&config.metadata_path)?;
        let meta_watcher = FileWatcher::new(&config.metadata_path, config.debounce)?;

        let payload = source.load_game(&metadata.entry_point)?;
        let game_watcher = FileWatcher::new(&metadata.entry_point, config.debounce)?;

        runtime.init_window(metadata.width, metadata.height, &metadata.title);
        runtime.init_audio();
        runtime.set_target_fps(config.target_fps);

        log::info!(
            "Session up: {}x{} \"{}\", game module {}",
            metadata.width,
            metadata.height,
            metadata.title,
            metadata.entry_point.display()
        );

        Ok(Self {
            config,
            source,
            runtime,
            metadata,
            payload: Some(payload),
            flags: ReloadFlags::default(),
            meta_watcher: Some(meta_watcher),
            game_watcher: Some(game_watcher),
        })
    }

    /// Drive frames at the configured rate until the runtime reports
    /// the window should close, then tear down. Returns after teardown.
    pub fn run(&mut self) {
        let mut ticker = FrameTicker::new(self.config.target_fps);
        while !self.runtime.window_should_close() {
            self.frame();
            ticker.wait();
        }
        self.shutdown();
    }

    /// Execute one frame: drain change notifications, reconcile pending
    /// flags, advance the game, render.
    pub fn frame(&mut self) {
        self.drain_one(WatchTarget::Metadata);
        self.drain_one(WatchTarget::Game);
        self.reconcile();
        self.advance();
        self.render();
    }

    /// Active metadata record
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Current flag state
    pub fn flags(&self) -> ReloadFlags {
        self.flags
    }

    /// The graphics runtime, for inspection
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Pull at most one pending notification for `target` and fold it
    /// into the flags. A closed watch degrades that path to no further
    /// hot reload; the render loop itself is unaffected.
    fn drain_one(&mut self, target: WatchTarget) {
        let slot = match target {
            WatchTarget::Metadata => &mut self.meta_watcher,
            WatchTarget::Game => &mut self.game_watcher,
        };

        let Some(watcher) = slot.as_ref() else {
            return;
        };

        match watcher.try_next() {
            Ok(Some(event)) => Self::note_event(&mut self.flags, target, &event),
            Ok(None) => {}
            Err(err) => {
                log::warn!("{err}; hot reload disabled for this path");
                *slot = None;
            }
        }
    }

    /// Raise the reload flag matching a "modify" notification. Other
    /// event kinds are ignored, and a repeat while the reload is already
    /// pending is a no-op.
    fn note_event(flags: &mut ReloadFlags, target: WatchTarget, event: &WatchEvent) {
        if event.kind != WatchEventKind::Modified {
            return;
        }

        let flag = match target {
            WatchTarget::Metadata => Flag::Metadata,
            WatchTarget::Game => Flag::Game,
        };

        if flags.raise(flag) {
            match target {
                WatchTarget::Metadata => log::info!("Change detected in metadata"),
                WatchTarget::Game => log::info!("Change detected in game module"),
            }
        }
    }

    /// Convert pending flags into runtime actions, in fixed priority
    /// order: resize, rename, game reload, metadata reload. Each flag is
    /// cleared as soon as its action has been attempted. Flags raised
    /// while reconciling (by a metadata diff) are consumed on a later
    /// frame, never re-entrantly within this one.
    fn reconcile(&mut self) {
        if self.flags.is_raised(Flag::Resize) {
            self.runtime
                .set_window_size(self.metadata.width, self.metadata.height);
            self.flags.clear(Flag::Resize);
            log::info!(
                "Window resized to {}x{}",
                self.metadata.width,
                self.metadata.height
            );
        }

        if self.flags.is_raised(Flag::Title) {
            self.runtime.set_window_title(&self.metadata.title);
            self.flags.clear(Flag::Title);
            log::info!("Window renamed to \"{}\"", self.metadata.title);
        }

        if self.flags.is_raised(Flag::Game) {
            self.reload_game();
            self.flags.clear(Flag::Game);
        }

        if self.flags.is_raised(Flag::Metadata) {
            self.reload_metadata();
            self.flags.clear(Flag::Metadata);
        }
    }

    /// Reload the game module behind the active entry point. On failure
    /// the previous payload stays active; the cleared flag means a later
    /// file change is required to retry.
    fn reload_game(&mut self) {
        match self.source.load_game(&self.metadata.entry_point) {
            Ok(payload) => {
                self.install_payload(payload);
                log::info!(
                    "Reloaded game module {}",
                    self.metadata.entry_point.display()
                );
            }
            Err(err) => {
                log::error!("Game reload failed, keeping previous module: {err}");
            }
        }
    }

    /// Reload the metadata descriptor, diff it against the active
    /// record, and raise flags for every changed dimension. An entry
    /// point change also retargets the game watcher. On failure the
    /// previous record stays active.
    fn reload_metadata(&mut self) {
        let new = match self.source.load_metadata(&self.config.metadata_path) {
            Ok(new) => new,
            Err(err) => {
                log::error!("Metadata reload failed, keeping previous record: {err}");
                return;
            }
        };

        let diff = self.metadata.diff(&new);

        if diff.resize {
            self.flags.raise(Flag::Resize);
        }
        if diff.title {
            self.flags.raise(Flag::Title);
        }
        if diff.game {
            self.flags.raise(Flag::Game);
            self.retarget_game_watcher(&new.entry_point);
        }

        self.metadata = new;
    }

    /// Point the game watcher at a new entry point. The old watcher is
    /// dropped first, discarding any notifications still pending for the
    /// stale path along with it.
    fn retarget_game_watcher(&mut self, entry_point: &Path) {
        self.game_watcher = None;
        match FileWatcher::new(entry_point, self.config.debounce) {
            Ok(watcher) => {
                log::info!("Game watcher now rooted at {}", entry_point.display());
                self.game_watcher = Some(watcher);
            }
            Err(err) => {
                log::warn!("{err}; hot reload disabled for the game module");
            }
        }
    }

    /// Swap in a new payload, releasing the superseded one's assets
    fn install_payload(&mut self, payload: GamePayload) {
        if let Some(mut old) = self.payload.replace(payload) {
            old.release_assets();
        }
    }

    fn advance(&mut self) {
        if let Some(payload) = self.payload.as_mut() {
            payload.tick();
        }
    }

    fn render(&mut self) {
        self.runtime.begin_drawing();
        self.runtime.clear_background(render::BACKGROUND);
        if let Some(payload) = self.payload.as_mut() {
            payload.draw();
        }
        self.runtime.end_drawing();
    }

    /// Release the active payload's assets, then close the window and
    /// audio
    fn shutdown(&mut self) {
        if let Some(payload) = self.payload.as_mut() {
            payload.release_assets();
        }
        self.runtime.close_window();
        self.runtime.close_audio();
        log::info!("Session closed");
    }
}
