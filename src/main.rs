/// hotloop executable
///
/// Headless demonstration of the live-reload harness: loads the given
/// metadata descriptor and its game module, then runs the frame loop
/// against the call-recording runtime. Real integrations supply their
/// own `GraphicsRuntime` implementation over an actual windowing stack.
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use hotloop::{HarnessConfig, HeadlessRuntime, LibrarySource, ReloadSession};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("Fatal: {e:#}");
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut config = HarnessConfig::default();
    let mut frames: Option<u64> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--frames" => {
                let value = args.next().context("--frames needs a value")?;
                frames = Some(value.parse().context("--frames expects an integer")?);
            }
            "--fps" => {
                let value = args.next().context("--fps needs a value")?;
                config.target_fps = value.parse().context("--fps expects an integer")?;
            }
            path => config.metadata_path = PathBuf::from(path),
        }
    }

    let source = LibrarySource::new().context("failed to set up module staging")?;
    let runtime = match frames {
        Some(n) => HeadlessRuntime::with_frame_budget(n),
        None => HeadlessRuntime::new(),
    };

    let mut session =
        ReloadSession::bootstrap(config, source, runtime).context("initial load failed")?;
    session.run();

    Ok(())
}
