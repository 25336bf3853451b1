//! Watch command implementation

use std::path::PathBuf;
use std::process::ExitCode;

use crate::watch::{watch_and_render, WatchOptions};

use super::{Session, EXIT_ERROR, EXIT_SUCCESS};

/// Execute the watch command; blocks until interrupted.
pub fn run_watch(session: Session, dir: PathBuf, output: Option<PathBuf>, scale: Option<u32>) -> ExitCode {
    let options = WatchOptions {
        dir,
        output,
        scale: session.scale(scale),
        config: session.config.watch.clone(),
    };

    match watch_and_render(options, session.registry) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
