//! Watch mode for re-rendering previews on file changes
//!
//! Every debounced batch of scene changes starts a new [`Generation`] and
//! re-renders the watched directory on a worker thread. A pass stops as soon
//! as a newer batch starts, and its PNGs are only written if it is still
//! current when the render finishes.

use image::RgbaImage;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

use crate::config::schema::WatchConfig;
use crate::generation::{Generation, Generations};
use crate::models::Document;
use crate::output::{in_output_dir, preview_output_path, save_png};
use crate::pipeline::{preview_batch_while, PreviewOutcome};
use crate::raster::rasterize;
use crate::registry::{PaletteLookup, PaletteRegistry};
use crate::resolve::PaletteResolver;

/// Error during watch mode
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize file watcher
    #[error("Failed to initialize file watcher: {0}")]
    WatcherInit(notify::Error),
    /// Failed to add watch path
    #[error("Failed to watch path: {0}")]
    WatchPath(notify::Error),
    /// Channel receive error
    #[error("Watch channel error: {0}")]
    ChannelError(String),
    /// Watched directory not found
    #[error("Directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
}

/// Options for watch mode
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Directory to watch recursively
    pub dir: PathBuf,
    /// Output directory; previews go next to their scenes when unset
    pub output: Option<PathBuf>,
    /// Pixels per cell edge
    pub scale: u32,
    /// Watch configuration (debounce, clear screen)
    pub config: WatchConfig,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self { dir: PathBuf::from("."), output: None, scale: 10, config: WatchConfig::default() }
    }
}

/// What one render pass produced
#[derive(Debug, Default)]
pub struct PassReport {
    /// PNG files written
    pub written: Vec<PathBuf>,
    /// Documents with no preview, with the reason
    pub failed: Vec<(String, String)>,
    pub duration: Duration,
}

impl PassReport {
    pub fn success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Render `paths` and write their previews if `generation` is still current.
///
/// Returns `None` when a newer generation superseded this one; nothing is
/// written in that case, and the pass stops at the next document.
pub fn render_pass(
    paths: &[PathBuf],
    options: &WatchOptions,
    registry: &dyn PaletteLookup,
    generations: &Generations,
    generation: Generation,
) -> Option<PassReport> {
    let start = Instant::now();
    let mut report = PassReport::default();

    let current = || generations.is_current(generation);

    let mut docs = Vec::with_capacity(paths.len());
    let mut doc_paths = Vec::with_capacity(paths.len());
    for path in paths {
        if !current() {
            return None;
        }
        match Document::read(path) {
            Ok(doc) => {
                docs.push(doc);
                doc_paths.push(path);
            }
            Err(e) => report.failed.push((path.display().to_string(), e.to_string())),
        }
    }

    let resolver = PaletteResolver::new(registry);
    let outcomes = preview_batch_while(&docs, &resolver, options.scale, current)?;

    let mut pending: Vec<(PathBuf, RgbaImage)> = Vec::new();
    for (outcome, path) in outcomes.into_iter().zip(doc_paths) {
        if !current() {
            return None;
        }
        match outcome {
            PreviewOutcome::Rendered { name, composition } => match rasterize(&composition) {
                Ok(image) => {
                    let out = watch_output_path(path, &options.dir, options.output.as_deref());
                    pending.push((out, image));
                }
                Err(e) => report.failed.push((name, e.to_string())),
            },
            PreviewOutcome::Unavailable { name, error } => report.failed.push((name, error.to_string())),
        }
    }

    generations.commit_if_current(generation, move || {
        for (out, image) in pending {
            match save_png(&image, &out) {
                Ok(()) => report.written.push(out),
                Err(e) => report.failed.push((out.display().to_string(), e.to_string())),
            }
        }
        report.duration = start.elapsed();
        report
    })
}

/// Previews mirror the scene's place under `root` inside `output_dir` when
/// given, else go next to the scene.
fn watch_output_path(input: &Path, root: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => in_output_dir(input, Some(root), dir),
        None => preview_output_path(input, None, None, true),
    }
}

/// Find every scene file under `dir`, sorted.
pub fn find_scene_files(dir: &Path) -> Vec<PathBuf> {
    let pattern = format!("{}/**/*.tscn", dir.display());
    let mut files: Vec<PathBuf> = match glob::glob(&pattern) {
        Ok(entries) => entries.flatten().collect(),
        Err(e) => {
            tracing::warn!(pattern = %pattern, error = %e, "invalid glob pattern");
            Vec::new()
        }
    };
    files.sort();
    files
}

/// Clear the terminal screen
fn clear_screen() {
    print!("\x1B[2J\x1B[1;1H");
}

/// Format duration for display
fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

/// Current time of day (UTC) for log lines
fn timestamp() -> String {
    use std::time::SystemTime;
    let now = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
    let secs = now.as_secs() % 86400;
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Check if a changed file should trigger a render
fn is_relevant_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("tscn"))
}

/// Changed scene files in a batch, deduplicated. Deleted files are skipped.
fn changed_scenes<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<PathBuf> {
    let unique: BTreeSet<PathBuf> =
        paths.into_iter().filter(|p| is_relevant_file(p) && p.exists()).map(Path::to_path_buf).collect();
    unique.into_iter().collect()
}

fn print_report(generation: Generation, report: &PassReport) {
    for (name, reason) in &report.failed {
        eprintln!("[{}] No preview could be generated for {}.", timestamp(), name);
        tracing::debug!(document = %name, reason = %reason, "render failed");
    }

    println!(
        "[{}] Render #{} {} ({}) - Written: {} | Failed: {}",
        timestamp(),
        generation.get(),
        if report.success() { "complete" } else { "finished with errors" },
        format_duration(report.duration),
        report.written.len(),
        report.failed.len()
    );
}

/// Start a render of `paths` on a worker thread.
fn spawn_pass(
    paths: Vec<PathBuf>,
    options: Arc<WatchOptions>,
    registry: Arc<PaletteRegistry>,
    generations: Arc<Generations>,
) {
    let generation = generations.begin();
    std::thread::spawn(move || {
        match render_pass(&paths, &options, registry.as_ref(), &generations, generation) {
            Some(report) => print_report(generation, &report),
            None => println!("[{}] Render #{} superseded", timestamp(), generation.get()),
        }
    });
}

/// Watch `options.dir` and re-render changed scenes.
///
/// Blocks until the watcher channel closes or interrupted (Ctrl+C).
pub fn watch_and_render(options: WatchOptions, registry: PaletteRegistry) -> Result<(), WatchError> {
    if !options.dir.is_dir() {
        return Err(WatchError::SourceNotFound(options.dir.clone()));
    }

    let (tx, rx) = channel();
    let debounce_duration = Duration::from_millis(u64::from(options.config.debounce_ms));
    let mut debouncer = new_debouncer(debounce_duration, tx).map_err(WatchError::WatcherInit)?;
    debouncer.watcher().watch(&options.dir, RecursiveMode::Recursive).map_err(WatchError::WatchPath)?;

    let options = Arc::new(options);
    let registry = Arc::new(registry);
    let generations = Arc::new(Generations::new());

    if options.config.clear_screen {
        clear_screen();
    }
    let initial = find_scene_files(&options.dir);
    println!("[{}] Rendering {} scene(s)...", timestamp(), initial.len());
    spawn_pass(initial, Arc::clone(&options), Arc::clone(&registry), Arc::clone(&generations));
    println!("[{}] Watching {} for changes...", timestamp(), options.dir.display());

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed = changed_scenes(
                    events.iter().filter(|e| matches!(e.kind, DebouncedEventKind::Any)).map(|e| e.path.as_path()),
                );
                if changed.is_empty() {
                    continue;
                }

                if options.config.clear_screen {
                    clear_screen();
                }
                for path in &changed {
                    if let Some(name) = path.file_name() {
                        println!("[{}] Changed: {}", timestamp(), name.to_string_lossy());
                    }
                }
                // every pass covers the whole directory
                let scenes = find_scene_files(&options.dir);
                spawn_pass(scenes, Arc::clone(&options), Arc::clone(&registry), Arc::clone(&generations));
            }
            Ok(Err(error)) => {
                tracing::warn!(error = ?error, "watch error, continuing");
            }
            Err(e) => return Err(WatchError::ChannelError(e.to_string())),
        }
    }
}
