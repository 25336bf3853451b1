//! Render command implementation

use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::gallery::{render_sheet, Sheet, SheetLayout, Tile};
use crate::models::Document;
use crate::output::{preview_output_path, save_png, sheet_manifest_path, sheet_output_path, OutputClaims};
use crate::pipeline::{preview_batch, PreviewOutcome};
use crate::raster::rasterize;
use crate::resolve::PaletteResolver;
use crate::watch::find_scene_files;

use super::{Session, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Settings for one render invocation
pub struct RenderOptions<'a> {
    pub output: Option<&'a Path>,
    pub scale: u32,
    pub sheet: bool,
    pub columns: u32,
    pub strict: bool,
}

/// A scene file and the directory it was found under, if any
#[derive(Debug, Clone, PartialEq, Eq)]
struct SceneInput {
    path: PathBuf,
    root: Option<PathBuf>,
}

/// Expand inputs into scene files. Directories are searched recursively.
fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<SceneInput>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_scene_files(input);
            if found.is_empty() {
                tracing::warn!(dir = %input.display(), "no .tscn files found");
            }
            files.extend(found.into_iter().map(|path| SceneInput { path, root: Some(input.clone()) }));
        } else if input.exists() {
            files.push(SceneInput { path: input.clone(), root: None });
        } else {
            return Err(format!("Input not found: {}", input.display()));
        }
    }
    Ok(files)
}

/// A document's rendered image, or the reason there is none
struct Rendered {
    input: SceneInput,
    name: String,
    image: Result<RgbaImage, String>,
}

fn render_all(session: &Session, files: Vec<SceneInput>, scale: u32) -> Vec<Rendered> {
    let mut results = Vec::with_capacity(files.len());
    let mut docs = Vec::with_capacity(files.len());
    let mut doc_slots = Vec::with_capacity(files.len());

    for input in files {
        match Document::read(&input.path) {
            Ok(doc) => {
                doc_slots.push(results.len());
                docs.push(doc);
                results.push(Rendered { name: String::new(), input, image: Err(String::new()) });
            }
            Err(e) => {
                let name = input.path.display().to_string();
                results.push(Rendered { name, input, image: Err(e.to_string()) });
            }
        }
    }

    let resolver = PaletteResolver::new(&session.registry);
    for (outcome, slot) in preview_batch(&docs, &resolver, scale).into_iter().zip(doc_slots) {
        let entry = &mut results[slot];
        match outcome {
            PreviewOutcome::Rendered { name, composition } => {
                entry.name = name;
                entry.image = rasterize(&composition).map_err(|e| e.to_string());
            }
            PreviewOutcome::Unavailable { name, error } => {
                entry.name = name;
                entry.image = Err(error.to_string());
            }
        }
    }

    results
}

fn report_failure(name: &str, reason: &str) {
    eprintln!("No preview could be generated for {}.", name);
    eprintln!("  {}", reason);
}

/// Save a contact sheet and its `.json` manifest, listing each slot.
fn save_sheet(sheet: &Sheet, path: &Path) -> Result<(), String> {
    save_png(&sheet.image, path).map_err(|e| format!("Failed to save '{}': {}", path.display(), e))?;
    println!("Saved: {}", path.display());

    let manifest_path = sheet_manifest_path(path);
    let manifest = serde_json::to_string_pretty(&sheet.placements).map_err(|e| e.to_string())?;
    std::fs::write(&manifest_path, manifest + "\n")
        .map_err(|e| format!("Failed to save '{}': {}", manifest_path.display(), e))?;

    for (i, placement) in sheet.placements.iter().enumerate() {
        let status = if placement.rendered { "" } else { " (no preview)" };
        println!("  tile {}: {} at {},{}{}", i + 1, placement.name, placement.x, placement.y, status);
    }
    println!("Saved: {}", manifest_path.display());
    Ok(())
}

/// Execute the render command
pub fn run_render(session: &Session, inputs: &[PathBuf], options: &RenderOptions<'_>) -> ExitCode {
    let files = match collect_inputs(inputs) {
        Ok(files) => files,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    if files.is_empty() {
        eprintln!("Error: No .tscn files found");
        return ExitCode::from(EXIT_ERROR);
    }

    let is_single = files.len() == 1;
    let results = render_all(session, files, options.scale);
    let mut rendered = 0usize;
    let mut failed = 0usize;

    if options.sheet {
        let tiles: Vec<Tile> = results
            .into_iter()
            .map(|r| match r.image {
                Ok(image) => {
                    rendered += 1;
                    Tile::preview(r.name, image)
                }
                Err(reason) => {
                    failed += 1;
                    report_failure(&r.name, &reason);
                    Tile::placeholder(r.name)
                }
            })
            .collect();

        if rendered > 0 {
            let layout = SheetLayout { columns: options.columns, padding: 0, placeholder_size: options.scale };
            let path = sheet_output_path(options.output);
            let saved = render_sheet(&tiles, layout)
                .map_err(|e| format!("Contact sheet not rendered: {}", e))
                .and_then(|sheet| save_sheet(&sheet, &path));
            if let Err(msg) = saved {
                eprintln!("Error: {}", msg);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        let mut claims = OutputClaims::new();
        for result in results {
            match result.image {
                Ok(image) => {
                    let input = &result.input;
                    let path = preview_output_path(&input.path, input.root.as_deref(), options.output, is_single);
                    let owner = input.path.display().to_string();
                    if let Err(other) = claims.claim(&path, &owner) {
                        failed += 1;
                        report_failure(&result.name, &format!("{} is already the preview of {}", path.display(), other));
                        continue;
                    }
                    if let Err(e) = save_png(&image, &path) {
                        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
                        failed += 1;
                        continue;
                    }
                    println!("Saved: {}", path.display());
                    rendered += 1;
                }
                Err(reason) => {
                    failed += 1;
                    report_failure(&result.name, &reason);
                }
            }
        }
    }

    tracing::info!(rendered, failed, "render finished");

    if rendered == 0 || (options.strict && failed > 0) {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
