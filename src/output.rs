//! PNG output and file path generation

use image::RgbaImage;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Whether an `-o` argument names a directory.
fn is_dir_arg(output: &Path) -> bool {
    output.as_os_str().to_string_lossy().ends_with('/') || output.is_dir()
}

fn stem_of(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("preview")
}

fn sibling(path: &Path, file_name: String) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

/// Generate the output path for a document's preview.
///
/// `root` is the directory the input was found under, if it came from a
/// directory search. With a directory `-o` the input's path below `root` is
/// kept, so `levels/act1/wall.tscn` found under `levels` lands at
/// `dir/act1/wall.png`.
///
/// | Scenario                          | Output                     |
/// |-----------------------------------|----------------------------|
/// | No `-o`                           | `{input_dir}/{stem}.png`   |
/// | `-o out.png`, single document     | `out.png`                  |
/// | `-o out.png`, several documents   | `out_{stem}.png`           |
/// | `-o dir/`, searched under `root`  | `dir/{relative}.png`       |
/// | `-o dir/`, named directly         | `dir/{stem}.png`           |
pub fn preview_output_path(
    input: &Path,
    root: Option<&Path>,
    output_arg: Option<&Path>,
    is_single: bool,
) -> PathBuf {
    let stem = stem_of(input);
    match output_arg {
        Some(output) if is_dir_arg(output) => in_output_dir(input, root, output),
        Some(output) if is_single => output.to_path_buf(),
        Some(output) => sibling(output, format!("{}_{}.png", stem_of(output), stem)),
        None => sibling(input, format!("{}.png", stem)),
    }
}

/// `input`'s place inside `dir`, mirroring its path below `root`.
pub fn in_output_dir(input: &Path, root: Option<&Path>, dir: &Path) -> PathBuf {
    match root.and_then(|root| input.strip_prefix(root).ok()) {
        Some(relative) if relative.file_name().is_some() => dir.join(relative).with_extension("png"),
        _ => dir.join(format!("{}.png", stem_of(input))),
    }
}

/// Output paths already handed out in one run, keyed to the document that
/// owns them.
#[derive(Debug, Default)]
pub struct OutputClaims {
    owners: HashMap<PathBuf, String>,
}

impl OutputClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `path` for `document`.
    ///
    /// Fails with the owning document's name when an earlier document
    /// already claimed the same path.
    pub fn claim(&mut self, path: &Path, document: &str) -> Result<(), String> {
        match self.owners.get(path) {
            Some(owner) if owner != document => Err(owner.clone()),
            Some(_) => Ok(()),
            None => {
                self.owners.insert(path.to_path_buf(), document.to_string());
                Ok(())
            }
        }
    }
}

/// Output path of a contact sheet.
pub fn sheet_output_path(output_arg: Option<&Path>) -> PathBuf {
    const DEFAULT_NAME: &str = "gallery.png";
    match output_arg {
        Some(output) if is_dir_arg(output) => output.join(DEFAULT_NAME),
        Some(output) => output.to_path_buf(),
        None => PathBuf::from(DEFAULT_NAME),
    }
}

/// Manifest written beside a contact sheet: `gallery.png` -> `gallery.json`.
pub fn sheet_manifest_path(sheet: &Path) -> PathBuf {
    sheet.with_extension("json")
}
