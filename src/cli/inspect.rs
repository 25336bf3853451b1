//! Inspect command implementation

use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;

use crate::cells::decode_cells;
use crate::compositor::{composite, grid_size, GridSize};
use crate::models::Document;
use crate::normalize::{bounds, normalize, CellBounds};
use crate::pipeline::PreviewError;
use crate::resolve::PaletteResolver;

use super::{Session, EXIT_ERROR, EXIT_SUCCESS};

#[derive(Debug, Serialize)]
struct FillReport {
    x: u32,
    y: u32,
    size: u32,
    color: String,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    name: String,
    /// Mesh library key, null when the scene has no reference
    palette: Option<String>,
    palette_registered: bool,
    cells: usize,
    bounds: Option<CellBounds>,
    normalized_bounds: Option<CellBounds>,
    grid: GridSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    fills: Option<Vec<FillReport>>,
}

/// Build the report; `fill_scale` adds the fill list at that scale.
fn build_report(
    doc: &Document,
    resolver: &PaletteResolver<'_>,
    fill_scale: Option<u32>,
) -> Result<InspectReport, PreviewError> {
    let raw = decode_cells(&doc.text)?;
    let cells = normalize(&raw);
    let key = resolver.key(&doc.text).ok();
    let palette = resolver.resolve(&doc.text);

    let fills = match fill_scale {
        Some(scale) => {
            let composition = composite(&cells, palette.clone()?, scale)?;
            let fills = composition
                .fills
                .iter()
                .map(|f| FillReport { x: f.x, y: f.y, size: f.size, color: f.color.to_css() })
                .collect();
            Some(fills)
        }
        None => None,
    };

    Ok(InspectReport {
        name: doc.name.clone(),
        palette: key.map(str::to_string),
        palette_registered: palette.is_ok(),
        cells: raw.len(),
        bounds: bounds(&raw),
        normalized_bounds: bounds(&cells),
        grid: grid_size(&cells),
        fills,
    })
}

/// Execute the inspect command
pub fn run_inspect(session: &Session, input: &Path, fills: bool, scale: u32) -> ExitCode {
    let doc = match Document::read(input) {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let resolver = PaletteResolver::new(&session.registry);
    let report = match build_report(&doc, &resolver, fills.then_some(scale)) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Error: {}: {}", doc.name, e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
