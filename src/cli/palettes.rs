//! Palettes command implementation

use clap::Subcommand;
use std::process::ExitCode;

use crate::color::to_hex;
use crate::registry::{PaletteLookup, PaletteRegistry};
use crate::suggest::{format_suggestion, suggest};

use super::{EXIT_ERROR, EXIT_SUCCESS};

#[derive(Subcommand)]
pub enum PaletteAction {
    /// List every registered palette
    List,
    /// Show the indexed colors of a palette
    Show {
        /// Palette name (mesh library stem)
        name: String,
    },
}

fn list_lines(registry: &PaletteRegistry) -> Vec<String> {
    registry
        .sorted_names()
        .into_iter()
        .filter_map(|name| registry.lookup(name))
        .map(|palette| format!("  {} ({} colors)", palette.name, palette.len()))
        .collect()
}

/// Execute the palettes command
pub fn run_palettes(registry: &PaletteRegistry, action: PaletteAction) -> ExitCode {
    match action {
        PaletteAction::List => {
            println!("Palettes:");
            for line in list_lines(registry) {
                println!("{}", line);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        PaletteAction::Show { name } => match registry.lookup(&name) {
            Some(palette) => {
                println!("Palette: {}", palette.name);
                println!();
                for (index, color) in palette.colors.iter().enumerate() {
                    println!("  {:>3} => {}", index, to_hex(*color));
                }
                ExitCode::from(EXIT_SUCCESS)
            }
            None => {
                eprintln!("Error: Unknown palette '{}'", name);
                let names = registry.sorted_names();
                if let Some(suggestion) = format_suggestion(&suggest(&name, &names, 3)) {
                    eprintln!("{}", suggestion);
                }
                eprintln!();
                eprintln!("Available palettes:");
                for known in names {
                    eprintln!("  {}", known);
                }
                ExitCode::from(EXIT_ERROR)
            }
        },
    }
}
