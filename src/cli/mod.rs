//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod inspect;
mod palettes;
mod render;
mod watch;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing_subscriber::prelude::*;

use crate::config::{load_config, ConfigError, GridpaintConfig};
use crate::registry::{build_registry, PaletteRegistry, RegistryError};

pub use palettes::PaletteAction;

/// Process exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// gridpaint - Preview Godot GridMap paintings as PNG
#[derive(Parser)]
#[command(name = "gridpaint")]
#[command(about = "gridpaint - Render previews of Godot GridMap scenes (.tscn) to PNG")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Use this config file instead of searching for gridpaint.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render scene previews to PNG
    Render {
        /// Scene files or directories (searched recursively for .tscn)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file or directory.
        /// If omitted: {input_dir}/{stem}.png
        /// If file (single scene): output.png
        /// If file (multiple): output_{stem}.png
        /// If directory (ends with /): dir/{stem}.png
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per cell edge (1-128, default from config or 10)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=128))]
        scale: Option<u32>,

        /// Extra JSON palette registry, merged over the configured one
        #[arg(long)]
        palettes: Option<PathBuf>,

        /// Write a single contact sheet instead of one PNG per scene
        #[arg(long)]
        sheet: bool,

        /// Contact sheet columns (default from config or 4)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        columns: Option<u32>,

        /// Strict mode: fail if any scene has no preview
        #[arg(long)]
        strict: bool,
    },

    /// Print a JSON report on a scene's cells and palette
    Inspect {
        /// Scene file
        input: PathBuf,

        /// Include the fill instructions
        #[arg(long)]
        fills: bool,

        /// Pixels per cell edge for the fill list (1-128)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=128))]
        scale: Option<u32>,

        /// Extra JSON palette registry, merged over the configured one
        #[arg(long)]
        palettes: Option<PathBuf>,
    },

    /// List and inspect registered palettes
    Palettes {
        #[command(subcommand)]
        action: PaletteAction,

        /// Extra JSON palette registry, merged over the configured one
        #[arg(long, global = true)]
        palettes: Option<PathBuf>,
    },

    /// Watch a directory and re-render previews on change
    Watch {
        /// Directory to watch
        dir: PathBuf,

        /// Output directory (default: next to each scene)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pixels per cell edge (1-128, default from config or 10)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=128))]
        scale: Option<u32>,

        /// Extra JSON palette registry, merged over the configured one
        #[arg(long)]
        palettes: Option<PathBuf>,
    },
}

/// Why the configuration or registry could not be prepared
#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to load palettes: {0}")]
    Registry(#[from] RegistryError),
}

/// Loaded configuration and the palette registry built from it
pub(crate) struct Session {
    pub config: GridpaintConfig,
    pub registry: PaletteRegistry,
}

impl Session {
    pub fn load(config_path: Option<&Path>, extra_palettes: Option<&Path>) -> Result<Self, SessionError> {
        let loaded = load_config(config_path)?;
        let registry = build_registry(&loaded.config, &loaded.root, extra_palettes)?;
        Ok(Self { config: loaded.config, registry })
    }

    /// CLI scale, else the configured default
    pub fn scale(&self, arg: Option<u32>) -> u32 {
        arg.unwrap_or(self.config.defaults.scale)
    }
}

/// Install the stderr log subscriber.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "gridpaint=warn",
        1 => "gridpaint=info",
        _ => "gridpaint=debug",
    };

    // a second install (tests calling run twice) is ignored
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .try_init();
}

fn open_session(config: Option<&Path>, palettes: Option<&Path>) -> Result<Session, ExitCode> {
    Session::load(config, palettes).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_ERROR)
    })
}

/// Entry point for the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Render { inputs, output, scale, palettes, sheet, columns, strict } => {
            let session = match open_session(config, palettes.as_deref()) {
                Ok(session) => session,
                Err(code) => return code,
            };
            let options = render::RenderOptions {
                output: output.as_deref(),
                scale: session.scale(scale),
                sheet,
                columns: columns.unwrap_or(session.config.defaults.columns),
                strict,
            };
            render::run_render(&session, &inputs, &options)
        }
        Commands::Inspect { input, fills, scale, palettes } => {
            match open_session(config, palettes.as_deref()) {
                Ok(session) => inspect::run_inspect(&session, &input, fills, session.scale(scale)),
                Err(code) => code,
            }
        }
        Commands::Palettes { action, palettes: extra } => match open_session(config, extra.as_deref()) {
            Ok(session) => palettes::run_palettes(&session.registry, action),
            Err(code) => code,
        },
        Commands::Watch { dir, output, scale, palettes } => {
            match open_session(config, palettes.as_deref()) {
                Ok(session) => watch::run_watch(session, dir, output, scale),
                Err(code) => code,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_render_flags() {
        let cli = Cli::try_parse_from([
            "gridpaint", "-vv", "render", "a.tscn", "levels", "--scale", "4", "--sheet", "--columns", "3",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Render { inputs, scale, sheet, columns, strict, .. } => {
                assert_eq!(inputs, vec![PathBuf::from("a.tscn"), PathBuf::from("levels")]);
                assert_eq!(scale, Some(4));
                assert!(sheet);
                assert_eq!(columns, Some(3));
                assert!(!strict);
            }
            _ => panic!("expected render"),
        }
    }

    #[test]
    fn test_scale_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["gridpaint", "render", "a.tscn", "--scale", "0"]).is_err());
        assert!(Cli::try_parse_from(["gridpaint", "render", "a.tscn", "--scale", "129"]).is_err());
        assert!(Cli::try_parse_from(["gridpaint", "render", "a.tscn", "--scale", "128"]).is_ok());
    }

    #[test]
    fn test_render_requires_input() {
        assert!(Cli::try_parse_from(["gridpaint", "render"]).is_err());
    }

    #[test]
    fn test_global_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["gridpaint", "palettes", "list", "--config", "my.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_session_scale_falls_back_to_config() {
        let mut config = GridpaintConfig::default();
        config.defaults.scale = 7;
        let session = Session { config, registry: PaletteRegistry::new() };
        assert_eq!(session.scale(None), 7);
        assert_eq!(session.scale(Some(2)), 2);
    }
}
