//! gridpaint - Command-line tool for previewing Godot GridMap paintings

use std::process::ExitCode;

use gridpaint::cli;

fn main() -> ExitCode {
    cli::run()
}
