//! litho - geological section hatching from the command line
//!
//! Usage:
//!   litho fill <svg>        Hatch the annotated layers of an SVG drawing
//!   litho section <yaml>    Render a section file (layers in meters)
//!   litho rocks             List available rock fills
//!
//! Set `RUST_LOG=debug` for per-pass fill statistics.

use clap::{Parser, Subcommand};

mod cli;

#[derive(Parser)]
#[command(name = "litho", version, about = "Geological section hatching")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Hatch layers marked with data-rock in an SVG drawing
    Fill(cli::fill::FillArgs),
    /// Render a YAML section file
    Section(cli::section::SectionArgs),
    /// List rock names and their fills
    Rocks(cli::rocks::RocksArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Fill(args) => cli::cmd_fill(&args),
        Command::Section(args) => cli::cmd_section(&args),
        Command::Rocks(args) => cli::cmd_rocks(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
