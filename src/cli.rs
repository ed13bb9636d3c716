use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a plainbook.toml config file
    Config,
    /// Renders the book according to the contents of the plainbook.toml config file
    Render,
    /// Parses every chapter and prints the chapter and section outline as JSON
    Outline,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// The book directory containing plainbook.toml
    #[clap(short = 'C', long = "dir", default_value = ".", global = true)]
    pub dir: PathBuf,

    /// Increase logging verbosity (-v for info, -vv for debug)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}
