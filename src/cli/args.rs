//! CLI argument parsing using clap.
//!
//! Contains the `Cli` struct and the `Commands` enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Object graph serializer for HDF5 containers.
#[derive(Parser)]
#[command(
    name = "h5graph",
    version = env!("CARGO_PKG_VERSION"),
    about = "Persist and inspect object graphs stored in HDF5 containers",
    long_about = "Save and load arbitrary value graphs to and from HDF5 containers, preserving type, identity and topology.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to a custom settings.toml file
    #[arg(short, long, global = true, env = "H5GRAPH_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Show detailed loading information
    #[arg(long, global = true)]
    pub info: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a `.h5graph` directory with default configuration
    #[command(about = "Set up .h5graph directory with default configuration")]
    Init {
        /// Force overwrite of an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration settings
    #[command(about = "Display active settings from .h5graph/settings.toml")]
    Config,

    /// Inspect the structure of an HDF5 container written by this crate
    #[command(
        about = "Print the node tree, tags and identities stored in a container",
        after_help = "Examples:\n  h5graph inspect graph.h5\n  h5graph inspect graph.h5 --json"
    )]
    Inspect {
        /// Path to the HDF5 file
        path: PathBuf,

        /// Output as JSON instead of a tree
        #[arg(long)]
        json: bool,

        /// Maximum depth to print (unlimited if omitted)
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,
    },

    /// Verify that a container round-trips without a registered symbol resolver
    #[command(
        about = "Walk a container and report unresolved tags, dangling links and non-contiguous lists",
        after_help = "Examples:\n  h5graph verify graph.h5"
    )]
    Verify {
        /// Path to the HDF5 file
        path: PathBuf,
    },
}
