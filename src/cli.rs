use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Debugging tool for inspecting composed feeds
#[derive(Parser)]
#[command(name = "mosaic")]
#[command(about = "Compose a media feed from page documents and print it", long_about = None)]
pub struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mount a feed view and print its rendered blocks
    Show {
        /// Base URL or directory holding the page documents
        #[arg(short, long)]
        data: Option<String>,
        /// Also fetch the next page
        #[arg(long)]
        load_more: bool,
        /// Also fetch the previous page
        #[arg(long)]
        refresh: bool,
        /// Print blocks as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the ad slots for a page with the given number of images
    Slots {
        images: usize,
    },
}
