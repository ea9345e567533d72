//! Command-line interface for studio-scene.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "studio-scene", version, about = "Office scene host for the studio site")]
pub struct Cli {
    /// Config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum CliCommand {
    /// Open the scene window with a stdin console (the default).
    Run,
    /// Navigate through paths without a window and print the final state as JSON.
    Route {
        #[arg(required = true)]
        paths: Vec<String>,
        /// Scroll offset (px) to start from.
        #[arg(long, default_value_t = 0.0)]
        scroll: f32,
        /// Frames to run after each navigation.
        #[arg(long, default_value_t = 240)]
        frames: u64,
        /// Fixed frame step in seconds.
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
    /// Print the camera state table as JSON.
    Scenes,
    /// Fetch a page from the CMS and print it as JSON.
    Page { slug: String },
    /// Subscribe an address to the newsletter.
    Subscribe { email: String },
    /// Send a contact-form message.
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        budget: Option<String>,
        #[arg(long)]
        message: String,
    },
}

impl Cli {
    pub fn command(&self) -> CliCommand {
        self.command.clone().unwrap_or(CliCommand::Run)
    }
}
