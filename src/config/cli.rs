use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::target::TargetPolicy;

#[derive(Parser)]
#[command(name = "deep-click")]
#[command(about = "Turn trackpad force clicks into command-clicks in selected apps")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Which application decides whether a force click is translated
    /// (frontmost, event-owner)
    #[arg(long, value_parser = clap::value_parser!(TargetPolicy))]
    pub target: Option<TargetPolicy>,

    /// File listing the selected applications, one name per line
    #[arg(long, env = "DEEPCLICK_APPS_FILE")]
    pub apps_file: Option<PathBuf>,

    /// Also translate force clicks in this application (repeatable, not saved)
    #[arg(long = "app", value_name = "NAME")]
    pub apps: Vec<String>,

    /// Path to config file
    #[arg(long, env = "DEEPCLICK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show or change the selected applications
    Apps {
        #[command(subcommand)]
        action: AppsCommand,
    },
    /// Print pressure and left-button events without translating them
    Dump,
}

#[derive(Subcommand)]
pub enum AppsCommand {
    /// List the selected applications
    List,
    /// Select an application
    Add {
        /// Application name as shown in the Dock or menu bar
        name: String,
    },
    /// Deselect an application
    Remove {
        /// Application name as shown in the Dock or menu bar
        name: String,
    },
    /// Select an application if it is not selected, deselect it otherwise
    Toggle {
        /// Application name as shown in the Dock or menu bar
        name: String,
    },
}
