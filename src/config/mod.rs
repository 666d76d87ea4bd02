pub mod settings;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dockr")]
#[command(about = "Start, wait on and stop modules described by JSON config files")]
pub struct CliConfig {
    /// Path to the supervisor settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Start every module, then wait for all of them to exit
    Run {
        /// Module config file, or a directory of module folders
        path: Option<PathBuf>,
    },
    /// Start every module, then stop them after the grace period
    Up {
        /// Module config file, or a directory of module folders
        path: Option<PathBuf>,

        /// Grace period before a module is killed, in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Print the modules that would be supervised
    List {
        /// Module config file, or a directory of module folders
        path: Option<PathBuf>,
    },
}

#[cfg(feature = "cli")]
impl Command {
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Command::Run { path } | Command::Up { path, .. } | Command::List { path } => {
                path.as_deref()
            }
        }
    }
}
