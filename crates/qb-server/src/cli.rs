use std::path::PathBuf;

use clap::Parser;
use qb_config::ConfigOverrides;

/// Command-line flags for the `quotebook` binary.
///
/// Every setting flag is optional; unset flags fall back to the environment,
/// `quotebook.toml` and the built-in defaults, in that order.
#[derive(Debug, Parser)]
#[command(name = "quotebook", version, about = "Quotebook - a shared book of silly quotes")]
pub struct Cli {
    /// Where to store the quotes
    #[arg(short = 'f', long)]
    pub quotes_dir: Option<PathBuf>,

    /// Password required to submit a quote
    #[arg(short, long)]
    pub password: Option<String>,

    /// Address to listen on, e.g. 0.0.0.0:8990
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Number of worker threads
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            quotes_dir: self.quotes_dir.clone(),
            password: self.password.clone(),
            listen: self.listen.clone(),
            workers: self.workers,
        }
    }
}
