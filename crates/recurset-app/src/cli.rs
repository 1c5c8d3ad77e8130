use std::path::PathBuf;

use clap::Parser;

/// Expand a recurrence set described by a JSON job file.
#[derive(Debug, Parser)]
#[command(name = "recurset", version, about)]
pub struct Cli {
    /// Path to the JSON job file.
    pub job: PathBuf,

    /// Print the set as a single JSON-encoded text instead of content lines.
    #[arg(long)]
    pub text: bool,
}
