use std::io::Write;

use clap::Parser;
use recurset_app::cli::Cli;
use recurset_app::job::Job;
use recurset_app::logging;
use recurset_core::config::load_config;

fn main() -> anyhow::Result<()> {
    let filter_handle = logging::init();

    let cli = Cli::parse();
    let config = load_config()?;
    logging::apply_level(&filter_handle, &config.logging.level);

    tracing::info!(job = %cli.job.display(), "Expanding recurrence set");

    let job = Job::from_path(&cli.job)?;
    let set = job.build(config.recurrence.caching)?;
    let occurrences = job.query.run(&set, config.recurrence.limit);

    tracing::info!(count = occurrences.len(), "Expansion finished");

    let mut out = std::io::stdout().lock();
    if cli.text {
        writeln!(out, "{}", set.to_text()?)?;
    } else {
        for line in set.to_canonical_lines() {
            writeln!(out, "{line}")?;
        }
    }
    writeln!(out)?;
    for occurrence in occurrences {
        writeln!(out, "{}", occurrence.to_rfc3339())?;
    }

    Ok(())
}
