//! Replay command handler.

use sitewatch::config::SitewatchConfig;
use sitewatch::services::replay_lines;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;
use std::time::Duration;

/// Replay command.
///
/// Reads events from `file` (stdin when `None`) and writes decisions to
/// stdout. The summary goes to stderr so stdout stays machine-readable.
pub fn cmd_replay(
    config: &SitewatchConfig,
    file: Option<PathBuf>,
    window_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dedup = config.dedup.clone();
    if let Some(secs) = window_secs {
        dedup = dedup.with_default_window(Duration::from_secs(secs));
    }

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());

    let summary = match file {
        Some(path) => {
            let input = File::open(&path)
                .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
            replay_lines(BufReader::new(input), writer, dedup)?
        },
        None => replay_lines(io::stdin().lock(), writer, dedup)?,
    };

    eprintln!(
        "{} events: {} allowed, {} suppressed",
        summary.total, summary.allowed, summary.suppressed
    );

    Ok(())
}
