use std::path::PathBuf;

use log_analysis::{DEFAULT_LOG_PATH, Histogram, Summary, parse_log, read_log};

fn main() -> anyhow::Result<()> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_PATH));

    println!("Reading '{}'", path.display());
    let contents = read_log(&path)?;

    let parsed = parse_log(&contents);
    for skipped in &parsed.skipped {
        eprintln!(
            "line {}: no duration found, skipped: '{}'",
            skipped.line_number, skipped.text
        );
    }

    let (Some(summary), Some(histogram)) = (
        Summary::from_durations(&parsed.durations),
        Histogram::new(&parsed.durations),
    ) else {
        println!("No valid duration in '{}', nothing to analyse", path.display());
        return Ok(());
    };

    println!();
    println!("{summary}");
    println!();
    print!("{histogram}");
    Ok(())
}
