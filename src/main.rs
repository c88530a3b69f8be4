use std::io::Write;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::Parser;
use colored::*;

mod batch;
mod helper;
mod recolor;

use batch::{process, FsStore, ItemOutcome};
use recolor::TargetColor;

#[derive(Parser, Debug)]
#[command(
    name = "sprite-recolor",
    version,
    about = "Flatten sprites to a single color while keeping their alpha shape"
)]
struct Cli {
    /// Input images (png, tiff or jpeg)
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// Target color as hex, RRGGBB or RRGGBBAA (leading '#' accepted)
    #[arg(short, long, default_value = "FFFFFFFF")]
    color: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (r, g, b, a) = helper::parse_hex_color(&cli.color)
        .map_err(|e| anyhow!("invalid --color '{}': {}", cli.color, e))?;
    let target = TargetColor::from_rgba8(r, g, b, a);

    let items: Vec<PathBuf> = cli
        .images
        .iter()
        .map(|p| helper::resolve_full_path(p))
        .collect();

    let mut store = FsStore;
    let report = process(&items, &target, &mut store, |index, total| {
        let current = index + 1;
        let percentage = (current as f64 / total as f64) * 100.0;
        print!(
            "\rProcessing image #{} / {} ({:.2}%)",
            current, total, percentage
        );
        std::io::stdout().flush().unwrap();
    });

    // Finish progress line
    println!();

    let Some(report) = report else {
        println!("{}", "No images selected, nothing to do".yellow());
        return Ok(());
    };

    let skipped: Vec<&ItemOutcome> = report
        .log
        .iter()
        .filter(|o| matches!(o, ItemOutcome::NotAnImage(_)))
        .collect();
    if !skipped.is_empty() {
        println!("{}", "Skipped (not images):".yellow());
        for outcome in skipped {
            println!(" - {}", outcome);
        }
    }

    let failed: Vec<&ItemOutcome> = report
        .log
        .iter()
        .filter(|o| matches!(o, ItemOutcome::EncodeFailed(_) | ItemOutcome::IoFailed(..)))
        .collect();
    if !failed.is_empty() {
        println!("{}", "Failed:".red());
        for outcome in failed {
            println!(" - {}", outcome);
        }
    }

    if report.is_clean() {
        println!(
            "{}",
            format!("Successfully processed {} images", report.processed).green()
        );
    } else {
        println!("{}", report.summary());
    }

    Ok(())
}
