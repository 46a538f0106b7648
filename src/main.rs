use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use guide_normalizer::fetch::{FetchConfig, DEFAULT_ENDPOINT, DEFAULT_NID};
use guide_normalizer::normalize::{NormalizeOptions, TitlePolicy};
use guide_normalizer::pipeline::DEFAULT_OUTPUT_DIR;
use guide_normalizer::{init_logger, run, RunOptions, RunOutcome};

/// Fetch the TV guide and split it into per-channel JSON files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Network id passed upstream as `nid`
    #[arg(long, env = "FREELY_NID", default_value = DEFAULT_NID)]
    nid: String,

    /// UNIX timestamp (UTC) of the day start
    #[arg(long, env = "FREELY_START", value_parser = clap::value_parser!(i64).range(1..))]
    start: i64,

    /// Output folder
    #[arg(long, env = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// Guide API endpoint
    #[arg(long, env = "FREELY_API", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// How primary and secondary titles map to name/description
    #[arg(long, env = "TITLE_POLICY", default_value_t = TitlePolicy::Separate)]
    title_policy: TitlePolicy,

    /// Fetch but do not write outputs
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger();

    let options = RunOptions {
        nid: args.nid,
        start: args.start,
        out_dir: args.out,
        dry_run: args.dry_run,
        normalize: NormalizeOptions {
            title_policy: args.title_policy,
        },
        fetch: FetchConfig::default().with_endpoint(args.endpoint),
    };

    match run(&options)? {
        RunOutcome::Written(index) => {
            println!(
                "Wrote {} channels to {}",
                index.channels.len(),
                options.out_dir.display()
            );
        }
        RunOutcome::DryRun { channels } => {
            println!("Dry run: {} channels found, nothing written", channels);
        }
        RunOutcome::Degraded { marker, error } => {
            // Degraded runs still exit 0.
            eprintln!("guide fetch failed: {}", error);
            if let Some(marker) = marker {
                eprintln!("error marker written to {}", marker.display());
            }
        }
    }

    Ok(())
}
