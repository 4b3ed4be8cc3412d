//! Command-line playlist scraper built on the iptv_dl library.

use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use iptv_dl::{Config, HttpSourceProvider, PlaylistScraper, PlaylistWriter, TimeWindow};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "iptv-dl")]
#[command(about = "Scrape and download IPTV playlists for a set of TV channels")]
#[command(version)]
struct Cli {
    /// TV channel to search for (repeat for multiple channels)
    #[arg(
        short,
        long = "channel",
        value_name = "NAME",
        default_value = "sky calcio"
    )]
    channels: Vec<String>,

    /// The timespan in which to search for playlists: H (last hour),
    /// D (last day), W (last week)
    #[arg(
        short = 't',
        long,
        value_name = "H|D|W",
        default_value = "D",
        value_parser = parse_window
    )]
    timespan: TimeWindow,

    /// Base URL of the playlist search service
    #[arg(short = 'u', long, value_name = "URL")]
    base_url: String,

    /// Directory under which the dated output directory is created
    #[arg(short = 'o', long, value_name = "DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Run program with debug information turned on
    #[arg(short, long)]
    debug: bool,
}

fn parse_window(s: &str) -> Result<TimeWindow, String> {
    TimeWindow::from_str(s).map_err(|e| e.to_string())
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "iptv_dl=debug,info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    if cli.debug {
        println!("Debug mode active");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "run failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> iptv_dl::Result<()> {
    let start = Instant::now();

    let mut config = Config::default();
    config.scrape.channels = cli.channels;
    config.scrape.time_window = cli.timespan;
    config.output.base_dir = cli.output_dir;
    config.provider.base_url = cli.base_url;

    let provider = Arc::new(HttpSourceProvider::new(&config.provider)?);
    let scraper = PlaylistScraper::new(config.clone(), provider)?;

    // progress observer: renders events as they arrive, never awaited and
    // never able to block the run
    let mut events = scraper.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if let Ok(json) = serde_json::to_string(&event) {
                tracing::debug!(event = %json, "progress");
            }
        }
    });

    // Ctrl-C cancels the in-flight run; workers report Cancelled and the
    // run fails without leaking tasks
    let interrupted = scraper.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling scrape");
            interrupted.shutdown();
        }
    });

    println!("Scraping and generating playlists...");
    let playlists = scraper.run().await?;

    let writer = PlaylistWriter::new(config.output.clone());
    let persisted = writer.persist(&playlists).await?;

    let elapsed = start.elapsed().as_secs_f64();
    if playlists.is_empty() {
        println!("\nNo playlists found!");
    } else {
        let plural = if playlists.len() == 1 { "" } else { "s" };
        println!(
            "\nSuccessfully downloaded {} playlist{} to {} in {:.2} seconds!",
            playlists.len(),
            plural,
            persisted.directory.display(),
            elapsed
        );
    }
    Ok(())
}
