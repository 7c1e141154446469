use std::{path::PathBuf, process::ExitCode};

use busgraph::{
    commands,
    config::{AppConfig, CliError},
    prelude::*,
};
use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Bus route finding over GTFS feeds", long_about = None)]
struct Args {
    /// TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Dataset root holding one directory per feed (overrides config and DATASET_PATH)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,
    /// Feed directory to load, may be repeated
    #[arg(long = "feed", global = true)]
    feeds: Vec<String>,
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find a path between two stops
    Route {
        origin: String,
        destination: String,
        /// `fastest`, anything else searches for the fewest stops
        #[arg(short, long, default_value = "fastest")]
        mode: String,
        /// Print the itinerary as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: bool,
    },
    /// Search stops by name or id
    Stops {
        #[arg(short, long, default_value = "")]
        search: String,
        /// minLat,minLon,maxLat,maxLon
        #[arg(long)]
        bbox: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Closest stop to a coordinate
    Nearest {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
    },
    /// Graph size summary
    Stats,
}

fn run(args: Args) -> Result<(), CliError> {
    let config = AppConfig::load(args.config.as_deref())?.with_overrides(args.dataset, args.feeds);
    let mut store = commands::open_store(&config);

    let output = match args.cmd {
        Command::Route {
            origin,
            destination,
            mode,
            geojson,
        } => commands::route(
            &mut store,
            &origin,
            &destination,
            SearchMode::from(mode.as_str()),
            geojson,
        )?,
        Command::Stops {
            search,
            bbox,
            limit,
        } => {
            let mut query = StopQuery::search(search);
            if let Some(bbox) = bbox {
                query = query.with_bbox(commands::parse_bbox(&bbox)?);
            }
            if let Some(limit) = limit {
                query = query.with_limit(limit);
            }
            commands::stops(&mut store, &query)?
        }
        Command::Nearest { lat, lon } => commands::nearest(&mut store, lat, lon)?,
        Command::Stats => commands::stats(&mut store)?,
    };

    let text = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
