use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{ArgGroup, CommandFactory, Parser};
use navcore::config::ClientConfig;
use navcore::http_client::HttpBackend;
use navcore::models::{Coordinate, RouteDescriptor};
use navcore::provider::RouteProvider;
use navcore::replay::{read_json, replay, ReplayReport};
use navcore::NavError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Replay a recorded GPS trace against a flood-aware route"
)]
#[command(group(ArgGroup::new("source").required(true).args(["route", "origin"])))]
struct Args {
    /// Route JSON file (a serialized route descriptor)
    #[arg(long, conflicts_with_all = ["origin", "destination"])]
    route: Option<PathBuf>,

    /// Fetch the route from the backend instead of reading a file
    #[arg(long, requires = "destination")]
    origin: Option<String>,
    #[arg(long, requires = "origin")]
    destination: Option<String>,

    /// Overrides FLOODNAV_API_ROOT
    #[arg(long)]
    api_root: Option<String>,

    /// JSON array of {"lat", "lng"} fixes
    #[arg(long)]
    trace: PathBuf,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "navcore=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let route = load_route(&args).await?;
    let trace: Vec<Coordinate> = read_json(&args.trace)?;
    tracing::info!(fixes = trace.len(), "replaying trace from {:?}", args.trace);

    let report = replay(route, &trace).map_err(NavError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

async fn load_route(args: &Args) -> Result<RouteDescriptor, NavError> {
    match (&args.route, &args.origin, &args.destination) {
        (Some(path), _, _) => read_json(path),
        (None, Some(origin), Some(destination)) => {
            let mut config = ClientConfig::from_env()?;
            if let Some(root) = &args.api_root {
                config = config.with_api_root(root.as_str())?;
            }
            tracing::info!("requesting route from {}", config.api_root);
            let backend = HttpBackend::new(config)?;
            Ok(backend.request_route(origin, destination).await?)
        }
        // Already rejected by the "source" group during parsing.
        _ => Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "pass --route or both --origin and --destination",
            )
            .exit(),
    }
}

fn print_report(report: &ReplayReport) {
    println!(
        "path: {} points, {:.0} m",
        report.path_points, report.path_length_m
    );
    if let Some(place) = &report.rescue_destination {
        println!("rescue route to {} ({})", place.label, place.category);
    }

    for (fix, entry) in report.fixes.iter().enumerate() {
        match (entry.step_index, &entry.instruction) {
            (Some(index), Some(instruction)) => println!(
                "#{fix:<4} step {index:<3} {:>8.0} m  {instruction}",
                entry.distance_m
            ),
            _ => println!("#{fix:<4} {:>8.0} m to destination", entry.distance_m),
        }
    }

    let risk = &report.risk;
    if risk.is_clear() {
        println!("risk: no flood warnings along the route");
        return;
    }
    println!(
        "risk: {} (score {:.0}, {} warning(s))",
        risk.level.as_str(),
        risk.overall_score,
        risk.warnings.len()
    );
    for warning in &risk.warnings {
        println!(
            "  {:>8} {:>5.0}  {:.5},{:.5}  {}",
            warning.level().as_str(),
            warning.display_score(),
            warning.location().lat,
            warning.location().lon,
            warning.recommendation()
        );
    }
}
