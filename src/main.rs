use std::{path::PathBuf, process::ExitCode};

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stopgym_finder::core::catalog::{
    build_gym_catalog, build_stop_catalog, evaluation_time, CatalogContext,
};
use stopgym_finder::{
    render_list, Document, FinderError, JsonSnapshot, LatLngBounds, ListKind, ListRequest,
    Lookups, RecordGymTraits,
};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// render a finder list for the visible part of the map
    Render {
        /// raw_data snapshot saved from the map server
        #[arg(short, long)]
        snapshot: PathBuf,
        /// visible map as swLat,swLng,neLat,neLng
        #[arg(short, long, allow_hyphen_values = true)]
        bounds: LatLngBounds,
        #[arg(short, long, default_value = "")]
        filter: String,
        #[arg(short, long, value_enum, default_value_t = ListKind::StopsGyms)]
        list: ListKind,
        /// element id to render into; defaults to the list's own container
        #[arg(short, long)]
        container: Option<String>,
        #[command(flatten)]
        lookups: LookupArgs,
    },
    /// print every stop and gym with its derived icon as JSON
    Catalog {
        #[arg(short, long)]
        snapshot: PathBuf,
        #[command(flatten)]
        lookups: LookupArgs,
    },
}

#[derive(clap::Args)]
struct LookupArgs {
    /// JSON file overriding the team token and raid image tables
    #[arg(long)]
    lookups: Option<PathBuf>,
    /// evaluate raid timers at this epoch millisecond instead of now
    #[arg(long)]
    now: Option<i64>,
}

impl LookupArgs {
    fn load(&self) -> Result<(Lookups, DateTime<Utc>), FinderError> {
        let lookups = match &self.lookups {
            Some(path) => Lookups::from_file(path)?,
            None => Lookups::default(),
        };
        Ok((lookups, evaluation_time(self.now)?))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "stopgym-finder failed");
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> Result<(), FinderError> {
    let cli = Cli::parse();
    match &cli.command {
        Some(Commands::Render {
            snapshot,
            bounds,
            filter,
            list,
            container,
            lookups,
        }) => {
            let snapshot = JsonSnapshot::from_file(snapshot)?;
            let (lookups, now) = lookups.load()?;
            let ctx = CatalogContext {
                lookups: &lookups,
                gym_traits: &RecordGymTraits,
                now,
            };
            let mut request = ListRequest::new(*list, filter.as_str());
            if let Some(id) = container {
                request.container_id = id.clone();
            }

            let mut document = Document::default();
            let rows = render_list(&snapshot, &ctx, &request, bounds, &mut document);
            tracing::info!(rows, container = %request.container_id, "rendered list");
            println!(
                "{}",
                document.inner(&request.container_id).unwrap_or_default()
            );
        }
        Some(Commands::Catalog { snapshot, lookups }) => {
            let snapshot = JsonSnapshot::from_file(snapshot)?;
            let (lookups, now) = lookups.load()?;
            let ctx = CatalogContext {
                lookups: &lookups,
                gym_traits: &RecordGymTraits,
                now,
            };
            let mut points = build_stop_catalog(&snapshot);
            points.extend(build_gym_catalog(&snapshot, &ctx));
            let json = serde_json::to_string_pretty(&points).map_err(FinderError::Serialize)?;
            println!("{json}");
        }
        None => {}
    }
    Ok(())
}
