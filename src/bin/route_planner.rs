use anyhow::Context;
use clap::Parser;
use flight_routes_etl::core::Storage;
use flight_routes_etl::planner::{self, Algorithm, RouteGraph};
use flight_routes_etl::utils::logger;
use flight_routes_etl::LocalStorage;
use std::path::Path;

#[derive(Parser)]
#[command(name = "route-planner")]
#[command(about = "Find the shortest itinerary over a routes-with-distances CSV")]
struct Args {
    /// CSV written by flight-routes-etl
    #[arg(short, long, default_value = "routes_with_distances.csv")]
    input: String,

    /// Source airport IATA code
    #[arg(long)]
    from: String,

    /// Destination airport IATA code
    #[arg(long)]
    to: String,

    #[arg(long, value_enum, default_value_t = Algorithm::Dijkstra)]
    algorithm: Algorithm,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let input = Path::new(&args.input);
    let file_name = input
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid input path: {}", args.input))?;
    let storage = LocalStorage::new(input.parent().unwrap_or_else(|| Path::new(".")));

    let data = storage
        .read_file(file_name)
        .await
        .with_context(|| format!("Failed to read {}", args.input))?;
    let rows = planner::read_rows(&data)?;
    let graph = RouteGraph::from_rows(&rows)?;
    tracing::info!(
        "🗺️ Loaded {} airports and {} legs from {}",
        graph.airport_count(),
        graph.leg_count(),
        args.input
    );

    let from = args.from.to_uppercase();
    let to = args.to.to_uppercase();

    match graph.shortest_path(&from, &to, args.algorithm) {
        Ok(Some(path)) if path.legs() > 0 => {
            println!("Optimized path: {}", path.airports.join(" -> "));
            println!("Legs: {}", path.legs());
            println!("Total distance: {}", path.total);
        }
        Ok(_) => {
            println!("No valid path found between {} and {}", from, to);
        }
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
