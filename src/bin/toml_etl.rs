use clap::Parser;
use flight_routes_etl::config::toml_config::TomlConfig;
use flight_routes_etl::core::ConfigProvider;
use flight_routes_etl::domain::model::UnmatchedPolicy;
use flight_routes_etl::utils::{logger, validation::Validate};
use flight_routes_etl::{EtlEngine, LocalStorage, RouteDistancePipeline};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Route distance ETL driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "etl-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the unmatched-route policy from config
    #[arg(long, value_enum)]
    unmatched: Option<UnmatchedPolicy>,

    /// Show what would be processed without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init_logger(args.verbose, config.log_json());
    tracing::info!("🚀 Starting TOML-based route distance ETL");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(policy) = args.unmatched {
        config.transform.unmatched_routes = policy;
        tracing::info!("🔧 Unmatched-route policy overridden to: {:?}", policy);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = RouteDistancePipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ Routes with distances saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Airports: {}", config.airports_url());
    println!("  Routes: {}", config.routes_url());
    println!("  Output: {}/{}", config.output_path(), config.output_file());
    println!("  Unmatched routes: {:?}", config.unmatched_policy());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Data Sources:");
    println!("  GET {}", config.airports_url());
    println!("  GET {}", config.routes_url());

    if let Some(timeout) = config.request_timeout_seconds() {
        println!("  Timeout: {}s per request", timeout);
    }
    if let Some(headers) = config.request_headers() {
        println!("  Headers: {} custom headers", headers.len());
    }

    println!();
    println!("⚙️ Processing:");
    println!("  Join routes to airports on IATA code (source and destination)");
    println!("  Great-circle distance: haversine, R = 6371 km");
    match config.unmatched_policy() {
        UnmatchedPolicy::Drop => println!("  Routes without both airports: dropped"),
        UnmatchedPolicy::Keep => println!("  Routes without both airports: kept with empty distance"),
    }

    println!();
    println!("💾 Output:");
    println!("  {}/{}", config.output_path(), config.output_file());

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
