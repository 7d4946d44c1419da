use anyhow::Context;
use clap::Parser;
use senkyo_sim::core::ConfigProvider;
use senkyo_sim::utils::{logger, validation::Validate};
use senkyo_sim::{ElectionPipeline, LocalStorage, SimulationEngine, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-sim")]
#[command(about = "Election simulator driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "sim-config.toml")]
    config: String,

    /// Override the seed from config
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of runs from config
    #[arg(long)]
    runs: Option<usize>,

    /// Enable monitoring regardless of config
    #[arg(long)]
    monitor: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON log lines on stderr
    #[arg(long)]
    log_json: bool,

    /// Dry run - show the resolved configuration without simulating
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based election simulator");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 應用命令列覆蓋設定
    config.apply_overrides(args.seed, args.runs, args.monitor);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be simulated");
        return Ok(());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = ElectionPipeline::new(storage, config);
    let engine = SimulationEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ Simulation completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Simulation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let source = |location: Option<&str>| location.unwrap_or("(built-in default)").to_string();

    println!("📋 Configuration Summary:");
    println!("  Simulation: {}", config.name());
    if let Some(description) = &config.simulation.description {
        println!("  Description: {}", description);
    }
    match config.seed() {
        Some(seed) => println!("  Seed: {}", seed),
        None => println!("  Seed: (random, recorded in the report)"),
    }
    println!("  Runs: {}", config.runs());
    println!();
    println!("📡 Sources:");
    println!("  Parties: {}", source(config.party_roster()));
    println!("  Officeholders: {}", source(config.officeholders()));
    println!("  Demographics: {}", source(config.demographics()));
    println!("  Regions: {}", source(config.region_table()));
    println!();
    println!("💾 Output:");
    println!("  Path: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if let Some(archive) = config.archive_name() {
        println!("  Compression: {} (ZIP)", archive);
    }
    println!("  Monitoring: {}", config.monitoring_enabled());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}
