use clap::Parser;
use hhi_etl::config::toml_config::TomlConfig;
use hhi_etl::core::period::split_by_cutoff;
use hhi_etl::core::{ConfigProvider, Pipeline};
use hhi_etl::utils::{logger, validation::Validate};
use hhi_etl::{EtlEngine, HhiPipeline, LocalStorage};

#[derive(Parser)]
#[command(name = "toml-hhi")]
#[command(about = "HHI comparison driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "hhi-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the cutoff date from config (YYYY-MM-DD)
    #[arg(long)]
    cutoff: Option<String>,

    /// Override the domain key length from config
    #[arg(long)]
    digits: Option<usize>,

    /// Read and partition the input without writing any output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    logger::init(args.verbose, args.json_logs, config.log_level());

    tracing::info!("🚀 Starting TOML-based HHI comparison");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(cutoff) = args.cutoff.clone() {
        tracing::info!("🔧 Cutoff overridden to: {}", cutoff);
        config.analysis.cutoff = Some(cutoff);
    }
    if let Some(digits) = args.digits {
        tracing::info!("🔧 Digits overridden to: {}", digits);
        config.analysis.digits = Some(digits);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = HhiPipeline::new(storage, config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&pipeline).await?;
        return Ok(());
    }

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            println!("✅ HHI comparison completed");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ HHI comparison failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Analysis: {}", config.analysis.name);
    if let Some(description) = &config.analysis.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    match config.cutoff() {
        Ok(cutoff) => println!("  Cutoff: {}", cutoff),
        Err(e) => println!("  Cutoff: invalid ({})", e),
    }
    println!("  Digits: {}", config.digits());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    if config.compress() {
        println!("  Compression: {} (ZIP)", config.bundle_filename());
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(pipeline: &HhiPipeline<LocalStorage, TomlConfig>) -> anyhow::Result<()> {
    let config = pipeline.config();
    let data = pipeline.extract().await?;
    let cutoff = config.cutoff()?;
    let split = split_by_cutoff(&data.records, cutoff);

    println!("🔍 Dry Run Analysis:");
    println!("  Rows read: {}", data.data_quality.total_rows);
    println!("  Unparseable dates: {}", data.data_quality.unparseable_dates);
    println!("  Missing supplier: {}", data.data_quality.missing_supplier);
    println!("  Records before {}: {}", cutoff, split.before.len());
    println!("  Records from {} on: {}", cutoff, split.after.len());
    println!("  Would write: {}", config.comparison_filename());
    println!();
    println!("✅ Dry run complete. Nothing was written.");

    Ok(())
}
