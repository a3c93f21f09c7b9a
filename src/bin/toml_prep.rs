use churn_prep::core::table_io::read_csv;
use churn_prep::core::{ConfigProvider, Storage};
use churn_prep::utils::{logger, validation::Validate};
use churn_prep::{ColumnRole, CsvPipeline, EtlEngine, LocalStorage, Schema, TomlConfig};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-prep")]
#[command(about = "Churn table preprocessing driven by a TOML configuration")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "churn-prep.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Show the resolved column roles without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // Logging
    if config.json_logs() {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.severity().exit_code().max(1));
    }

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No output will be written");
        perform_dry_run(&config).await?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = CsvPipeline::new(LocalStorage::default(), config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Preprocessing completed successfully!");
            println!("✅ Preprocessing completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Preprocessing failed: {} (Category: {:?}, Severity: {:?})",
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
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Input: {}", config.input_file());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));
    println!("  ZIP Bundle: {}", config.zip_output());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(config: &TomlConfig) -> Result<(), Box<dyn std::error::Error>> {
    let data = LocalStorage::default().read_file(config.input_file()).await?;
    let table = read_csv(&data)?;
    let schema = Schema::resolve(&table);

    println!("🔍 Dry Run Analysis:");
    println!(
        "  Input table: {} rows x {} columns",
        table.row_count(),
        table.column_count()
    );
    println!();
    println!("🧭 Column Roles:");
    for (name, role) in schema.iter() {
        let description = match role {
            ColumnRole::Dropped => "dropped".to_string(),
            ColumnRole::ImputedCategorical { fill } => {
                format!("categorical, missing -> '{}'", fill)
            }
            ColumnRole::NumericText => "numeric text, unparseable -> 0".to_string(),
            ColumnRole::Label => "label, kept as-is".to_string(),
            ColumnRole::Categorical => "categorical".to_string(),
            ColumnRole::Numeric => "numeric, passed through".to_string(),
        };
        println!("  {:<40} {}", name, description);
    }

    println!();
    println!("✅ Dry run analysis complete.");
    Ok(())
}
