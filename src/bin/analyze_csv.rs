use clap::Parser;
use finhealth::config::load_or_default;
use finhealth::config::toml_config::AppConfig;
use finhealth::domain::ports::Storage;
use finhealth::utils::error::ErrorSeverity;
use finhealth::utils::{logger, validation::Validate};
use finhealth::{AnalysisPipeline, AnthropicInsights, FileSink, LocalStorage, ReportEngine};

#[derive(Parser)]
#[command(name = "finhealth-report")]
#[command(about = "Analyze a transactions CSV and write the JSON and PDF report to disk")]
struct Args {
    /// Transactions CSV with date, revenue and expense columns
    #[arg(short, long)]
    input: String,

    /// Directory for <report_id>.json and <report_id>.pdf (overrides report.output_path)
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Skip the language model and use the rule-based narrative
    #[arg(long)]
    no_ai: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    monitor: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Analyzing {}", args.input);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let (input_storage, input_name) = LocalStorage::for_file(&args.input)?;
    let source = input_storage.read_file(&input_name).await.map_err(|e| {
        anyhow::anyhow!("failed to read input file '{}': {}", args.input, e)
    })?;

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.report.output_path.clone());
    let insights = AnthropicInsights::from_config(&config.insights)?;
    let pipeline = AnalysisPipeline::new(insights, FileSink::new(storage), config.thresholds);
    let engine = ReportEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run(&source).await {
        Ok(output) => {
            let metrics = &output.report.metrics;
            tracing::info!("✅ Analysis completed successfully!");
            println!("✅ Analysis completed successfully!");
            println!("  Report ID:    {}", output.report.report_id);
            println!("  Credit score: {}", metrics.credit_score);
            println!("  Risk level:   {}", metrics.risk_level);
            println!("  Margin:       {}%", metrics.margin);
            println!("  Insights:     {}", output.report.insight_source);
            println!("📁 Report saved to: {}", output.location);
        }
        Err(e) => {
            tracing::error!(
                "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> finhealth::Result<AppConfig> {
    let mut config = load_or_default(args.config.as_deref())?;

    if let Some(dir) = &args.output_dir {
        config.report.output_path = dir.clone();
    }
    if args.no_ai {
        config.insights.enabled = false;
    }
    config.insights.resolve_api_key_from_env();

    config.validate()?;
    Ok(config)
}
