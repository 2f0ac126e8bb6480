use anyhow::Context;
use clap::Parser;
use survey_tally::core::ConfigProvider;
use survey_tally::utils::logger::{self, LogFormat};
use survey_tally::utils::validation::Validate;
use survey_tally::{EtlEngine, FilterPipeline, LocalStorage, TallyConfig};

#[derive(Parser)]
#[command(name = "explorer-sum")]
#[command(about = "Sum the length of every leg whose explorer list mentions a name")]
struct Args {
    /// TMLU file to scan (defaults to survey.tmlu or [filter] file)
    file: Option<String>,

    /// Text to look for inside the <Explorer> span
    #[arg(short, long)]
    needle: Option<String>,

    /// Optional TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Write the summary here instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    #[arg(long, value_enum, default_value = "compact")]
    log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, args.log_format);
    tracing::info!("Starting explorer-sum");

    // Config file, then command-line overrides
    let mut config = TallyConfig::load(args.config.as_deref())
        .with_context(|| format!("could not load {:?}", args.config))?;

    if let Some(file) = args.file {
        config.filter.file = file;
    }
    if let Some(needle) = args.needle {
        config.filter.needle = Some(needle);
    }
    if let Some(output) = args.output {
        config.report.output = Some(output);
    }

    // Validate
    if let Err(e) = config.validate().and_then(|_| config.require_needle().map(|_| ())) {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
    tracing::info!(
        "Scanning {} for explorer {:?}",
        config.filter_file(),
        config.filter_needle()
    );

    let storage = LocalStorage::current_dir();
    let pipeline = FilterPipeline::new(storage, config.clone())?;
    let engine = EtlEngine::new(pipeline);

    let summary = engine.run().await.context("explorer sum failed")?;

    match config.output_path() {
        Some(path) => tracing::info!("Summary saved to {}", path),
        None => print!("{}", summary),
    }

    Ok(())
}
