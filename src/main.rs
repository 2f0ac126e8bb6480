use anyhow::Context;
use clap::Parser;
use survey_tally::core::ConfigProvider;
use survey_tally::utils::{logger, validation::Validate};
use survey_tally::{CliConfig, EtlEngine, LocalStorage, TallyPipeline};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // Logging
    logger::init_cli_logger(cli.verbose, cli.log_format);
    tracing::info!("Starting survey-tally");

    // Config file, then command-line overrides
    let config = match cli.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    // Validate
    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if config.input_files().is_empty() {
        println!("Please provide one or more TMLU file paths as arguments.");
        return Ok(());
    }
    tracing::debug!("Resolved config: {:?}", config);

    // Storage and pipeline
    let storage = LocalStorage::current_dir();
    let pipeline = TallyPipeline::new(storage, config.clone())?;
    let engine = EtlEngine::new(pipeline);

    let report = engine.run().await.context("survey tally failed")?;

    // Report goes to stdout unless it was written to a file
    match config.output_path() {
        Some(path) => tracing::info!("Report saved to {}", path),
        None => print!("{}", report),
    }

    Ok(())
}
