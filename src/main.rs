use anyhow::Context;
use clap::Parser;
use wms_preview::utils::error::ErrorSeverity;
use wms_preview::utils::{logger, validation::Validate};
use wms_preview::{
    AttachmentMode, CliConfig, ConsoleAttachmentSink, HttpCapabilitiesSource, PreviewConfig,
    PreviewService, SearchOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let mut config = match &cli.config {
        Some(path) => PreviewConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => PreviewConfig::default(),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("{}", e.user_friendly_message());
        std::process::exit(1);
    }

    let source = HttpCapabilitiesSource::new(config.timeout(), config.user_agent())?;
    let service = PreviewService::from_config(source, &config);
    let mode = AttachmentMode::from(cli.mode);

    let choices = match service.search(&cli.url, mode).await {
        Ok(SearchOutcome::Choices(choices)) => choices,
        Ok(SearchOutcome::Empty(reason)) => {
            tracing::warn!("No results: {:?}", reason);
            eprintln!("{}", mode.empty_message());
            return Ok(());
        }
        Err(e) => {
            tracing::error!(
                "Search failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("{}", mode.empty_message());
            eprintln!("{}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            return Ok(());
        }
    };

    match cli.select {
        Some(index) => {
            let choice = choices.get(index).with_context(|| {
                format!("No choice at index {} ({} available)", index, choices.len())
            })?;
            let sink = ConsoleAttachmentSink::new(cli.json);
            service.attach(choice, &sink).await?;
        }
        None if cli.json => {
            println!("{}", serde_json::to_string_pretty(&choices)?);
        }
        None => {
            println!("{}", mode.popup_title());
            for (index, choice) in choices.iter().enumerate() {
                println!("[{}] {}\n    {}", index, choice.label, choice.url);
            }
        }
    }

    Ok(())
}
