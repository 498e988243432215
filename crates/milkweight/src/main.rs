mod bootstrap;

use anyhow::Result;
use milkweight_core::settings::Settings;
use milkweight_core::MilkError;
use milkweight_data::{discover_sources, load_sources};
use milkweight_report::{export, render_table, resolve_report, to_csv, to_json, Report};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("milkweight v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Report: {}, Format: {}, Inputs: {}",
        settings.report,
        settings.format,
        settings.inputs.len()
    );

    run(&settings)
}

fn run(settings: &Settings) -> Result<()> {
    let sources = discover_sources(&settings.inputs);
    let outcome = load_sources(&sources);

    if let Some(warning) = outcome.summary.warning() {
        eprintln!("{}", warning);
    }
    if outcome.ledger.valid_years().is_empty() {
        return Err(MilkError::NoValidData.into());
    }

    let report = resolve_report(settings, &outcome.ledger)?;
    let text = render(&report, &settings.format)?;
    export(&text, settings.output.as_deref())?;

    Ok(())
}

fn render(report: &Report, format: &str) -> milkweight_core::Result<String> {
    match format {
        "csv" => Ok(to_csv(report)),
        "json" => Ok(to_json(report)? + "\n"),
        _ => Ok(render_table(report)),
    }
}
