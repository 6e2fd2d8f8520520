mod bootstrap;
mod report;

use anyhow::Result;
use roomie_core::error::RoomieError;
use roomie_core::settings::Settings;
use roomie_data::analysis::{analyze_residency, AnalysisOptions};
use roomie_data::extractor::ExtractorConfig;

fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("roomie-graph v{} starting", env!("CARGO_PKG_VERSION"));

    let Some(input) = settings.input.clone() else {
        if settings.clear {
            tracing::info!("Saved configuration cleared");
            return Ok(());
        }
        return Err(RoomieError::Config(
            "an input spreadsheet path is required (see --help)".to_string(),
        )
        .into());
    };

    tracing::info!(
        "Input: {}, Layout: {}, Sheet: {}, Top-K: {}",
        input.display(),
        settings.layout,
        settings.sheet,
        settings.top_k
    );

    let options = AnalysisOptions {
        sheet: settings.sheet_selector(),
        extractor: ExtractorConfig {
            layout: settings.parse_layout(),
            roster_size: settings.roster_size as usize,
            lenient: settings.lenient,
        },
        top_k: settings.top_k as usize,
    };

    let residency = analyze_residency(&input, &options)?;

    match settings.format.as_str() {
        "json" => println!("{}", report::render_json(&residency)?),
        _ => print!("{}", report::render_text(&residency)),
    }

    Ok(())
}
