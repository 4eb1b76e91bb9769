//! Inspect command implementation.

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_monitor::TableSink;

use crate::cli::{setup, InspectArgs, OutputFormat};

pub async fn run(args: InspectArgs, config: AppConfig) -> Result<()> {
    let symbol = args.symbol.trim().to_uppercase();
    let as_of = setup::as_of(&args.source);
    let pipeline = setup::pipeline(&config, &args.source)?;

    let analysis = pipeline
        .analyze(&symbol, as_of)
        .await
        .with_context(|| format!("Failed to analyse {} as of {}", symbol, as_of))?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
        OutputFormat::Text => {
            print!("{}", TableSink::new(args.rows).render(&analysis.frame, analysis.signal));
            println!();
            println!("Signal for {} as of {}: {}", symbol, as_of, analysis.signal);
        }
    }

    Ok(())
}
