//! Scan command implementation.

use anyhow::{Context, Result};
use screener_config::AppConfig;
use screener_core::traits::SymbolSource;
use screener_data::{CsvSymbolList, SymbolList};
use screener_monitor::TableSink;
use screener_pipeline::BatchDriver;
use std::sync::Arc;
use tracing::info;

use crate::cli::{setup, OutputFormat, ScanArgs};

pub async fn run(args: ScanArgs, config: AppConfig) -> Result<()> {
    let symbols: Box<dyn SymbolSource> = match &args.symbols_file {
        Some(path) => Box::new(CsvSymbolList::new(path)),
        None if !args.symbols.is_empty() => Box::new(SymbolList::parse(&args.symbols.join(","))),
        None => anyhow::bail!("Please provide symbols with --symbols A,B,C or --symbols-file FILE"),
    };
    let symbols = symbols.symbols().context("Failed to load symbol list")?;

    let mut batch_config = config.batch_config();
    if let Some(concurrency) = args.concurrency {
        anyhow::ensure!(concurrency > 0, "--concurrency must be at least 1");
        batch_config.concurrency = concurrency;
    }

    let as_of = setup::as_of(&args.source);
    let pipeline = setup::pipeline(&config, &args.source)?;
    let mut driver = BatchDriver::new(Arc::new(pipeline), batch_config);
    if args.detail {
        driver = driver.with_sink(Arc::new(TableSink::default()));
    }

    let report = driver.run(symbols, as_of).await;

    match args.output {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Text => println!("{}", report.summary()),
    }

    if let Some(save_path) = &args.save {
        let json = report.to_json()?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write report to {}", save_path.display()))?;
        info!("Report saved to {:?}", save_path);
    }

    Ok(())
}
