use std::io::Read;
use std::path::{Path, PathBuf};

use crate::api::{self, ScrapeRequest};
use crate::app::{AppContext, Result};
use crate::cli::OutputFormat;
use crate::config::{Backend, Config};
use crate::domain::{ProductRecord, RawPage};
use crate::export;

pub async fn search(
    ctx: &AppContext,
    term: &str,
    max_results: Option<usize>,
    format: OutputFormat,
    output: Option<Option<PathBuf>>,
) -> Result<()> {
    let output = output_path(term, output);
    let output = output.as_deref();
    let max_results = max_results.unwrap_or(ctx.config.source.default_max_results);

    if format == OutputFormat::Json {
        let response = api::handle(ctx, ScrapeRequest::new(term, Some(max_results))).await;
        println!("{}", response.to_json()?);
        if let (Some(path), Some(products)) = (output, response.products.as_deref()) {
            export::export_to_file(path, products)?;
            eprintln!("Wrote {}", path.display());
        }
        return Ok(());
    }

    let outcome = ctx.controller.run(term, max_results).await?;

    match format {
        OutputFormat::Csv => print!("{}", export::to_csv_string(&outcome.records)?),
        _ => {
            print_table(&outcome.records);
            println!(
                "\n{} products from {} pages ({}, {:.1}s)",
                outcome.records.len(),
                outcome.pages_fetched,
                outcome.stop_reason,
                (outcome.finished_at - outcome.started_at).num_milliseconds() as f64 / 1000.0
            );
        }
    }

    if let Some(path) = output {
        export::export_to_file(path, &outcome.records)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

/// Resolve `-o`: an explicit path, or the default export name for the term.
fn output_path(term: &str, output: Option<Option<PathBuf>>) -> Option<PathBuf> {
    output.map(|path| path.unwrap_or_else(|| PathBuf::from(export::default_file_name(term))))
}

/// Read a JSON request from a file (or stdin) and print the JSON response.
pub async fn request(ctx: &AppContext, path: Option<&Path>) -> Result<()> {
    let body = match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)?,
        _ => {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body)?;
            body
        }
    };

    let response = api::handle_json(ctx, &body).await;
    println!("{}", response.to_json()?);
    Ok(())
}

/// Run the locator and extractor on a saved page.
pub fn parse_file(ctx: &AppContext, path: &Path) -> Result<()> {
    let markup = std::fs::read_to_string(path)?;
    let extraction = ctx.parser.parse(RawPage::new(1, markup));

    for (name, count) in &extraction.tried {
        println!("hypothesis {:<18} {} candidates", name, count);
    }

    let Some(ref winner) = extraction.hypothesis else {
        println!("No hypothesis produced a product");
        return Ok(());
    };
    println!("Winner: {}\n", winner);

    let records: Vec<ProductRecord> = extraction.accepted().cloned().collect();
    print_table(&records);

    let rejections: Vec<_> = extraction.rejections().collect();
    if !rejections.is_empty() {
        println!("\n{} cards dropped:", rejections.len());
        for reason in rejections {
            println!("  - {}", reason);
        }
    }

    Ok(())
}

pub fn show_config(config: &Config, path: Option<&Path>) -> Result<()> {
    match path {
        Some(p) => println!("Config file: {}", p.display()),
        None => match Config::default_config_path() {
            Ok(p) => println!("Config file: {}", p.display()),
            Err(e) => println!("Config file: ({})", e),
        },
    }

    println!("Source:      {}", config.source.base_url);
    println!("Backend:     {:?}", config.fetch.backend);
    if config.fetch.backend == Backend::Gateway {
        let state = if config.gateway.api_key().is_some() {
            "set"
        } else {
            "NOT SET"
        };
        println!("API key:     {} ({})", config.gateway.api_key_env, state);
    }
    let names: Vec<_> = config
        .locator
        .hypotheses
        .iter()
        .map(|h| h.name.as_str())
        .collect();
    println!("Hypotheses:  {}", names.join(" → "));

    Ok(())
}

fn print_table(records: &[ProductRecord]) {
    if records.is_empty() {
        println!("No products");
        return;
    }

    println!(
        "{:>4}  {:<12} {:<16} {:<14} {:>9}  {}",
        "#", "ID", "Brand", "Model", "Price", "Name"
    );
    for (index, record) in records.iter().enumerate() {
        println!(
            "{:>4}  {:<12} {:<16} {:<14} {:>9}  {}",
            index + 1,
            record.product_id,
            truncate(&record.brand_name, 16),
            truncate(&record.product_model, 14),
            record.price,
            record.product_name
        );
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
