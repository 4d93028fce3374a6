use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::cli::output::{to_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::config::AppConfig;
use crate::core::store::json_file::JsonFileStore;
use crate::core::store::RecordStore;

fn open_store() -> JsonFileStore {
    let config = AppConfig::load().unwrap_or_default();
    JsonFileStore::new(config.history_path())
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", raw))
}

pub async fn show(date: &str, opts: &OutputOptions) -> Result<()> {
    let date = parse_date(date)?;
    let store = open_store();

    let Some(stored) = store.get(date).await? else {
        eprintln!("No report stored for {} in {}", date, store.path().display());
        std::process::exit(1);
    };

    match opts.format {
        OutputFormat::Text => println!(
            "{}",
            renderer::render_record(&stored.to_cost_record(), opts.use_color)
        ),
        OutputFormat::Json => println!("{}", to_json(&stored, opts.pretty)?),
    }
    Ok(())
}

pub async fn list(opts: &OutputOptions) -> Result<()> {
    let store = open_store();
    let records = store.list().await?;

    match opts.format {
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No reports stored yet in {}", store.path().display());
                return Ok(());
            }
            let sections: Vec<String> = records
                .iter()
                .map(|r| renderer::render_record(&r.to_cost_record(), opts.use_color))
                .collect();
            println!("{}", sections.join("\n\n"));
        }
        OutputFormat::Json => println!("{}", to_json(&records, opts.pretty)?),
    }
    Ok(())
}
