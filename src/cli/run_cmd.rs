use anyhow::{Context, Result};

use crate::cli::output::{to_json, OutputFormat, OutputOptions};
use crate::cli::renderer;
use crate::core::billing::cost_explorer::CostExplorerSource;
use crate::core::config::{AppConfig, ReportSettings};
use crate::core::models::invocation::InvocationEvent;
use crate::core::notify::webhook::{resolve_destination, WebhookSink, WEBHOOK_URL_ENV};
use crate::core::notify::{NotificationSink, Notifier};
use crate::core::orchestrator::ReportJob;
use crate::core::persister::Persister;
use crate::core::store::json_file::JsonFileStore;

/// Merge the `--event` document with the `--test-data` shorthand.
pub fn parse_event(event_json: Option<&str>, test_data: bool) -> Result<InvocationEvent> {
    let mut event = match event_json {
        Some(raw) => serde_json::from_str::<InvocationEvent>(raw)
            .context("Failed to parse --event as JSON")?,
        None => InvocationEvent::default(),
    };
    event.use_test_data |= test_data;
    Ok(event)
}

/// Report settings with every invalid field reset to its default.
fn report_settings(config: &AppConfig) -> ReportSettings {
    for issue in config.validate() {
        tracing::warn!("Config: {}", issue);
    }
    config.report.sanitized()
}

fn build_notifier(config: &AppConfig) -> Notifier {
    let destination = resolve_destination(
        std::env::var(WEBHOOK_URL_ENV).ok(),
        config.notify.webhook_url.as_deref(),
    );
    let Some(url) = destination else {
        return Notifier::disabled();
    };
    match WebhookSink::new(url) {
        Ok(sink) => Notifier::new(Some(Box::new(sink) as Box<dyn NotificationSink>)),
        Err(e) => {
            tracing::warn!("Notifications disabled: {:#}", e);
            Notifier::disabled()
        }
    }
}

pub async fn run(event_json: Option<String>, test_data: bool, opts: &OutputOptions) -> Result<()> {
    let event = parse_event(event_json.as_deref(), test_data)?;

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("{}; using defaults", e);
            AppConfig::default()
        }
    };
    let settings = report_settings(&config);

    let billing = CostExplorerSource::new(&config.billing.region, &config.billing.metric);
    let history_path = config.history_path();
    tracing::debug!("History file: {}", history_path.display());
    let persister = Persister::new(
        Box::new(JsonFileStore::new(history_path)),
        settings.storage_top_n,
    );
    let notifier = build_notifier(&config);
    tracing::debug!(configured = notifier.is_configured(), "Notification destination resolved");

    let job = ReportJob::new(Box::new(billing), persister, notifier, settings);
    let result = job.run(&event).await;

    match opts.format {
        OutputFormat::Text => println!("{}", renderer::render_result(&result, opts.use_color)),
        OutputFormat::Json => println!("{}", to_json(&result, opts.pretty)?),
    }

    if !result.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
