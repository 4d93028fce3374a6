use anyhow::Result;
use chrono::{NaiveDate, Utc};

use crate::core::aggregator::top_services;
use crate::core::billing::{latest_bucket, BillingSource, DateWindow};
use crate::core::config::ReportSettings;
use crate::core::formatter::{format_failure, format_no_data, format_report};
use crate::core::models::cost::CostRecord;
use crate::core::models::invocation::{InvocationEvent, InvocationResult, ReportSummary};
use crate::core::notify::Notifier;
use crate::core::persister::Persister;
use crate::core::synthetic;

/// What the fetch step produced.
#[derive(Debug)]
enum Fetched {
    /// The source returned no days at all.
    Empty,
    Populated(CostRecord),
}

/// One daily cost report run: fetch (or synthesize), aggregate, persist,
/// notify.
pub struct ReportJob {
    billing: Box<dyn BillingSource>,
    persister: Persister,
    notifier: Notifier,
    settings: ReportSettings,
}

impl ReportJob {
    pub fn new(
        billing: Box<dyn BillingSource>,
        persister: Persister,
        notifier: Notifier,
        settings: ReportSettings,
    ) -> Self {
        Self {
            billing,
            persister,
            notifier,
            settings,
        }
    }

    pub async fn run(&self, event: &InvocationEvent) -> InvocationResult {
        self.run_on(event, Utc::now().date_naive()).await
    }

    /// Run as if today were `today`. Never returns an error: failures in the
    /// fetch path become a 500 result after a best-effort error notification.
    pub async fn run_on(&self, event: &InvocationEvent, today: NaiveDate) -> InvocationResult {
        match self.execute(event, today).await {
            Ok(result) => result,
            Err(e) => {
                let reason = format!("{:#}", e);
                tracing::error!("Cost report failed: {}", reason);
                self.notifier.publish(&format_failure(&reason)).await;
                InvocationResult::error(reason)
            }
        }
    }

    async fn execute(&self, event: &InvocationEvent, today: NaiveDate) -> Result<InvocationResult> {
        let fetched = if event.use_test_data {
            tracing::info!("Test mode: generating synthetic cost data");
            Fetched::Populated(self.synthetic_record(today))
        } else {
            self.fetch_live(today).await?
        };

        let record = match fetched {
            Fetched::Empty => {
                tracing::info!("No billing data returned yet");
                self.notifier
                    .publish(&format_no_data(self.settings.lookback_days))
                    .await;
                return Ok(InvocationResult::no_data());
            }
            Fetched::Populated(record) => record,
        };

        tracing::info!(
            "Report for {}: total {:.2} across {} listed service(s)",
            record.report_date,
            record.total_cost,
            record.services.len()
        );

        let saved = self.persister.save(&record).await;

        let message = format_report(
            &record,
            self.settings.alert_threshold,
            self.settings.display_top_n,
            saved,
        );
        let outcome = self.notifier.publish(&message).await;

        Ok(InvocationResult::report(ReportSummary {
            date: record.report_date,
            total_cost: record.total_cost,
            top_services: record.top(self.settings.display_top_n).to_vec(),
            alert_sent: Some(outcome.was_sent()),
            saved_to_db: Some(saved),
            test_mode: record.is_synthetic.then_some(true),
        }))
    }

    async fn fetch_live(&self, today: NaiveDate) -> Result<Fetched> {
        let window = DateWindow::trailing(today, self.settings.lookback_days)?;
        let buckets = self.billing.daily_costs(window).await?;

        let Some(bucket) = latest_bucket(buckets) else {
            return Ok(Fetched::Empty);
        };

        Ok(Fetched::Populated(CostRecord {
            report_date: bucket.date,
            total_cost: bucket.total,
            services: top_services(
                &bucket.services,
                self.settings.min_service_cost,
                self.record_limit(),
            ),
            is_synthetic: false,
            captured_at: Utc::now(),
        }))
    }

    fn synthetic_record(&self, today: NaiveDate) -> CostRecord {
        synthetic::generate_with(
            &mut rand::thread_rng(),
            today,
            self.settings.min_service_cost,
            self.record_limit(),
        )
    }

    /// Records keep enough services for both the display and the storage cut.
    fn record_limit(&self) -> usize {
        self.settings.display_top_n.max(self.settings.storage_top_n)
    }
}
