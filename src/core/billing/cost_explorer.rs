use std::collections::BTreeMap;

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_costexplorer::{
    types::{DateInterval, Granularity, GroupDefinition, GroupDefinitionType, ResultByTime},
    Client,
};
use chrono::NaiveDate;
use tokio::sync::OnceCell;

use crate::core::billing::{BillingSource, DailyBucket, DateWindow};
use crate::core::models::cost::ServiceCost;

const SERVICE_DIMENSION: &str = "SERVICE";

/// Billing source backed by AWS Cost Explorer.
///
/// The SDK config is loaded on the first query, so runs that never reach the
/// billing source do not touch AWS profiles or credentials.
pub struct CostExplorerSource {
    region: String,
    client: OnceCell<Client>,
    metric: String,
}

/// One result row before pages for the same day are merged.
#[derive(Debug, Default)]
struct PartialBucket {
    reported_total: Option<f64>,
    services: Vec<ServiceCost>,
}

impl PartialBucket {
    fn finish(self, date: NaiveDate) -> DailyBucket {
        // Grouped queries usually come back with an empty Total, so fall back
        // to the sum of every group.
        let total = self
            .reported_total
            .unwrap_or_else(|| self.services.iter().map(|s| s.cost).sum());
        DailyBucket {
            date,
            total,
            services: self.services,
        }
    }
}

impl CostExplorerSource {
    pub fn new(region: impl Into<String>, metric: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            client: OnceCell::new(),
            metric: metric.into(),
        }
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                tracing::debug!("Loading AWS config for region {}", self.region);
                let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                    .region(aws_config::Region::new(self.region.clone()))
                    .load()
                    .await;
                Client::new(&config)
            })
            .await
    }
}

#[async_trait]
impl BillingSource for CostExplorerSource {
    async fn daily_costs(&self, window: DateWindow) -> Result<Vec<DailyBucket>> {
        tracing::info!(
            "Fetching {} by service from {} to {}",
            self.metric,
            window.start,
            window.end
        );

        let client = self.client().await;
        let mut days: BTreeMap<NaiveDate, PartialBucket> = BTreeMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let response = client
                .get_cost_and_usage()
                .time_period(
                    DateInterval::builder()
                        .start(window.start.to_string())
                        .end(window.end.to_string())
                        .build()
                        .context("Failed to build date interval")?,
                )
                .granularity(Granularity::Daily)
                .group_by(
                    GroupDefinition::builder()
                        .r#type(GroupDefinitionType::Dimension)
                        .key(SERVICE_DIMENSION)
                        .build(),
                )
                .metrics(self.metric.clone())
                .set_next_page_token(page_token.take())
                .send()
                .await
                .context("Failed to query AWS Cost Explorer")?;

            for result in response.results_by_time() {
                let Some((date, part)) = parse_result(result, &self.metric) else {
                    tracing::debug!("Skipping result without a parseable time period");
                    continue;
                };
                let entry = days.entry(date).or_default();
                if entry.reported_total.is_none() {
                    entry.reported_total = part.reported_total;
                }
                entry.services.extend(part.services);
            }

            match response.next_page_token() {
                Some(token) if !token.is_empty() => page_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::info!("Cost Explorer returned {} day(s)", days.len());

        Ok(days
            .into_iter()
            .map(|(date, part)| part.finish(date))
            .collect())
    }
}

fn parse_amount(amount: Option<&str>) -> Option<f64> {
    amount.and_then(|raw| raw.parse::<f64>().ok())
}

fn parse_result(result: &ResultByTime, metric: &str) -> Option<(NaiveDate, PartialBucket)> {
    let start = result.time_period()?.start();
    let date = NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?;

    let reported_total = result
        .total()
        .and_then(|total| total.get(metric))
        .and_then(|value| parse_amount(value.amount()));

    let services = result
        .groups()
        .iter()
        .filter_map(|group| {
            let service = group
                .keys()
                .first()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            let cost = group
                .metrics()
                .and_then(|metrics| metrics.get(metric))
                .and_then(|value| parse_amount(value.amount()))?;
            Some(ServiceCost::new(service, cost))
        })
        .collect();

    Some((
        date,
        PartialBucket {
            reported_total,
            services,
        },
    ))
}
