pub mod cost_explorer;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate};

use crate::core::models::cost::ServiceCost;

/// Date range for a billing query; `end` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// The `days` days before `today`, not including today.
    pub fn trailing(today: NaiveDate, days: u32) -> Result<Self> {
        let start = today
            .checked_sub_signed(Duration::days(i64::from(days)))
            .with_context(|| format!("Lookback of {} days from {} is out of range", days, today))?;
        Ok(Self { start, end: today })
    }
}

/// Per-service costs for one day as reported by the billing source.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Grand total for the day, before any filtering.
    pub total: f64,
    pub services: Vec<ServiceCost>,
}

/// Remote query interface returning daily, per-service cost aggregates.
#[async_trait]
pub trait BillingSource: Send + Sync {
    async fn daily_costs(&self, window: DateWindow) -> Result<Vec<DailyBucket>>;
}

/// The most recent day in a response, regardless of today's date.
pub fn latest_bucket(buckets: Vec<DailyBucket>) -> Option<DailyBucket> {
    buckets.into_iter().max_by_key(|b| b.date)
}
