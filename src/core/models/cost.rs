use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Spend attributed to a single billed service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    #[serde(rename = "service")]
    pub service_name: String,
    pub cost: f64,
}

impl ServiceCost {
    pub fn new(service_name: impl Into<String>, cost: f64) -> Self {
        Self {
            service_name: service_name.into(),
            cost,
        }
    }
}

/// One day's cost report.
///
/// `services` is already filtered and sorted by cost descending, while
/// `total_cost` is the unfiltered grand total reported by the source, so the
/// listed services may sum to less than the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub report_date: NaiveDate,
    pub total_cost: f64,
    pub services: Vec<ServiceCost>,
    pub is_synthetic: bool,
    pub captured_at: DateTime<Utc>,
}

impl CostRecord {
    /// The first `limit` services, in report order.
    pub fn top(&self, limit: usize) -> &[ServiceCost] {
        &self.services[..self.services.len().min(limit)]
    }

    pub fn exceeds(&self, threshold: f64) -> bool {
        self.total_cost > threshold
    }
}
