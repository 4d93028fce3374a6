pub mod json_file;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::models::cost::{CostRecord, ServiceCost};
use crate::core::money::to_f64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredService {
    pub service: String,
    pub cost: Decimal,
}

/// A day's report as written to history. Amounts are exact decimals and
/// serialize as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub date: NaiveDate,
    pub total_cost: Decimal,
    pub services: Vec<StoredService>,
    pub is_synthetic: bool,
    pub captured_at: DateTime<Utc>,
}

impl StoredRecord {
    /// History key: the report date as `YYYY-MM-DD`.
    pub fn key(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn to_cost_record(&self) -> CostRecord {
        CostRecord {
            report_date: self.date,
            total_cost: to_f64(self.total_cost),
            services: self
                .services
                .iter()
                .map(|s| ServiceCost::new(s.service.clone(), to_f64(s.cost)))
                .collect(),
            is_synthetic: self.is_synthetic,
            captured_at: self.captured_at,
        }
    }
}

/// Durable history keyed by report date. A put for an existing key replaces it.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn put(&self, record: StoredRecord) -> Result<()>;

    async fn get(&self, date: NaiveDate) -> Result<Option<StoredRecord>>;

    /// All stored records, oldest first.
    async fn list(&self) -> Result<Vec<StoredRecord>>;
}
