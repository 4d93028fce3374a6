use anyhow::{Context, Result};

use crate::core::models::cost::CostRecord;
use crate::core::money::to_decimal;
use crate::core::store::{RecordStore, StoredRecord, StoredService};

/// Writes daily records to history, keyed by report date.
pub struct Persister {
    store: Box<dyn RecordStore>,
    storage_top_n: usize,
}

impl Persister {
    pub fn new(store: Box<dyn RecordStore>, storage_top_n: usize) -> Self {
        Self {
            store,
            storage_top_n,
        }
    }

    /// Save a record, returning whether it was written.
    ///
    /// Failures are logged here and never returned; saving the same date
    /// again replaces the earlier entry.
    pub async fn save(&self, record: &CostRecord) -> bool {
        let result = match to_stored(record, self.storage_top_n) {
            Ok(stored) => self.store.put(stored).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!("Saved cost record for {}", record.report_date);
                true
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to save cost record for {}: {:#}",
                    record.report_date,
                    e
                );
                false
            }
        }
    }
}

/// Convert to the stored shape, keeping the first `limit` services.
pub fn to_stored(record: &CostRecord, limit: usize) -> Result<StoredRecord> {
    let total_cost = to_decimal(record.total_cost)
        .with_context(|| format!("Total cost {} is not a storable amount", record.total_cost))?;

    let services = record
        .top(limit)
        .iter()
        .map(|s| -> Result<StoredService> {
            let cost = to_decimal(s.cost).with_context(|| {
                format!("Cost {} for {} is not a storable amount", s.cost, s.service_name)
            })?;
            Ok(StoredService {
                service: s.service_name.clone(),
                cost,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(StoredRecord {
        date: record.report_date,
        total_cost,
        services,
        is_synthetic: record.is_synthetic,
        captured_at: record.captured_at,
    })
}
