use chrono::{NaiveDate, Utc};
use rand::Rng;

use crate::core::aggregator::top_services;
use crate::core::models::cost::{CostRecord, ServiceCost};

/// A catalog entry with the inclusive range its daily cost is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub service: &'static str,
    pub min: f64,
    pub max: f64,
}

/// The fixed set of services synthetic reports are built from.
pub static CATALOG: &[CatalogEntry] = &[
    CatalogEntry { service: "compute", min: 1.0, max: 3.0 },
    CatalogEntry { service: "object-storage", min: 0.3, max: 1.2 },
    CatalogEntry { service: "function-compute", min: 0.05, max: 0.4 },
    CatalogEntry { service: "relational-db", min: 0.5, max: 2.0 },
    CatalogEntry { service: "cdn", min: 0.1, max: 0.6 },
    CatalogEntry { service: "key-value-db", min: 0.05, max: 0.3 },
    CatalogEntry { service: "pub-sub", min: 0.01, max: 0.1 },
];

/// Draw one cost per catalog service, in catalog order.
pub fn draw_costs<R: Rng>(rng: &mut R) -> Vec<ServiceCost> {
    CATALOG
        .iter()
        .map(|entry| ServiceCost::new(entry.service, rng.gen_range(entry.min..=entry.max)))
        .collect()
}

/// Build a synthetic record for `today` from a fresh draw.
///
/// `total_cost` is the sum of every drawn cost, including any that the
/// minimum-cost filter later drops from `services`.
pub fn generate_with<R: Rng>(
    rng: &mut R,
    today: NaiveDate,
    min_cost: f64,
    limit: usize,
) -> CostRecord {
    let drawn = draw_costs(rng);
    let total_cost: f64 = drawn.iter().map(|s| s.cost).sum();

    tracing::debug!(services = drawn.len(), total_cost, "Generated synthetic costs");

    CostRecord {
        report_date: today,
        total_cost,
        services: top_services(&drawn, min_cost, limit),
        is_synthetic: true,
        captured_at: Utc::now(),
    }
}
