use crate::core::models::cost::ServiceCost;

/// Services at or below this amount are left out of reports.
pub const MIN_SERVICE_COST: f64 = 0.01;

/// How many services the notification lists.
pub const DISPLAY_TOP_N: usize = 5;

/// How many services a stored history record keeps.
pub const STORAGE_TOP_N: usize = 10;

/// Drop entries costing `min_cost` or less, sort the rest by cost descending
/// and keep the first `limit`.
///
/// The sort is stable, so equal costs keep their input order. Empty or fully
/// filtered input yields an empty list.
pub fn top_services(entries: &[ServiceCost], min_cost: f64, limit: usize) -> Vec<ServiceCost> {
    let mut kept: Vec<ServiceCost> = entries
        .iter()
        .filter(|e| e.cost > min_cost)
        .cloned()
        .collect();

    kept.sort_by(|a, b| b.cost.total_cmp(&a.cost));
    kept.truncate(limit);
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn listing() -> Vec<ServiceCost> {
        vec![
            ServiceCost::new("Amazon S3", 0.75),
            ServiceCost::new("AWS Lambda", 0.01),
            ServiceCost::new("Amazon EC2", 4.20),
            ServiceCost::new("Tax", 0.0),
            ServiceCost::new("Amazon RDS", 1.10),
            ServiceCost::new("Amazon SNS", 0.005),
            ServiceCost::new("Amazon CloudFront", 0.75),
        ]
    }

    #[test]
    fn filters_sorts_and_truncates() {
        let top = top_services(&listing(), MIN_SERVICE_COST, 3);
        let names: Vec<&str> = top.iter().map(|s| s.service_name.as_str()).collect();
        assert_eq!(names, vec!["Amazon EC2", "Amazon RDS", "Amazon S3"]);
    }

    #[test]
    fn threshold_is_exclusive() {
        let top = top_services(&listing(), MIN_SERVICE_COST, 10);
        assert!(top.iter().all(|s| s.cost > MIN_SERVICE_COST));
        assert!(!top.iter().any(|s| s.service_name == "AWS Lambda"));
    }

    #[test]
    fn ties_keep_input_order() {
        let top = top_services(&listing(), MIN_SERVICE_COST, 10);
        let s3 = top.iter().position(|s| s.service_name == "Amazon S3").unwrap();
        let cf = top
            .iter()
            .position(|s| s.service_name == "Amazon CloudFront")
            .unwrap();
        assert_eq!(cf, s3 + 1);
    }

    fn random_listing(rng: &mut StdRng) -> Vec<ServiceCost> {
        const EDGE: [f64; 8] = [0.01, 0.0100001, 0.0099999, 0.0, -0.01, -3.5, 1.25, f64::NAN];
        let len = rng.gen_range(0..20);
        (0..len)
            .map(|i| {
                let cost = match rng.gen_range(0..3) {
                    0 => EDGE[rng.gen_range(0..EDGE.len())],
                    // Coarse steps so ties are common.
                    1 => f64::from(rng.gen_range(-4i32..12)) * 0.25,
                    _ => rng.gen_range(-1.0..50.0),
                };
                ServiceCost::new(format!("svc-{:02}", i), cost)
            })
            .collect()
    }

    #[test]
    fn output_invariants_hold_for_random_listings() {
        let mut rng = StdRng::seed_from_u64(0xC057);
        for _ in 0..500 {
            let input = random_listing(&mut rng);
            let position = |s: &ServiceCost| {
                input
                    .iter()
                    .position(|e| e.service_name == s.service_name)
                    .unwrap()
            };
            for limit in [0, 1, DISPLAY_TOP_N, STORAGE_TOP_N, 25] {
                let top = top_services(&input, MIN_SERVICE_COST, limit);
                assert!(top.len() <= limit);
                assert!(top.iter().all(|s| s.cost > MIN_SERVICE_COST));
                for pair in top.windows(2) {
                    assert!(pair[0].cost >= pair[1].cost);
                    if pair[0].cost == pair[1].cost {
                        assert!(position(&pair[0]) < position(&pair[1]));
                    }
                }

                let eligible = input.iter().filter(|s| s.cost > MIN_SERVICE_COST).count();
                assert_eq!(top.len(), eligible.min(limit));
            }
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let input = listing();
        assert_eq!(
            top_services(&input, MIN_SERVICE_COST, DISPLAY_TOP_N),
            top_services(&input, MIN_SERVICE_COST, DISPLAY_TOP_N)
        );
    }

    #[test]
    fn empty_and_all_filtered_inputs() {
        assert!(top_services(&[], MIN_SERVICE_COST, STORAGE_TOP_N).is_empty());

        let tiny = vec![ServiceCost::new("a", 0.01), ServiceCost::new("b", 0.0)];
        assert!(top_services(&tiny, MIN_SERVICE_COST, STORAGE_TOP_N).is_empty());
    }

    #[test]
    fn nan_costs_are_dropped() {
        let input = vec![ServiceCost::new("bad", f64::NAN), ServiceCost::new("ok", 1.0)];
        let top = top_services(&input, MIN_SERVICE_COST, 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].service_name, "ok");
    }
}
