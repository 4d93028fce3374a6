use crate::core::models::cost::CostRecord;
use crate::core::money::{round_cents, to_decimal};

/// Subject and body of an outgoing notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportMessage {
    pub subject: String,
    pub body: String,
}

/// The four mutually exclusive report subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectLabel {
    NormalReal,
    AlertReal,
    NormalTest,
    AlertTest,
}

impl SubjectLabel {
    pub fn classify(is_synthetic: bool, is_alert: bool) -> Self {
        match (is_synthetic, is_alert) {
            (false, false) => Self::NormalReal,
            (false, true) => Self::AlertReal,
            (true, false) => Self::NormalTest,
            (true, true) => Self::AlertTest,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalReal => "Daily Cost Report",
            Self::AlertReal => "Cost Alert",
            Self::NormalTest => "[TEST] Daily Cost Report",
            Self::AlertTest => "[TEST] Cost Alert",
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, Self::AlertReal | Self::AlertTest)
    }
}

/// Returns "$1.23": two decimals, half away from zero.
pub fn format_currency(amount: f64) -> String {
    match to_decimal(amount) {
        Some(value) => format!("${}", round_cents(value)),
        None => format!("${:.2}", amount),
    }
}

/// Render a day's record as a notification.
///
/// Layout:
/// ```text
/// ⚠️ ALERT: Total cost $12.34 exceeded the $5.00 threshold
///
/// 📊 Cost Report for 2026-10-17
/// Total Cost: $12.34
///
/// Top Services:
///   1. Amazon EC2: $8.00
///   2. Amazon RDS: $3.10
///
/// ---
/// Saved to cost history.
/// Note: billing data can lag by up to 24 hours; the latest day may still change.
/// ```
pub fn format_report(
    record: &CostRecord,
    threshold: f64,
    display_top_n: usize,
    saved_to_history: bool,
) -> ReportMessage {
    let label = SubjectLabel::classify(record.is_synthetic, record.exceeds(threshold));
    let total = format_currency(record.total_cost);

    let subject = if label.is_alert() {
        format!(
            "{} - {}: {} exceeds {}",
            label.as_str(),
            record.report_date,
            total,
            format_currency(threshold)
        )
    } else {
        format!("{} - {}: {}", label.as_str(), record.report_date, total)
    };

    let mut lines: Vec<String> = Vec::new();
    if label.is_alert() {
        lines.push(format!(
            "⚠️ ALERT: Total cost {} exceeded the {} threshold",
            total,
            format_currency(threshold)
        ));
        lines.push(String::new());
    }

    lines.push(format!("📊 Cost Report for {}", record.report_date));
    lines.push(format!("Total Cost: {}", total));
    lines.push(String::new());
    lines.push("Top Services:".to_string());

    let top = record.top(display_top_n);
    if top.is_empty() {
        lines.push("  No services recorded".to_string());
    }
    for (i, svc) in top.iter().enumerate() {
        lines.push(format!(
            "  {}. {}: {}",
            i + 1,
            svc.service_name,
            format_currency(svc.cost)
        ));
    }

    lines.push(String::new());
    lines.push("---".to_string());
    if saved_to_history {
        lines.push("Saved to cost history.".to_string());
    } else {
        lines.push("Not saved to cost history (see logs).".to_string());
    }
    if record.is_synthetic {
        lines.push("TEST MODE: figures are synthetic, not real billing data.".to_string());
    }
    lines.push(
        "Note: billing data can lag by up to 24 hours; the latest day may still change."
            .to_string(),
    );

    ReportMessage {
        subject,
        body: lines.join("\n"),
    }
}

/// Message sent when the billing source returned no days at all.
pub fn format_no_data(lookback_days: u32) -> ReportMessage {
    ReportMessage {
        subject: "Cost Report - No Data Yet".to_string(),
        body: format!(
            "No billing data was returned for the last {} days.\n\
             Cost data usually appears within 24 hours; the next scheduled run will try again.",
            lookback_days
        ),
    }
}

/// Message sent when the run fails before a report could be produced.
pub fn format_failure(error: &str) -> ReportMessage {
    ReportMessage {
        subject: "Cost Report - Error".to_string(),
        body: format!("The daily cost report failed:\n\n{}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::cost::ServiceCost;
    use chrono::{NaiveDate, Utc};

    fn record(total_cost: f64, services: Vec<ServiceCost>, is_synthetic: bool) -> CostRecord {
        CostRecord {
            report_date: NaiveDate::from_ymd_opt(2026, 10, 17).unwrap(),
            total_cost,
            services,
            is_synthetic,
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn format_currency_two_decimals() {
        assert_eq!(format_currency(5.005), "$5.01");
        assert_eq!(format_currency(5.004), "$5.00");
        assert_eq!(format_currency(12.3), "$12.30");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-1.234), "$-1.23");
        assert_eq!(format_currency(1234.5), "$1234.50");
    }

    #[test]
    fn format_currency_non_finite_does_not_panic() {
        assert_eq!(format_currency(f64::NAN), "$NaN");
    }

    #[test]
    fn subject_labels_are_exclusive() {
        let labels = [
            SubjectLabel::classify(false, false),
            SubjectLabel::classify(false, true),
            SubjectLabel::classify(true, false),
            SubjectLabel::classify(true, true),
        ];
        for (i, a) in labels.iter().enumerate() {
            for b in &labels[i + 1..] {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
        assert!(!SubjectLabel::NormalReal.as_str().contains("Alert"));
        assert!(!SubjectLabel::NormalTest.as_str().contains("Alert"));
        assert!(SubjectLabel::NormalTest.as_str().starts_with("[TEST]"));
    }

    #[test]
    fn alert_report_leads_with_banner() {
        let r = record(12.34, vec![ServiceCost::new("Amazon EC2", 9.0)], false);
        let msg = format_report(&r, 5.0, 5, true);
        assert!(msg.subject.contains("Alert"));
        assert!(msg.subject.contains("$12.34"));
        assert!(msg.body.starts_with("⚠️ ALERT"));
        assert!(msg.body.contains("  1. Amazon EC2: $9.00"));
    }

    #[test]
    fn empty_services_report_has_placeholder_and_no_banner() {
        let r = record(2.00, vec![], false);
        let msg = format_report(&r, 5.0, 5, true);
        assert!(!msg.subject.contains("Alert"));
        assert!(!msg.body.contains("ALERT"));
        assert!(msg.body.contains("No services recorded"));
        assert!(msg.body.contains("Total Cost: $2.00"));
    }

    #[test]
    fn report_lists_only_display_top_n() {
        let services = (0..8)
            .map(|i| ServiceCost::new(format!("svc-{}", i), 10.0 - i as f64))
            .collect();
        let msg = format_report(&record(60.0, services, false), 100.0, 5, true);
        assert!(msg.body.contains("  5. svc-4: $6.00"));
        assert!(!msg.body.contains("svc-5"));
    }

    #[test]
    fn test_mode_footer_and_subject() {
        let msg = format_report(&record(1.0, vec![], true), 5.0, 5, false);
        assert!(msg.subject.starts_with("[TEST] Daily Cost Report"));
        assert!(msg.body.contains("TEST MODE"));
        assert!(msg.body.contains("Not saved to cost history"));
        assert!(msg.body.contains("lag by up to 24 hours"));
    }

    #[test]
    fn negative_and_zero_totals_format() {
        let msg = format_report(&record(-0.5, vec![], false), 5.0, 5, true);
        assert!(msg.body.contains("Total Cost: $-0.50"));
        let msg = format_report(&record(0.0, vec![], false), 0.0, 5, true);
        assert!(!msg.subject.contains("Alert"));
    }

    #[test]
    fn no_data_and_failure_messages() {
        let msg = format_no_data(7);
        assert!(msg.subject.contains("No Data"));
        assert!(msg.body.contains("last 7 days"));

        let msg = format_failure("Cost Explorer unreachable");
        assert!(msg.subject.contains("Error"));
        assert!(msg.body.contains("Cost Explorer unreachable"));
    }
}
