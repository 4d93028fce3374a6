use colored::{control, Colorize};

use crate::core::formatter::format_currency;
use crate::core::models::cost::{CostRecord, ServiceCost};
use crate::core::models::invocation::{InvocationResult, ResultBody};

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn render_services(lines: &mut Vec<String>, services: &[ServiceCost]) {
    if services.is_empty() {
        lines.push(format!("  {}  {}", "Services".cyan(), "none recorded".dimmed()));
        return;
    }
    let width = services
        .iter()
        .map(|s| s.service_name.chars().count())
        .max()
        .unwrap_or(0);
    for (i, svc) in services.iter().enumerate() {
        let label = if i == 0 { "Services" } else { "        " };
        lines.push(format!(
            "  {}  {}. {:<width$}  {}",
            label.cyan(),
            i + 1,
            svc.service_name,
            format_currency(svc.cost),
            width = width
        ));
    }
}

/// Render the outcome of a run as a colored (or plain) block.
///
/// Layout:
/// ```text
///  Cost report 2026-10-17
///   Total     $12.34
///   Services  1. Amazon EC2  $8.00
///             2. Amazon RDS  $3.10
///   Saved     yes
///   Notified  yes
/// ```
pub fn render_result(result: &InvocationResult, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    match &result.body {
        ResultBody::Report(summary) => {
            let mut header = format!(" Cost report {}", summary.date);
            if summary.test_mode == Some(true) {
                header.push_str(" (test data)");
            }
            lines.push(header.bold().to_string());
            lines.push(format!(
                "  {}     {}",
                "Total".cyan(),
                format_currency(summary.total_cost)
            ));
            render_services(&mut lines, &summary.top_services);
            lines.push(format!("  {}     {}", "Saved".cyan(), yes_no(summary.saved_to_db)));
            lines.push(format!("  {}  {}", "Notified".cyan(), yes_no(summary.alert_sent)));
        }
        ResultBody::NoData { message } => {
            lines.push(" Cost report".bold().to_string());
            lines.push(format!("  {}", message.yellow()));
        }
        ResultBody::Error { error } => {
            lines.push(" Cost report (error)".bold().to_string());
            lines.push(format!("  {}", error.red()));
        }
    }
    lines.join("\n")
}

/// Render a stored day as read back from history.
pub fn render_record(record: &CostRecord, use_color: bool) -> String {
    control::set_override(use_color);

    let mut header = format!(" {}", record.report_date);
    if record.is_synthetic {
        header.push_str(" (test data)");
    }
    let mut lines = vec![
        header.bold().to_string(),
        format!("  {}     {}", "Total".cyan(), format_currency(record.total_cost)),
    ];
    render_services(&mut lines, &record.services);
    lines.push(format!(
        "  {}  {}",
        "Captured".cyan(),
        record.captured_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.join("\n")
}
