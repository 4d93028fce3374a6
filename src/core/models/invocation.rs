use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::models::cost::ServiceCost;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// Fixed message returned when the billing source has no buckets yet.
pub const NO_DATA_MESSAGE: &str = "No cost data available yet";

/// Options recognised for a single run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvocationEvent {
    #[serde(default)]
    pub use_test_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub date: NaiveDate,
    pub total_cost: f64,
    pub top_services: Vec<ServiceCost>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert_sent: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to_db: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_mode: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultBody {
    Report(ReportSummary),
    NoData { message: String },
    Error { error: String },
}

/// Structured outcome of a run. Callers always get one of these, never an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvocationResult {
    pub status_code: u16,
    pub body: ResultBody,
}

impl InvocationResult {
    pub fn report(summary: ReportSummary) -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResultBody::Report(summary),
        }
    }

    pub fn no_data() -> Self {
        Self {
            status_code: STATUS_OK,
            body: ResultBody::NoData {
                message: NO_DATA_MESSAGE.to_string(),
            },
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status_code: STATUS_ERROR,
            body: ResultBody::Error {
                error: message.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == STATUS_OK
    }
}
