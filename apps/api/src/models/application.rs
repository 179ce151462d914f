use serde::Serialize;
use serde_json::Value;

use crate::models::candidate::Interview;

/// Currency shown for every application, whatever the job record carries.
pub const DISPLAY_CURRENCY: &str = "$";

/// The flattened view of a candidacy returned to the web client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rb_start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rb_end_date: Option<String>,
    pub updated_at: Option<String>,
    pub payment: Payment,
    pub hours_per_week: Option<f64>,
    pub location: Option<String>,
    pub working_hours: Option<String>,
    pub status: String,
    pub interview: Option<Interview>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remark: Option<String>,
    pub duration: Option<Value>,
    pub job_external_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub frequency: Option<String>,
    pub currency: &'static str,
}

/// Answer of the job sync check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub synced: bool,
}
