use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A job posting from the job service. Read-only here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub min_salary: Option<f64>,
    #[serde(default)]
    pub max_salary: Option<f64>,
    #[serde(default)]
    pub rate_type: Option<String>,
    #[serde(default)]
    pub hours_per_week: Option<f64>,
    #[serde(default)]
    pub job_location: Option<String>,
    #[serde(default)]
    pub job_timezone: Option<String>,
    /// Weeks as a number in most records, free text in some older ones.
    #[serde(default)]
    pub duration: Option<Value>,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub candidates: Option<Vec<JobCandidateRef>>,
}

/// The slice of an embedded candidate needed for the sync check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCandidateRef {
    pub user_id: String,
    #[serde(default)]
    pub status: Option<String>,
}
