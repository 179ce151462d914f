use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const STATUS_PLACED: &str = "placed";
pub const STATUS_COMPLETED: &str = "completed";

/// A user's application to a job, as returned by the job-candidate service.
///
/// The `rb_*`, `payment_total` and `user_handle` fields are never sent by the
/// upstream; they are filled in while deriving the completed status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCandidate {
    #[serde(default)]
    pub id: Option<String>,
    pub user_id: String,
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub interviews: Option<Vec<Interview>>,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rb_start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rb_end_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_total: Option<f64>,
}

/// One interview round. Fields other than `round` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interview {
    pub round: i64,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceBooking {
    pub id: String,
    pub user_id: String,
    pub job_id: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkPeriod {
    #[serde(default)]
    pub id: Option<String>,
    pub user_handle: String,
    pub resource_booking_id: String,
    #[serde(default)]
    pub payment_total: f64,
}

/// The four status filters a client may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatusFilter {
    ActiveJobs,
    OpenJobs,
    CompletedJobs,
    ArchivedJobs,
}

impl ApplicationStatusFilter {
    pub const ALL: [ApplicationStatusFilter; 4] = [
        ApplicationStatusFilter::ActiveJobs,
        ApplicationStatusFilter::OpenJobs,
        ApplicationStatusFilter::CompletedJobs,
        ApplicationStatusFilter::ArchivedJobs,
    ];

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == raw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatusFilter::ActiveJobs => "active_jobs",
            ApplicationStatusFilter::OpenJobs => "open_jobs",
            ApplicationStatusFilter::CompletedJobs => "completed_jobs",
            ApplicationStatusFilter::ArchivedJobs => "archived_jobs",
        }
    }

    /// Candidate statuses the job-candidate service is asked to match.
    pub fn upstream_statuses(self) -> &'static [&'static str] {
        match self {
            ApplicationStatusFilter::ActiveJobs | ApplicationStatusFilter::CompletedJobs => {
                &[STATUS_PLACED]
            }
            ApplicationStatusFilter::OpenJobs => &[
                "applied",
                "skills-test",
                "phone-screen",
                "open",
                "interview",
                "selected",
                "offered",
            ],
            ApplicationStatusFilter::ArchivedJobs => &[
                "client rejected - screening",
                "client rejected - interview",
                "rejected - pre-screen",
                "job-closed",
                "withdrawn",
                "withdrawn-prescreen",
            ],
        }
    }

    /// Whether placed candidates must be checked against resource bookings.
    pub fn derives_completion(self) -> bool {
        matches!(
            self,
            ApplicationStatusFilter::ActiveJobs | ApplicationStatusFilter::CompletedJobs
        )
    }
}
