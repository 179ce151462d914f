use serde_json::{json, Value};

use crate::models::candidate::ApplicationStatusFilter;

/// Query for the job-candidate service.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSearch {
    pub user_id: String,
    pub page: u64,
    pub per_page: u64,
    pub sort_by: String,
    pub sort_order: String,
    pub status: Option<ApplicationStatusFilter>,
}

impl CandidateSearch {
    /// Query string parameters. The status filter travels in the body instead.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("userId", self.user_id.clone()),
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
            ("sortBy", self.sort_by.clone()),
            ("sortOrder", self.sort_order.clone()),
        ]
    }

    /// `{"statuses": [...]}`; an empty list means unfiltered.
    pub fn status_body(&self) -> Value {
        let statuses: &[&str] = self
            .status
            .map(ApplicationStatusFilter::upstream_statuses)
            .unwrap_or(&[]);
        json!({ "statuses": statuses })
    }
}

/// Query for the job service. Id and skill lists are sent in the body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSearch {
    pub job_ids: Vec<String>,
    pub body_skills: Vec<String>,
    pub external_id: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl JobSearch {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(external_id) = &self.external_id {
            pairs.push(("externalId", external_id.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            pairs.push(("perPage", per_page.to_string()));
        }
        pairs
    }

    pub fn body(&self) -> Value {
        json!({ "jobIds": self.job_ids, "bodySkills": self.body_skills })
    }
}
