//! In-memory `Upstream` for service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::search::{CandidateSearch, JobSearch};
use super::Upstream;
use crate::errors::AppError;
use crate::models::candidate::{JobCandidate, ResourceBooking, WorkPeriod};
use crate::models::job::Job;
use crate::models::paging::PagedResult;
use crate::models::profile::{RecruitingProfileUpdate, ResumeFile};
use crate::models::user::UserProfile;

/// Serves canned data and records every call by name.
pub struct FakeUpstream {
    pub profile: UserProfile,
    pub candidates: Vec<JobCandidate>,
    /// Pagination headers echoed by the candidate fetch.
    pub candidate_total: u64,
    pub bookings: Vec<ResourceBooking>,
    pub work_periods: Vec<WorkPeriod>,
    pub jobs: Vec<Job>,
    pub member: Value,
    pub traits: Value,
    pub recruiting_profile: Value,
    /// When set, every call fails with this upstream status.
    pub fail_with: Option<u16>,
    pub calls: Mutex<Vec<String>>,
    pub candidate_searches: Mutex<Vec<CandidateSearch>>,
    pub job_searches: Mutex<Vec<JobSearch>>,
    pub writes: Mutex<Vec<(String, Value)>>,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            profile: UserProfile {
                id: Some("u1".to_string()),
                handle: Some("h1".to_string()),
            },
            candidates: Vec::new(),
            candidate_total: 0,
            bookings: Vec::new(),
            work_periods: Vec::new(),
            jobs: Vec::new(),
            member: json!({}),
            traits: json!([]),
            recruiting_profile: json!({}),
            fail_with: None,
            calls: Mutex::new(Vec::new()),
            candidate_searches: Mutex::new(Vec::new()),
            job_searches: Mutex::new(Vec::new()),
            writes: Mutex::new(Vec::new()),
        }
    }
}

impl FakeUpstream {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls().iter().any(|c| c == name)
    }

    fn record(&self, name: &str) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(name.to_string());
        match self.fail_with {
            Some(status) => Err(AppError::Upstream {
                status,
                message: Some(format!("{name} failed")),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Upstream for FakeUpstream {
    async fn fetch_current_user_profile(&self, _bearer: &str) -> Result<UserProfile, AppError> {
        self.record("fetch_current_user_profile")?;
        Ok(self.profile.clone())
    }

    async fn fetch_job_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<PagedResult<JobCandidate>, AppError> {
        self.record("fetch_job_candidates")?;
        self.candidate_searches.lock().unwrap().push(criteria.clone());
        Ok(PagedResult {
            total: self.candidate_total,
            page: criteria.page,
            per_page: criteria.per_page,
            result: self.candidates.clone(),
        })
    }

    async fn fetch_resource_bookings(
        &self,
        user_id: &str,
        job_ids: &[String],
    ) -> Result<Vec<ResourceBooking>, AppError> {
        self.record("fetch_resource_bookings")?;
        Ok(self
            .bookings
            .iter()
            .filter(|rb| rb.user_id == user_id && job_ids.contains(&rb.job_id))
            .cloned()
            .collect())
    }

    async fn fetch_work_periods(
        &self,
        _user_handle: &str,
        resource_booking_ids: &[String],
    ) -> Result<Vec<WorkPeriod>, AppError> {
        self.record("fetch_work_periods")?;
        // Handle filtering is left to the caller on purpose.
        Ok(self
            .work_periods
            .iter()
            .filter(|wp| resource_booking_ids.contains(&wp.resource_booking_id))
            .cloned()
            .collect())
    }

    async fn fetch_jobs(&self, criteria: &JobSearch) -> Result<PagedResult<Job>, AppError> {
        self.record("fetch_jobs")?;
        self.job_searches.lock().unwrap().push(criteria.clone());
        let jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|j| criteria.job_ids.is_empty() || criteria.job_ids.contains(&j.id))
            .filter(|j| match &criteria.external_id {
                Some(ext) => j.external_id.as_deref() == Some(ext.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        Ok(PagedResult {
            total: jobs.len() as u64,
            page: criteria.page.unwrap_or(1),
            per_page: criteria.per_page.unwrap_or(20),
            result: jobs,
        })
    }

    async fn fetch_member(&self, _handle: &str, _fields: &[&str]) -> Result<Value, AppError> {
        self.record("fetch_member")?;
        Ok(self.member.clone())
    }

    async fn update_member(
        &self,
        _bearer: &str,
        _handle: &str,
        data: &Value,
    ) -> Result<Value, AppError> {
        self.record("update_member")?;
        self.writes
            .lock()
            .unwrap()
            .push(("update_member".to_string(), data.clone()));
        Ok(data.clone())
    }

    async fn fetch_member_traits(
        &self,
        _handle: &str,
        _trait_ids: &[&str],
    ) -> Result<Value, AppError> {
        self.record("fetch_member_traits")?;
        Ok(self.traits.clone())
    }

    async fn update_member_traits(
        &self,
        _bearer: &str,
        _handle: &str,
        data: &Value,
    ) -> Result<Value, AppError> {
        self.record("update_member_traits")?;
        self.writes
            .lock()
            .unwrap()
            .push(("update_member_traits".to_string(), data.clone()));
        Ok(data.clone())
    }

    async fn fetch_recruiting_profile(&self, _bearer: &str) -> Result<Value, AppError> {
        self.record("fetch_recruiting_profile")?;
        Ok(self.recruiting_profile.clone())
    }

    async fn update_recruiting_profile(
        &self,
        _bearer: &str,
        data: &RecruitingProfileUpdate,
        file: Option<&ResumeFile>,
    ) -> Result<Value, AppError> {
        self.record("update_recruiting_profile")?;
        let written = json!({
            "phone": data.phone,
            "availability": data.availability,
            "city": data.city,
            "countryName": data.country_name,
            "resume": file.map(|f| f.file_name.clone()),
        });
        self.writes
            .lock()
            .unwrap()
            .push(("update_recruiting_profile".to_string(), written.clone()));
        Ok(written)
    }
}
