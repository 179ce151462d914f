//! Upstream gateway: the only place that talks to the talent, member and
//! recruiting services.
//!
//! Service-to-service calls carry a machine token fetched fresh for each
//! operation. Member and recruiting-profile writes carry the caller's own
//! bearer token instead.

#[cfg(test)]
pub mod fake;
pub mod response;
pub mod search;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, ACCEPT, AUTHORIZATION},
    multipart::{Form, Part},
    Client, RequestBuilder, Url,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::auth::m2m::TokenProvider;
use crate::errors::AppError;
use crate::models::candidate::{JobCandidate, ResourceBooking, WorkPeriod};
use crate::models::job::Job;
use crate::models::paging::PagedResult;
use crate::models::profile::{RecruitingProfileUpdate, ResumeFile};
use crate::models::user::UserProfile;

use self::response::{paged, upstream_error};
use self::search::{CandidateSearch, JobSearch};

/// Everything the services need from upstream. Carried in `AppState` as
/// `Arc<dyn Upstream>`; tests use an in-memory fake.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// `bearer` is the caller's full `Authorization` value.
    async fn fetch_current_user_profile(&self, bearer: &str) -> Result<UserProfile, AppError>;

    async fn fetch_job_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<PagedResult<JobCandidate>, AppError>;

    async fn fetch_resource_bookings(
        &self,
        user_id: &str,
        job_ids: &[String],
    ) -> Result<Vec<ResourceBooking>, AppError>;

    async fn fetch_work_periods(
        &self,
        user_handle: &str,
        resource_booking_ids: &[String],
    ) -> Result<Vec<WorkPeriod>, AppError>;

    async fn fetch_jobs(&self, criteria: &JobSearch) -> Result<PagedResult<Job>, AppError>;

    async fn fetch_member(&self, handle: &str, fields: &[&str]) -> Result<Value, AppError>;

    async fn update_member(&self, bearer: &str, handle: &str, data: &Value)
        -> Result<Value, AppError>;

    async fn fetch_member_traits(&self, handle: &str, trait_ids: &[&str])
        -> Result<Value, AppError>;

    async fn update_member_traits(
        &self,
        bearer: &str,
        handle: &str,
        data: &Value,
    ) -> Result<Value, AppError>;

    async fn fetch_recruiting_profile(&self, bearer: &str) -> Result<Value, AppError>;

    async fn update_recruiting_profile(
        &self,
        bearer: &str,
        data: &RecruitingProfileUpdate,
        file: Option<&ResumeFile>,
    ) -> Result<Value, AppError>;
}

/// reqwest-backed gateway.
#[derive(Clone)]
pub struct GatewayClient {
    http: Client,
    api_v5: Url,
    recruit_api: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl GatewayClient {
    pub fn new(
        http: Client,
        api_v5_url: &str,
        recruit_api_url: &str,
        tokens: Arc<dyn TokenProvider>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            http,
            api_v5: Url::parse(api_v5_url)?,
            recruit_api: Url::parse(recruit_api_url)?,
            tokens,
        })
    }

    async fn machine_bearer(&self) -> Result<String, AppError> {
        Ok(format!("Bearer {}", self.tokens.machine_token().await?))
    }

    /// Sends the request and decodes a 2xx JSON body. Anything else becomes
    /// an upstream error.
    async fn send<T: DeserializeOwned>(
        &self,
        context: &str,
        request: RequestBuilder,
    ) -> Result<(HeaderMap, T), AppError> {
        let response = request.header(ACCEPT, "application/json").send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(context, "response body: {body}");

        if !status.is_success() {
            warn!(context, "upstream returned {status}");
            return Err(upstream_error(status, &body));
        }

        let body = if body.trim().is_empty() { "null" } else { &body };
        let parsed = serde_json::from_str(body).map_err(|e| {
            AppError::Internal(anyhow::anyhow!("{context}: unreadable upstream body: {e}"))
        })?;
        Ok((headers, parsed))
    }
}

/// `base` with `segments` appended, each percent-encoded.
fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, AppError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("{base} cannot be a base URL")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[async_trait]
impl Upstream for GatewayClient {
    async fn fetch_current_user_profile(&self, bearer: &str) -> Result<UserProfile, AppError> {
        let url = endpoint(&self.api_v5, &["taas-teams", "me"])?;
        let request = self.http.get(url).header(AUTHORIZATION, bearer);
        // An empty answer means no talent record; the service reports it as not found.
        let (_, profile): (_, Option<UserProfile>) =
            self.send("fetchCurrentUserProfile", request).await?;
        Ok(profile.unwrap_or_default())
    }

    async fn fetch_job_candidates(
        &self,
        criteria: &CandidateSearch,
    ) -> Result<PagedResult<JobCandidate>, AppError> {
        let url = endpoint(&self.api_v5, &["jobCandidates"])?;
        let request = self
            .http
            .get(url)
            .query(&criteria.query_pairs())
            .json(&criteria.status_body())
            .header(AUTHORIZATION, self.machine_bearer().await?);
        let (headers, candidates) = self.send("fetchJobCandidates", request).await?;
        Ok(paged(&headers, candidates))
    }

    async fn fetch_resource_bookings(
        &self,
        user_id: &str,
        job_ids: &[String],
    ) -> Result<Vec<ResourceBooking>, AppError> {
        let url = endpoint(&self.api_v5, &["resourceBookings"])?;
        // One page sized to the id list; the service returns at most one booking per job.
        let query = [
            ("userId", user_id.to_string()),
            ("page", "1".to_string()),
            ("perPage", job_ids.len().to_string()),
        ];
        let request = self
            .http
            .get(url)
            .query(&query)
            .json(&json!({ "jobIds": job_ids }))
            .header(AUTHORIZATION, self.machine_bearer().await?);
        let (_, bookings) = self.send("fetchResourceBookings", request).await?;
        Ok(bookings)
    }

    async fn fetch_work_periods(
        &self,
        user_handle: &str,
        resource_booking_ids: &[String],
    ) -> Result<Vec<WorkPeriod>, AppError> {
        let url = endpoint(&self.api_v5, &["work-periods"])?;
        let query = [
            ("userHandle", user_handle.to_string()),
            ("resourceBookingIds", resource_booking_ids.join(",")),
        ];
        let request = self
            .http
            .get(url)
            .query(&query)
            .header(AUTHORIZATION, self.machine_bearer().await?);
        let (_, periods) = self.send("fetchWorkPeriods", request).await?;
        Ok(periods)
    }

    async fn fetch_jobs(&self, criteria: &JobSearch) -> Result<PagedResult<Job>, AppError> {
        let url = endpoint(&self.api_v5, &["jobs"])?;
        let request = self
            .http
            .get(url)
            .query(&criteria.query_pairs())
            .json(&criteria.body())
            .header(AUTHORIZATION, self.machine_bearer().await?);
        let (headers, jobs) = self.send("fetchJobs", request).await?;
        Ok(paged(&headers, jobs))
    }

    async fn fetch_member(&self, handle: &str, fields: &[&str]) -> Result<Value, AppError> {
        let url = endpoint(&self.api_v5, &["members", handle])?;
        let mut request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.machine_bearer().await?);
        if !fields.is_empty() {
            request = request.query(&[("fields", fields.join(","))]);
        }
        let (_, member) = self.send("fetchMember", request).await?;
        Ok(member)
    }

    async fn update_member(
        &self,
        bearer: &str,
        handle: &str,
        data: &Value,
    ) -> Result<Value, AppError> {
        let url = endpoint(&self.api_v5, &["members", handle])?;
        let request = self.http.put(url).header(AUTHORIZATION, bearer).json(data);
        let (_, member) = self.send("updateMember", request).await?;
        Ok(member)
    }

    async fn fetch_member_traits(
        &self,
        handle: &str,
        trait_ids: &[&str],
    ) -> Result<Value, AppError> {
        let url = endpoint(&self.api_v5, &["members", handle, "traits"])?;
        let mut request = self
            .http
            .get(url)
            .header(AUTHORIZATION, self.machine_bearer().await?);
        if !trait_ids.is_empty() {
            request = request.query(&[("traitIds", trait_ids.join(","))]);
        }
        let (_, traits) = self.send("fetchMemberTraits", request).await?;
        Ok(traits)
    }

    async fn update_member_traits(
        &self,
        bearer: &str,
        handle: &str,
        data: &Value,
    ) -> Result<Value, AppError> {
        let url = endpoint(&self.api_v5, &["members", handle, "traits"])?;
        let request = self.http.put(url).header(AUTHORIZATION, bearer).json(data);
        let (_, traits) = self.send("updateMemberTraits", request).await?;
        Ok(traits)
    }

    async fn fetch_recruiting_profile(&self, bearer: &str) -> Result<Value, AppError> {
        let url = endpoint(&self.recruit_api, &["api", "recruit", "profile"])?;
        let request = self.http.get(url).header(AUTHORIZATION, bearer);
        let (_, profile) = self.send("fetchRecruitingProfile", request).await?;
        Ok(profile)
    }

    async fn update_recruiting_profile(
        &self,
        bearer: &str,
        data: &RecruitingProfileUpdate,
        file: Option<&ResumeFile>,
    ) -> Result<Value, AppError> {
        let url = endpoint(&self.recruit_api, &["api", "recruit", "profile"])?;

        let mut form = Form::new()
            .text("phone", data.phone.clone())
            .text("availability", data.availability.to_string())
            .text("city", data.city.clone())
            .text("countryName", data.country_name.clone());
        if let Some(file) = file {
            let mut part = Part::bytes(file.data.to_vec()).file_name(file.file_name.clone());
            if let Some(content_type) = &file.content_type {
                part = part.mime_str(content_type)?;
            }
            form = form.part("resume", part);
        }

        let request = self
            .http
            .post(url)
            .header(AUTHORIZATION, bearer)
            .multipart(form);
        let (_, profile) = self.send("updateRecruitingProfile", request).await?;
        Ok(profile)
    }
}
