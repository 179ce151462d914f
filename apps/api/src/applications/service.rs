use chrono::NaiveDate;
use tracing::{debug, info};

use crate::applications::criteria::{ApplicationCriteria, JobSyncCriteria};
use crate::applications::derivation::{apply_payment_totals, build_applications, mark_completed};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::gateway::search::{CandidateSearch, JobSearch};
use crate::gateway::Upstream;
use crate::models::application::{JobApplication, SyncStatus};
use crate::models::candidate::{
    ApplicationStatusFilter, JobCandidate, STATUS_COMPLETED, STATUS_PLACED,
};
use crate::models::paging::PagedResult;

/// Job applications of the calling end user.
///
/// Pagination numbers are the candidate fetch's own, even when the
/// active/completed split drops candidates afterwards.
pub async fn get_my_job_applications(
    upstream: &dyn Upstream,
    user: &CurrentUser,
    criteria: &ApplicationCriteria,
    today: NaiveDate,
) -> Result<PagedResult<JobApplication>, AppError> {
    let empty = PagedResult::empty(criteria.page, criteria.per_page);
    if user.is_machine {
        return Ok(empty);
    }

    let (user_id, user_handle) = resolve_identity(upstream, user).await?;

    let candidates = upstream
        .fetch_job_candidates(&CandidateSearch {
            user_id: user_id.clone(),
            page: criteria.page,
            per_page: criteria.per_page,
            sort_by: criteria.sort_by.clone(),
            sort_order: criteria.sort_order.clone(),
            status: criteria.status,
        })
        .await?;
    if candidates.result.is_empty() {
        return Ok(empty);
    }

    let PagedResult {
        total,
        page,
        per_page,
        result: mut job_candidates,
    } = candidates;

    if let Some(filter) = criteria.status.filter(|f| f.derives_completion()) {
        handle_placed_candidates(upstream, &mut job_candidates, &user_id, &user_handle, today)
            .await?;
        let want_completed = filter == ApplicationStatusFilter::CompletedJobs;
        job_candidates.retain(|jc| (jc.status == STATUS_COMPLETED) == want_completed);
        debug!(
            "{} candidates left after {} split",
            job_candidates.len(),
            filter.as_str()
        );
    }

    if job_candidates.is_empty() {
        return Ok(PagedResult {
            total,
            page,
            per_page,
            result: Vec::new(),
        });
    }

    let job_ids = job_candidates.iter().map(|jc| jc.job_id.clone()).collect();
    let jobs = upstream
        .fetch_jobs(&JobSearch {
            job_ids,
            page: Some(1),
            per_page: Some(criteria.per_page),
            ..Default::default()
        })
        .await?;

    let applications = build_applications(&job_candidates, &jobs.result);
    info!(
        "Returning {} job applications for {user_handle}",
        applications.len()
    );

    Ok(PagedResult {
        total,
        page,
        per_page,
        result: applications,
    })
}

/// Whether the caller is already among the candidates of the job with the
/// given external id.
pub async fn get_job(
    upstream: &dyn Upstream,
    user: &CurrentUser,
    criteria: &JobSyncCriteria,
) -> Result<SyncStatus, AppError> {
    if user.is_machine {
        return Ok(SyncStatus { synced: false });
    }

    let profile = upstream.fetch_current_user_profile(&user.bearer()).await?;
    let user_id = profile.id.filter(|id| !id.is_empty()).ok_or_else(|| {
        AppError::NotFound(format!(
            "Id for user: {} not found",
            user.user_id.as_deref().unwrap_or("unknown")
        ))
    })?;

    let jobs = upstream
        .fetch_jobs(&JobSearch {
            external_id: criteria.external_id.clone(),
            ..Default::default()
        })
        .await?;

    let synced = jobs
        .result
        .first()
        .and_then(|job| job.candidates.as_ref())
        .is_some_and(|candidates| candidates.iter().any(|c| c.user_id == user_id));

    Ok(SyncStatus { synced })
}

async fn resolve_identity(
    upstream: &dyn Upstream,
    user: &CurrentUser,
) -> Result<(String, String), AppError> {
    let profile = upstream.fetch_current_user_profile(&user.bearer()).await?;
    match (
        profile.id.filter(|v| !v.is_empty()),
        profile.handle.filter(|v| !v.is_empty()),
    ) {
        (Some(id), Some(handle)) => Ok((id, handle)),
        _ => Err(AppError::NotFound(format!(
            "Id for user: {} or handle for user: {} not found",
            user.user_id.as_deref().unwrap_or("unknown"),
            user.handle.as_deref().unwrap_or("unknown")
        ))),
    }
}

/// Looks up bookings of placed candidates, marks ended ones completed and
/// attaches their payment totals.
async fn handle_placed_candidates(
    upstream: &dyn Upstream,
    candidates: &mut [JobCandidate],
    user_id: &str,
    user_handle: &str,
    today: NaiveDate,
) -> Result<(), AppError> {
    let placed_job_ids: Vec<String> = candidates
        .iter()
        .filter(|jc| jc.status == STATUS_PLACED)
        .map(|jc| jc.job_id.clone())
        .collect();
    if placed_job_ids.is_empty() {
        return Ok(());
    }

    let bookings = upstream
        .fetch_resource_bookings(user_id, &placed_job_ids)
        .await?;
    if bookings.is_empty() {
        return Ok(());
    }
    mark_completed(candidates, &bookings, user_handle, today);

    let booking_ids: Vec<String> = bookings.iter().map(|rb| rb.id.clone()).collect();
    let work_periods = upstream
        .fetch_work_periods(user_handle, &booking_ids)
        .await?;
    apply_payment_totals(candidates, &booking_ids, &work_periods, user_handle);
    Ok(())
}
