//! Axum route handlers for the job applications API.

use std::collections::HashMap;

use axum::{
    extract::{OriginalUri, Query, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;

use crate::applications::criteria::{ApplicationCriteria, JobSyncCriteria};
use crate::applications::service::{get_job, get_my_job_applications};
use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::models::application::{JobApplication, SyncStatus};
use crate::routes::pagination::{pagination_headers, request_url};
use crate::state::AppState;

/// GET {base}/myJobApplications
///
/// Body is the bare list; pagination travels in headers.
pub async fn handle_my_job_applications(
    State(state): State<AppState>,
    user: CurrentUser,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Result<(HeaderMap, Json<Vec<JobApplication>>), AppError> {
    let criteria = ApplicationCriteria::from_query(&params)?;
    let today = Utc::now().date_naive();
    let result = get_my_job_applications(state.upstream.as_ref(), &user, &criteria, today).await?;

    let response_headers = pagination_headers(
        &request_url(&headers, &uri),
        result.page,
        result.per_page,
        result.total,
    );
    Ok((response_headers, Json(result.result)))
}

/// GET {base}/job?externalId=
pub async fn handle_job_sync(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SyncStatus>, AppError> {
    let criteria = JobSyncCriteria::from_query(&params)?;
    let status = get_job(state.upstream.as_ref(), &user, &criteria).await?;
    Ok(Json(status))
}
