//! Pure derivation steps: completed status, payment totals, and the join of
//! candidates with jobs. No I/O here.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

use crate::models::application::{JobApplication, Payment, DISPLAY_CURRENCY};
use crate::models::candidate::{
    Interview, JobCandidate, ResourceBooking, WorkPeriod, STATUS_COMPLETED,
};
use crate::models::job::Job;

/// Calendar day of an upstream date, accepting `2021-03-01`,
/// RFC 3339 timestamps and naive `2021-03-01T10:00:00` forms.
pub fn calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|ts| ts.date())
}

/// A booking has ended once its end day is strictly before today.
/// Ending today does not count.
pub fn has_ended(end_date: Option<&str>, today: NaiveDate) -> bool {
    let Some(raw) = end_date else {
        return false;
    };
    match calendar_day(raw) {
        Some(day) => day < today,
        None => {
            warn!("Ignoring unparseable resource booking end date {raw:?}");
            false
        }
    }
}

/// Marks candidates whose booking has ended as `completed` and attaches the
/// booking details to them.
pub fn mark_completed(
    candidates: &mut [JobCandidate],
    bookings: &[ResourceBooking],
    user_handle: &str,
    today: NaiveDate,
) {
    for rb in bookings {
        let Some(jc) = candidates
            .iter_mut()
            .find(|jc| jc.user_id == rb.user_id && jc.job_id == rb.job_id)
        else {
            continue;
        };
        if has_ended(rb.end_date.as_deref(), today) {
            jc.status = STATUS_COMPLETED.to_string();
            jc.rb_start_date = rb.start_date.clone();
            jc.rb_end_date = rb.end_date.clone();
            jc.rb_id = Some(rb.id.clone());
            jc.user_handle = Some(user_handle.to_string());
        }
    }
}

/// Sums the caller's work periods per booking and stores the sum on the
/// candidate carrying that booking. Candidates marked completed with no
/// work periods end up with 0.
pub fn apply_payment_totals(
    candidates: &mut [JobCandidate],
    booking_ids: &[String],
    work_periods: &[WorkPeriod],
    user_handle: &str,
) {
    for rb_id in booking_ids {
        let total: f64 = work_periods
            .iter()
            .filter(|wp| wp.user_handle == user_handle && &wp.resource_booking_id == rb_id)
            .map(|wp| wp.payment_total)
            .sum();
        if let Some(jc) = candidates.iter_mut().find(|jc| {
            jc.rb_id.as_deref() == Some(rb_id.as_str())
                && jc.user_handle.as_deref() == Some(user_handle)
        }) {
            jc.payment_total = Some(total);
        }
    }
}

/// The interview with the highest round; the first one wins a tie.
pub fn latest_interview(interviews: &[Interview]) -> Option<&Interview> {
    interviews.iter().fold(None, |best, interview| match best {
        Some(b) if b.round >= interview.round => Some(b),
        _ => Some(interview),
    })
}

/// Joins candidates with their jobs. Candidates whose job was not returned
/// are dropped.
pub fn build_applications(candidates: &[JobCandidate], jobs: &[Job]) -> Vec<JobApplication> {
    candidates
        .iter()
        .filter_map(|jc| {
            let job = jobs.iter().find(|job| job.id == jc.job_id)?;
            Some(JobApplication {
                title: job.title.clone(),
                payment_total: jc.payment_total,
                rb_start_date: jc.rb_start_date.clone(),
                rb_end_date: jc.rb_end_date.clone(),
                updated_at: jc.updated_at.clone(),
                payment: Payment {
                    min: job.min_salary,
                    max: job.max_salary,
                    frequency: job.rate_type.clone(),
                    currency: DISPLAY_CURRENCY,
                },
                hours_per_week: job.hours_per_week,
                location: job.job_location.clone(),
                working_hours: job.job_timezone.clone(),
                status: jc.status.clone(),
                interview: jc
                    .interviews
                    .as_deref()
                    .and_then(latest_interview)
                    .cloned(),
                remark: jc.remark.clone(),
                duration: job.duration.clone(),
                job_external_id: job.external_id.clone(),
            })
        })
        .collect()
}
