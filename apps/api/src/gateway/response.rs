//! Turning raw upstream answers into envelopes and errors.

use reqwest::{header::HeaderMap, StatusCode};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::paging::PagedResult;

/// Reads a numeric pagination header. Absent or garbled values count as 0.
pub fn header_number(headers: &HeaderMap, name: &str) -> u64 {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Wraps a list body with the `x-total` / `x-page` / `x-per-page` headers.
pub fn paged<T>(headers: &HeaderMap, result: Vec<T>) -> PagedResult<T> {
    PagedResult {
        total: header_number(headers, "x-total"),
        page: header_number(headers, "x-page"),
        per_page: header_number(headers, "x-per-page"),
        result,
    }
}

/// Maps a non-2xx answer to `AppError::Upstream`.
///
/// The message comes from the V3 shape (`result.content.message`) or the V5
/// shape (`message`). A 403 carrying the V3 permission payload is reported as
/// 401 so the web client restarts its login flow.
pub fn upstream_error(status: StatusCode, body: &str) -> AppError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let v3_message = parsed
        .as_ref()
        .and_then(|v| v.pointer("/result/content/message"))
        .and_then(Value::as_str);
    let v5_message = parsed
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str);

    let status = if status == StatusCode::FORBIDDEN && v3_message.is_some() {
        StatusCode::UNAUTHORIZED
    } else {
        status
    };

    AppError::Upstream {
        status: status.as_u16(),
        message: v3_message.or(v5_message).map(str::to_string),
    }
}
