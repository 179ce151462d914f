//! Query-string validation for the applications routes.
//!
//! Every failing field contributes one message; they are reported together.

use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::candidate::ApplicationStatusFilter;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_PER_PAGE: u64 = 20;
pub const MAX_PER_PAGE: u64 = 100;

const SORT_BY: &[&str] = &["id", "status"];
const SORT_ORDER: &[&str] = &["desc", "asc"];

/// Validated criteria of "my job applications".
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationCriteria {
    pub page: u64,
    pub per_page: u64,
    pub sort_by: String,
    pub sort_order: String,
    pub status: Option<ApplicationStatusFilter>,
}

impl Default for ApplicationCriteria {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort_by: "id".to_string(),
            sort_order: "desc".to_string(),
            status: None,
        }
    }
}

impl ApplicationCriteria {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut errors = Vec::new();
        let mut criteria = Self::default();

        if let Some(raw) = params.get("page") {
            if let Some(page) = bounded_integer("page", raw, 1, None, &mut errors) {
                criteria.page = page;
            }
        }
        if let Some(raw) = params.get("perPage") {
            if let Some(per_page) =
                bounded_integer("perPage", raw, 1, Some(MAX_PER_PAGE), &mut errors)
            {
                criteria.per_page = per_page;
            }
        }
        if let Some(raw) = params.get("sortBy") {
            if let Some(v) = one_of("sortBy", raw, SORT_BY, &mut errors) {
                criteria.sort_by = v;
            }
        }
        if let Some(raw) = params.get("sortOrder") {
            if let Some(v) = one_of("sortOrder", raw, SORT_ORDER, &mut errors) {
                criteria.sort_order = v;
            }
        }
        if let Some(raw) = params.get("status") {
            match ApplicationStatusFilter::parse(raw) {
                Some(status) => criteria.status = Some(status),
                None => {
                    let allowed: Vec<&str> = ApplicationStatusFilter::ALL
                        .iter()
                        .map(|f| f.as_str())
                        .collect();
                    errors.push(format!(
                        "\"status\" must be one of [{}]",
                        allowed.join(", ")
                    ));
                }
            }
        }
        reject_unknown(
            params,
            &["page", "perPage", "sortBy", "sortOrder", "status"],
            &mut errors,
        );

        if errors.is_empty() {
            Ok(criteria)
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Validated criteria of the job sync check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobSyncCriteria {
    pub external_id: Option<String>,
}

impl JobSyncCriteria {
    pub fn from_query(params: &HashMap<String, String>) -> Result<Self, AppError> {
        let mut errors = Vec::new();
        let external_id = params.get("externalId").cloned();
        if external_id.as_deref() == Some("") {
            errors.push("\"externalId\" is not allowed to be empty".to_string());
        }
        reject_unknown(params, &["externalId"], &mut errors);

        if errors.is_empty() {
            Ok(Self { external_id })
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

fn bounded_integer(
    key: &str,
    raw: &str,
    min: u64,
    max: Option<u64>,
    errors: &mut Vec<String>,
) -> Option<u64> {
    let value = match raw.trim().parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            errors.push(format!("\"{key}\" must be a number"));
            return None;
        }
    };
    if value < min as i64 {
        errors.push(format!("\"{key}\" must be larger than or equal to {min}"));
        return None;
    }
    let value = value as u64;
    if let Some(max) = max {
        if value > max {
            errors.push(format!("\"{key}\" must be less than or equal to {max}"));
            return None;
        }
    }
    Some(value)
}

fn one_of(key: &str, raw: &str, allowed: &[&str], errors: &mut Vec<String>) -> Option<String> {
    if allowed.contains(&raw) {
        Some(raw.to_string())
    } else {
        errors.push(format!("\"{key}\" must be one of [{}]", allowed.join(", ")));
        None
    }
}

fn reject_unknown(params: &HashMap<String, String>, known: &[&str], errors: &mut Vec<String>) {
    let mut unknown: Vec<&String> = params
        .keys()
        .filter(|k| !known.contains(&k.as_str()))
        .collect();
    unknown.sort();
    errors.extend(unknown.into_iter().map(|k| format!("\"{k}\" is not allowed")));
}
