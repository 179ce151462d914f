use std::collections::HashMap;

use axum::extract::Multipart;

use crate::errors::AppError;
use crate::models::profile::{ProfileUpdate, ResumeFile};

const TEXT_FIELDS: &[&str] = &["firstName", "lastName", "city", "country", "phone"];
const RESUME_FIELD: &str = "resume";

/// Reads the multipart body into text fields and an optional resume file.
pub async fn read_profile_form(mut multipart: Multipart) -> Result<ProfileUpdate, AppError> {
    let mut fields = HashMap::new();
    let mut resume = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == RESUME_FIELD {
            let file_name = field.file_name().unwrap_or("resume").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("Unreadable resume upload: {e}")))?;
            if !data.is_empty() {
                resume = Some(ResumeFile {
                    file_name,
                    content_type,
                    data,
                });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::validation(format!("Unreadable field \"{name}\": {e}")))?;
            fields.insert(name, value);
        }
    }

    validate_profile_form(&fields, resume)
}

/// Checks required fields and collects every failure into one error.
pub fn validate_profile_form(
    fields: &HashMap<String, String>,
    resume: Option<ResumeFile>,
) -> Result<ProfileUpdate, AppError> {
    let mut errors = Vec::new();

    let mut text = |key: &str| -> String {
        match fields.get(key).map(|v| v.trim()) {
            None => {
                errors.push(format!("\"{key}\" is required"));
                String::new()
            }
            Some("") => {
                errors.push(format!("\"{key}\" is not allowed to be empty"));
                String::new()
            }
            Some(v) => v.to_string(),
        }
    };
    let first_name = text("firstName");
    let last_name = text("lastName");
    let city = text("city");
    let country = text("country");
    let phone = text("phone");

    let availability = match fields.get("availability").map(|v| v.trim()) {
        Some("true") => true,
        Some("false") => false,
        Some(_) => {
            errors.push("\"availability\" must be a boolean".to_string());
            false
        }
        None => {
            errors.push("\"availability\" is required".to_string());
            false
        }
    };

    let mut unknown: Vec<&String> = fields
        .keys()
        .filter(|k| !TEXT_FIELDS.contains(&k.as_str()) && k.as_str() != "availability")
        .collect();
    unknown.sort();
    errors.extend(unknown.into_iter().map(|k| format!("\"{k}\" is not allowed")));

    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }
    Ok(ProfileUpdate {
        first_name,
        last_name,
        city,
        country,
        phone,
        availability,
        resume,
    })
}
