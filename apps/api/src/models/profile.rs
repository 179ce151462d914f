use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

/// Profile shown on the "my profile" screen, stitched from the member
/// record, its `basic_info` trait and the recruiting CRM profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume: Option<Value>,
}

/// Validated "update my profile" form.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub city: String,
    pub country: String,
    pub phone: String,
    pub availability: bool,
    pub resume: Option<ResumeFile>,
}

/// An uploaded attachment forwarded to the recruiting CRM as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Multipart fields sent to the recruiting CRM profile endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RecruitingProfileUpdate {
    pub phone: String,
    pub availability: bool,
    pub city: String,
    pub country_name: String,
}
