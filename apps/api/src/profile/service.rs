use serde_json::{json, Value};
use tracing::info;

use crate::auth::CurrentUser;
use crate::errors::AppError;
use crate::gateway::Upstream;
use crate::models::profile::{MyProfile, ProfileUpdate, RecruitingProfileUpdate};

const MEMBER_FIELDS: &[&str] = &[
    "userId",
    "handle",
    "firstName",
    "lastName",
    "photoURL",
    "email",
    "addresses",
    "homeCountryCode",
    "competitionCountryCode",
];
const BASIC_INFO: &str = "basic_info";

/// Profile of the calling end user. Machine callers get an empty profile.
pub async fn get_my_profile(
    upstream: &dyn Upstream,
    user: &CurrentUser,
) -> Result<MyProfile, AppError> {
    if user.is_machine {
        return Ok(MyProfile::default());
    }
    let handle = require_handle(user)?;

    let member = upstream.fetch_member(handle, MEMBER_FIELDS).await?;
    let traits = upstream.fetch_member_traits(handle, &[BASIC_INFO]).await?;
    let recruiting = upstream.fetch_recruiting_profile(&user.bearer()).await?;

    Ok(assemble_profile(&member, &traits, &recruiting))
}

/// Writes the form to the member record, the basic_info trait and the
/// recruiting CRM, all with the caller's own token, then reads it back.
pub async fn update_my_profile(
    upstream: &dyn Upstream,
    user: &CurrentUser,
    update: &ProfileUpdate,
) -> Result<MyProfile, AppError> {
    if user.is_machine {
        return Err(AppError::Forbidden(
            "Machine tokens cannot update a member profile".to_string(),
        ));
    }
    let handle = require_handle(user)?;
    let bearer = user.bearer();

    let member = upstream.fetch_member(handle, MEMBER_FIELDS).await?;
    let traits = upstream.fetch_member_traits(handle, &[BASIC_INFO]).await?;

    upstream
        .update_member(&bearer, handle, &member_payload(&member, update))
        .await?;
    upstream
        .update_member_traits(&bearer, handle, &basic_info_payload(&traits, update))
        .await?;
    upstream
        .update_recruiting_profile(
            &bearer,
            &RecruitingProfileUpdate {
                phone: update.phone.clone(),
                availability: update.availability,
                city: update.city.clone(),
                country_name: update.country.clone(),
            },
            update.resume.as_ref(),
        )
        .await?;
    info!("Updated profile of {handle}");

    get_my_profile(upstream, user).await
}

fn require_handle(user: &CurrentUser) -> Result<&str, AppError> {
    user.handle
        .as_deref()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| AppError::NotFound("Handle for current user not found".to_string()))
}

fn text(value: &Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// First entry of the `basic_info` trait, if the member has one.
fn basic_info(traits: &Value) -> Option<&Value> {
    traits
        .as_array()?
        .iter()
        .find(|t| t.get("traitId").and_then(Value::as_str) == Some(BASIC_INFO))?
        .pointer("/traits/data/0")
}

pub fn assemble_profile(member: &Value, traits: &Value, recruiting: &Value) -> MyProfile {
    let basic = basic_info(traits);
    let availability = match recruiting.get("availability") {
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    };

    MyProfile {
        profile_photo: text(member, "/photoURL"),
        first_name: text(member, "/firstName"),
        last_name: text(member, "/lastName"),
        email: text(member, "/email"),
        handle: text(member, "/handle"),
        city: text(member, "/addresses/0/city"),
        country: basic.and_then(|b| text(b, "/country")),
        phone: basic.and_then(|b| text(b, "/phoneNumber")),
        availability,
        resume: recruiting.get("resume").filter(|r| !r.is_null()).cloned(),
    }
}

/// Name change plus the city of the first address; other addresses are kept.
fn member_payload(member: &Value, update: &ProfileUpdate) -> Value {
    let mut addresses = member
        .get("addresses")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    match addresses.first_mut() {
        Some(Value::Object(first)) => {
            first.insert("city".to_string(), json!(update.city));
        }
        _ => addresses.insert(0, json!({ "city": update.city })),
    }

    json!({
        "firstName": update.first_name,
        "lastName": update.last_name,
        "addresses": addresses,
    })
}

/// The `basic_info` trait with country and phone replaced, other keys kept.
fn basic_info_payload(traits: &Value, update: &ProfileUpdate) -> Value {
    let mut data = basic_info(traits)
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    data.insert("country".to_string(), json!(update.country));
    data.insert("phoneNumber".to_string(), json!(update.phone));

    json!([{
        "traitId": BASIC_INFO,
        "categoryName": "Basic Info",
        "traits": {
            "traitId": BASIC_INFO,
            "data": [data],
        },
    }])
}
