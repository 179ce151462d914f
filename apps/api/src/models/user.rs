use serde::Deserialize;

/// Answer of the upstream "me" endpoint. Either id may be missing for
/// accounts that were never provisioned in the talent service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub handle: Option<String>,
}
