use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Request payload for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub identification: String,
    pub email: String,
    #[serde(alias = "isactive")]
    pub is_active: bool,
    #[serde(default)]
    pub group_id: Option<Uuid>,
}

/// Partial update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub identification: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "isactive")]
    pub is_active: Option<bool>,
    /// Absent leaves the group alone, `null` removes the user from it
    #[serde(default, deserialize_with = "present")]
    pub group_id: Option<Option<Uuid>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_id_absent_null_and_set_are_distinct() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{}"#).unwrap();
        let cleared: UpdateUserRequest = serde_json::from_str(r#"{"group_id": null}"#).unwrap();
        let id = Uuid::new_v4();
        let set: UpdateUserRequest =
            serde_json::from_str(&format!(r#"{{"group_id": "{}"}}"#, id)).unwrap();

        assert_eq!(absent.group_id, None);
        assert_eq!(cleared.group_id, Some(None));
        assert_eq!(set.group_id, Some(Some(id)));
    }
}
