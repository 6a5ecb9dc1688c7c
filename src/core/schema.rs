use crate::utils::error::{ApiTestError, Result};
use serde::de::DeserializeOwned;

/// Checks `payload` against the structure of `T` and returns the typed value.
///
/// Extra fields are accepted; a missing field or a field of the wrong type
/// fails with [`ApiTestError::SchemaValidationError`] naming `model`.
pub fn validate_schema<T: DeserializeOwned>(model: &str, payload: &serde_json::Value) -> Result<T> {
    match T::deserialize(payload) {
        Ok(value) => {
            tracing::debug!("Schema validation passed for {}", model);
            Ok(value)
        }
        Err(e) => {
            tracing::warn!("Schema validation failed for {}: {}", model, e);
            Err(ApiTestError::SchemaValidationError {
                model: model.to_string(),
                message: e.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{SingleUserResponse, User};

    fn george() -> serde_json::Value {
        serde_json::json!({
            "id": 1,
            "email": "george.bluth@reqres.in",
            "first_name": "George",
            "last_name": "Bluth",
            "avatar": "https://reqres.in/img/faces/1-image.jpg"
        })
    }

    #[test]
    fn test_valid_payload_passes() {
        let user: User = validate_schema("User", &george()).unwrap();
        assert_eq!(user.last_name, "Bluth");
    }

    #[test]
    fn test_missing_field_fails() {
        let mut payload = george();
        payload.as_object_mut().unwrap().remove("avatar");

        let err = validate_schema::<User>("User", &payload).unwrap_err();
        match err {
            ApiTestError::SchemaValidationError { model, message } => {
                assert_eq!(model, "User");
                assert!(message.contains("avatar"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_wrong_type_fails() {
        let mut payload = george();
        payload["id"] = serde_json::json!("one");
        assert!(validate_schema::<User>("User", &payload).is_err());
    }

    #[test]
    fn test_nested_model_fails_without_support_block() {
        let payload = serde_json::json!({ "data": george() });
        let err = validate_schema::<SingleUserResponse>("SingleUserResponse", &payload).unwrap_err();
        assert!(err.to_string().contains("support"));
    }
}
