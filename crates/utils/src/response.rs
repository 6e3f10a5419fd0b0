use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// JSend-style envelope shared by every JSON surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_envelope() {
        let response = ApiResponse::success(vec![1, 2, 3]);
        assert!(response.is_success());
        assert_eq!(response.message(), None);
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": true, "data": [1, 2, 3], "message": null})
        );
        assert_eq!(response.into_data(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::<()>::error("input file not found");
        assert!(!response.is_success());
        assert!(response.data().is_none());
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"success": false, "data": null, "message": "input file not found"})
        );
    }

    #[test]
    fn test_envelope_round_trips_from_json() {
        let response: ApiResponse<String> =
            serde_json::from_str(r#"{"success": true, "data": "ok", "message": null}"#).unwrap();
        assert_eq!(response, ApiResponse::success("ok".to_string()));
    }
}
