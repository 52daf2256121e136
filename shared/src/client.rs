//! Client-related types shared between the gateways and the engine
//!
//! Request/response DTOs for the remote auth and catalog endpoints.
//! The remote API speaks camelCase; renames are applied per field.

use serde::{Deserialize, Serialize};

use crate::models::Product;

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    /// Requested token lifetime in minutes.
    pub expires_in_mins: u32,
}

/// Successful login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    /// Avatar URL.
    pub image: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Error body returned by the auth endpoints on non-2xx status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Identity-check response from `GET /auth/me`.
///
/// Only `id` is contractually relevant; everything else the endpoint
/// returns is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: i64,
}

// =============================================================================
// Catalog API DTOs
// =============================================================================

/// One page of products, shared by the listing and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Total remote-matching count for the current filter.
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_wire_shape() {
        let req = LoginRequest {
            username: "emilys".into(),
            password: "emilyspass".into(),
            expires_in_mins: 60,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["username"], "emilys");
        assert_eq!(json["expiresInMins"], 60);
    }

    #[test]
    fn test_login_response_camel_case() {
        let json = r#"{
            "id": 1,
            "username": "emilys",
            "email": "emily@x.com",
            "firstName": "Emily",
            "lastName": "Johnson",
            "gender": "female",
            "image": "https://example.com/a.png",
            "accessToken": "tok-a",
            "refreshToken": "tok-r"
        }"#;
        let res: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(res.first_name, "Emily");
        assert_eq!(res.access_token, "tok-a");
    }

    #[test]
    fn test_auth_error_body_optional_message() {
        let empty: AuthErrorBody = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.message, None);

        let with: AuthErrorBody =
            serde_json::from_str(r#"{"message": "Invalid credentials"}"#).unwrap();
        assert_eq!(with.message.as_deref(), Some("Invalid credentials"));
    }

    #[test]
    fn test_product_page_deserialize() {
        let json = r#"{
            "products": [{"id": 1, "title": "Soap", "price": 2.5}],
            "total": 194,
            "skip": 0,
            "limit": 5
        }"#;
        let page: ProductPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.products.len(), 1);
        assert_eq!(page.total, 194);
    }
}
