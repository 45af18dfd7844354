//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;

// ============================================================================
// Login
// ============================================================================

/// Login form (`application/x-www-form-urlencoded`)
#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

// ============================================================================
// Register
// ============================================================================

/// Registration form
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

// Forms carry clear-text passwords
impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl std::fmt::Debug for RegisterForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("display_name", &self.display_name)
            .finish()
    }
}

// ============================================================================
// Current User
// ============================================================================

/// `GET /user` response
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: UserView,
}

/// Public fields of a principal
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<Principal> for UserResponse {
    fn from(principal: Principal) -> Self {
        Self {
            user: UserView {
                username: principal.username.into_inner(),
                display_name: principal.display_name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;

    #[test]
    fn test_user_response_shape() {
        let principal = Principal::new(UserName::new("paul").unwrap());
        let json = serde_json::to_value(UserResponse::from(principal)).unwrap();
        assert_eq!(json, serde_json::json!({ "user": { "username": "paul" } }));

        let principal = Principal::new(UserName::new("paul").unwrap()).with_display_name("Paul");
        let json = serde_json::to_value(UserResponse::from(principal)).unwrap();
        assert_eq!(json["user"]["displayName"], "Paul");
    }

    #[test]
    fn test_forms_redact_password() {
        let form = LoginForm {
            username: "paul".to_string(),
            password: "pw1".to_string(),
        };
        let debug = format!("{:?}", form);
        assert!(debug.contains("paul"));
        assert!(!debug.contains("pw1"));
    }
}
