use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::database::models::User;
use crate::error::ApiError;

use super::{check_email, finish_validation, require};

#[derive(Debug, Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl UserCreate {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = HashMap::new();
        require("username", &self.username, &mut errors);
        require("password", &self.password, &mut errors);
        check_email("email", &self.email, &mut errors);
        finish_validation("Invalid registration payload", errors)
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Form-encoded credentials for the token endpoint.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
}

impl Token {
    pub fn bearer(access_token: String) -> Self {
        Self { access_token, token_type: "bearer".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_rejects_malformed_email() {
        let input = UserCreate {
            username: "demo".into(),
            email: "demo-at-example".into(),
            password: "demo123".into(),
            full_name: None,
        };
        let err = input.validate().unwrap_err();
        assert_eq!(err.status_code(), 422);
        assert!(err.to_json()["field_errors"]["email"].is_string());
    }
}
