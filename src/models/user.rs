//! User model and auth payloads

use serde::{Deserialize, Serialize};

use super::wire;

/// The authenticated user as returned by `/api/auth/me` and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "wire::id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Response of the login and register endpoints: a bearer token plus the
/// user it belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_response_deserialize() {
        let json = r#"{
            "token": "abc.def.ghi",
            "user": { "id": 5, "name": "alice", "email": "alice@example.com" }
        }"#;
        let resp: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.token, "abc.def.ghi");
        assert_eq!(resp.user.id, "5");
        assert_eq!(resp.user.name, "alice");
    }

    #[test]
    fn test_user_email_defaults_empty() {
        let user: User = serde_json::from_str(r#"{"id": "1", "name": "bob"}"#).unwrap();
        assert!(user.email.is_empty());
    }
}
