//! Mock sign-in: three fixed users and an unsigned JWT-shaped bearer token.
//!
//! Nothing in the gateway validates the token; the upstream owns that.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;

use crate::webhook::types::{Actor, UserRole};

const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: String,
    pub role: UserRole,
}

pub fn mock_user(role: UserRole) -> User {
    let (id, name, email, seed) = match role {
        UserRole::Teacher => ("teacher-01", "Dr. Evelyn Reed", "e.reed@school.edu", "teacher1"),
        UserRole::Parent => ("parent-01", "John Doe", "j.doe@family.com", "parent1"),
        UserRole::Admin => ("admin-01", "Admin User", "admin@school.edu", "admin1"),
    };
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar_url: format!("https://picsum.photos/seed/{seed}/100/100"),
        role,
    }
}

pub fn mock_token(user: &User) -> String {
    mock_token_at(user, Utc::now())
}

pub fn mock_token_at(user: &User, issued_at: DateTime<Utc>) -> String {
    let header = json!({ "alg": "HS256", "typ": "JWT" });
    let iat = issued_at.timestamp();
    let claims = json!({
        "sub": user.id,
        "name": user.name,
        "role": user.role,
        "iat": iat,
        "exp": iat + TOKEN_TTL_SECS,
    });
    format!(
        "{}.{}.mock-signature",
        STANDARD.encode(header.to_string()),
        STANDARD.encode(claims.to_string())
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

impl Session {
    pub fn new(user: User, token: impl Into<String>) -> Self {
        Self {
            user,
            token: token.into(),
        }
    }

    pub fn mock(role: UserRole) -> Self {
        let user = mock_user(role);
        let token = mock_token(&user);
        Self::new(user, token)
    }

    pub fn actor(&self) -> Actor {
        Actor {
            role: self.user.role,
            user_id: self.user.id.clone(),
        }
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Stable key for "who is calling": changes with the user or the token.
    pub fn identity(&self) -> String {
        format!("{}:{}:{}", self.user.id, self.user.role.as_str(), self.token)
    }
}
