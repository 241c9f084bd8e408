//! User domain entity

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Argon2 PHC string; never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// A user that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_user(self, id: i32) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
        }
    }
}
