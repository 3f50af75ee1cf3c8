use serde::{Deserialize, Serialize};

use crate::models::token::Claims;

/// The User struct represents an authenticated user in the system.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// Construct a new User with optional display name and roles.
    pub fn new(
        id: String,
        username: String,
        email: String,
        name: Option<String>,
        roles: Option<Vec<String>>,
    ) -> Self {
        User {
            id,
            // Fall back to the username when no display name is given.
            name: name.unwrap_or_else(|| username.clone()),
            username,
            email,
            roles: roles.unwrap_or_default(),
            avatar_url: None,
        }
    }

    /// Membership test on the user's role list.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Map decoded token claims onto the User shape.
impl From<&Claims> for User {
    fn from(claims: &Claims) -> Self {
        User::new(
            claims.sub.clone(),
            claims.username.clone(),
            claims.email.clone(),
            claims.name.clone(),
            Some(claims.roles.clone()),
        )
    }
}
