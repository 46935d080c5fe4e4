use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::TaskerError;

pub type UserId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub const ALL: &[Role] = &[Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().trim_start_matches("ROLE_") {
            "USER" => Some(Role::User),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "role_from_object_or_name")]
    pub role: Role,
}

impl User {
    pub fn full_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or_default();
        let last = self.last_name.as_deref().unwrap_or_default();
        format!("{first} {last}").trim().to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            username: self.username.clone(),
            email: self.email.clone(),
            age: self.age,
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
            role_name: self.role,
            password: None,
        }
    }

    pub fn to_profile_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            username: self.username.clone(),
            email: self.email.clone(),
            age: self.age,
            first_name: self.first_name.clone().unwrap_or_default(),
            last_name: self.last_name.clone().unwrap_or_default(),
        }
    }
}

/// The role arrives either as `{"id": 1, "name": "ADMIN"}` or as a bare name.
fn role_from_object_or_name<'de, D: Deserializer<'de>>(d: D) -> Result<Role, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RoleRepr {
        Named { name: String },
        Bare(String),
    }

    let repr = Option::<RoleRepr>::deserialize(d)?;
    let name = match repr {
        Some(RoleRepr::Named { name }) | Some(RoleRepr::Bare(name)) => name,
        None => return Ok(Role::default()),
    };
    Ok(Role::parse_str(&name).unwrap_or_default())
}

/// The backend stores age as an unchecked integer. Negative, oversized or
/// non-numeric values read as no age instead of failing the whole user.
fn lenient_age<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    let age = match value {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(age.and_then(|a| u32::try_from(a).ok()))
}

/// Admin create/update body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    pub role_name: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Self-service profile update body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub age: Option<u32>,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChange {
    pub fn matches(&self) -> bool {
        self.new == self.confirm
    }

    /// Checked before any call is made.
    pub fn validate(&self) -> Result<(), TaskerError> {
        if self.matches() {
            Ok(())
        } else {
            Err(TaskerError::PasswordMismatch)
        }
    }
}

/// Parse an age field typed by the user. Blank means unknown.
pub fn parse_age(input: &str) -> Result<Option<u32>, TaskerError> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    input
        .parse::<u32>()
        .map(Some)
        .map_err(|_| TaskerError::InvalidInput(format!("age must be a number, got {input:?}")))
}
