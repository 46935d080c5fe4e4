use crate::user::User;

/// What the client knows about the signed-in user. Passed explicitly to
/// whatever needs the admin gate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub is_admin: bool,
    pub profile: Option<User>,
}

impl Session {
    pub fn new(is_admin: bool, profile: Option<User>) -> Self {
        Self { is_admin, profile }
    }

    /// "Welcome, First Last", falling back to the username.
    pub fn greeting(&self) -> String {
        match &self.profile {
            Some(user) => {
                let name = user.full_name();
                if name.is_empty() {
                    format!("Welcome, {}", user.username)
                } else {
                    format!("Welcome, {name}")
                }
            }
            None => "Welcome".to_string(),
        }
    }
}
