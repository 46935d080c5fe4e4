use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use tasker_core::user::parse_age;
use tasker_core::{PasswordChange, ProfileUpdate, Role, TaskerError, User, UserDraft};

use super::form::{Form, FormEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Username,
    Email,
    Age,
    FirstName,
    LastName,
    Role,
    Password,
}

fn role_options() -> Vec<String> {
    Role::ALL.iter().map(|r| r.as_str().to_string()).collect()
}

fn age_text(age: Option<u32>) -> String {
    age.map(|a| a.to_string()).unwrap_or_default()
}

/// Admin form for creating or editing a user. Only creation asks for a
/// password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserForm {
    form: Form<UserField>,
}

impl UserForm {
    pub fn create() -> Self {
        let form = Form::new("New User")
            .text(UserField::Username, "Username", "")
            .text(UserField::Email, "Email", "")
            .text(UserField::Age, "Age", "")
            .text(UserField::FirstName, "First Name", "")
            .text(UserField::LastName, "Last Name", "")
            .choice(UserField::Role, "Role", role_options(), 0)
            .secret(UserField::Password, "Password");
        Self { form }
    }

    pub fn edit(user: &User) -> Self {
        let role = Role::ALL.iter().position(|r| *r == user.role).unwrap_or(0);
        let form = Form::new(format!("Edit User {}", user.username))
            .text(UserField::Username, "Username", user.username.clone())
            .text(UserField::Email, "Email", user.email.clone())
            .text(UserField::Age, "Age", age_text(user.age))
            .text(
                UserField::FirstName,
                "First Name",
                user.first_name.clone().unwrap_or_default(),
            )
            .text(
                UserField::LastName,
                "Last Name",
                user.last_name.clone().unwrap_or_default(),
            )
            .choice(UserField::Role, "Role", role_options(), role);
        Self { form }
    }

    pub fn is_create(&self) -> bool {
        self.form.has(UserField::Password)
    }

    pub fn to_draft(&self) -> Result<UserDraft, TaskerError> {
        let role_name = self
            .form
            .selected(UserField::Role)
            .and_then(|i| Role::ALL.get(i).copied())
            .unwrap_or_default();
        let password = self
            .is_create()
            .then(|| self.form.value(UserField::Password).to_string());
        Ok(UserDraft {
            username: self.form.value(UserField::Username).trim().to_string(),
            email: self.form.value(UserField::Email).trim().to_string(),
            age: parse_age(self.form.value(UserField::Age))?,
            first_name: self.form.value(UserField::FirstName).trim().to_string(),
            last_name: self.form.value(UserField::LastName).trim().to_string(),
            role_name,
            password,
        })
    }

    pub fn set_value(&mut self, field: UserField, value: &str) {
        self.form.set_value(field, value);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        self.form.handle_key(key)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area);
    }
}

/// Self-service profile form, in the order the settings page lists fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    form: Form<UserField>,
}

impl ProfileForm {
    pub fn new(user: &User) -> Self {
        let form = Form::new("Edit Profile")
            .text(UserField::Username, "Username", user.username.clone())
            .text(
                UserField::FirstName,
                "First Name",
                user.first_name.clone().unwrap_or_default(),
            )
            .text(
                UserField::LastName,
                "Last Name",
                user.last_name.clone().unwrap_or_default(),
            )
            .text(UserField::Email, "Email", user.email.clone())
            .text(UserField::Age, "Age", age_text(user.age));
        Self { form }
    }

    pub fn to_update(&self) -> Result<ProfileUpdate, TaskerError> {
        Ok(ProfileUpdate {
            username: self.form.value(UserField::Username).trim().to_string(),
            email: self.form.value(UserField::Email).trim().to_string(),
            age: parse_age(self.form.value(UserField::Age))?,
            first_name: self.form.value(UserField::FirstName).trim().to_string(),
            last_name: self.form.value(UserField::LastName).trim().to_string(),
        })
    }

    /// Inline message under the fields, e.g. a taken username.
    pub fn set_error(&mut self, error: Option<String>) {
        self.form.set_error(error);
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error()
    }

    pub fn set_value(&mut self, field: UserField, value: &str) {
        self.form.set_value(field, value);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        self.form.handle_key(key)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordField {
    Current,
    New,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordForm {
    form: Form<PasswordField>,
}

impl Default for PasswordForm {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordForm {
    pub fn new() -> Self {
        let form = Form::new("Change Password")
            .secret(PasswordField::Current, "Current Password")
            .secret(PasswordField::New, "New Password")
            .secret(PasswordField::Confirm, "Confirm Password");
        Self { form }
    }

    pub fn to_change(&self) -> PasswordChange {
        PasswordChange {
            current: self.form.value(PasswordField::Current).to_string(),
            new: self.form.value(PasswordField::New).to_string(),
            confirm: self.form.value(PasswordField::Confirm).to_string(),
        }
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.form.set_error(error);
    }

    pub fn error(&self) -> Option<&str> {
        self.form.error()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        self.form.handle_key(key)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area);
    }
}
