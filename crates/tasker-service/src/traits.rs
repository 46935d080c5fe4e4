use async_trait::async_trait;
use tasker_core::category::{Category, TaskCategory, TaskCategoryLink};
use tasker_core::task::{Task, TaskId, TaskPayload};
use tasker_core::user::{ProfileUpdate, User, UserDraft, UserId};
use thiserror::Error;

pub const USERNAME_TAKEN: &str = "Username already exists";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn message(&self) -> &str {
        match self {
            ServiceError::NotFound(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Conflict(m)
            | ServiceError::Internal(m) => m,
        }
    }

    /// The one failure the settings view reports inline instead of in the
    /// status bar.
    pub fn is_username_conflict(&self) -> bool {
        matches!(self, ServiceError::Conflict(_)) || self.message() == USERNAME_TAKEN
    }
}

/// Every backend call the client makes.
///
/// The TUI programs against this trait through `BlockingHttpService`;
/// `HttpService` is the reqwest implementation.
#[async_trait]
pub trait TaskerApi: Send + Sync {
    // -- Auth --
    async fn logout(&self) -> Result<(), ServiceError>;
    async fn is_admin(&self) -> Result<bool, ServiceError>;

    // -- Tasks --
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn get_task(&self, id: TaskId) -> Result<Task, ServiceError>;
    async fn create_task(&self, input: &TaskPayload) -> Result<Task, ServiceError>;
    async fn update_task(&self, id: TaskId, input: &TaskPayload) -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: TaskId) -> Result<(), ServiceError>;

    // -- Categories --
    async fn list_categories(&self) -> Result<Vec<Category>, ServiceError>;
    async fn create_category(&self, name: &str) -> Result<Category, ServiceError>;

    // -- Task/category links --
    async fn list_task_categories(&self) -> Result<Vec<TaskCategory>, ServiceError>;
    async fn link_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError>;
    async fn relink_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError>;
    /// `None` when the task has no category.
    async fn category_of_task(&self, task_id: TaskId) -> Result<Option<Category>, ServiceError>;
    async fn unlink_category(&self, task_id: TaskId) -> Result<(), ServiceError>;

    // -- Own profile --
    async fn get_profile(&self) -> Result<User, ServiceError>;
    async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ServiceError>;
    async fn change_password(&self, current: &str, new: &str) -> Result<(), ServiceError>;

    // -- Admin --
    async fn admin_list_users(&self) -> Result<Vec<User>, ServiceError>;
    async fn admin_create_user(&self, draft: &UserDraft) -> Result<User, ServiceError>;
    async fn admin_update_user(&self, id: UserId, draft: &UserDraft)
        -> Result<User, ServiceError>;
    async fn admin_delete_user(&self, id: UserId) -> Result<(), ServiceError>;
    async fn admin_list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
}
