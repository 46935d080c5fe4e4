use tasker_core::category::{Category, CategoryId, CategoryIndex, TaskCategory, TaskCategoryLink};
use tasker_core::task::{Task, TaskId, TaskPayload};
use tasker_core::user::{ProfileUpdate, User, UserDraft, UserId};
use tokio::runtime::Runtime;

use crate::workflow::{self, CreateOutcome};
use crate::{resolve, HttpService, ServiceError, TaskerApi};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::from_inner(HttpService::new(base_url))
    }

    pub fn with_token(base_url: &str, token: String) -> Result<Self, ServiceError> {
        Self::from_inner(HttpService::with_token(base_url, token))
    }

    fn from_inner(inner: HttpService) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self { inner, rt })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    // -- Trait method delegates --

    pub fn logout(&self) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.logout())
    }

    pub fn is_admin(&self) -> Result<bool, ServiceError> {
        self.rt.block_on(self.inner.is_admin())
    }

    pub fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.rt.block_on(self.inner.list_tasks())
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.get_task(id))
    }

    pub fn create_task(&self, input: &TaskPayload) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.create_task(input))
    }

    pub fn update_task(&self, id: TaskId, input: &TaskPayload) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.update_task(id, input))
    }

    pub fn delete_task(&self, id: TaskId) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.delete_task(id))
    }

    pub fn list_categories(&self) -> Result<Vec<Category>, ServiceError> {
        self.rt.block_on(self.inner.list_categories())
    }

    pub fn create_category(&self, name: &str) -> Result<Category, ServiceError> {
        self.rt.block_on(self.inner.create_category(name))
    }

    pub fn list_task_categories(&self) -> Result<Vec<TaskCategory>, ServiceError> {
        self.rt.block_on(self.inner.list_task_categories())
    }

    pub fn link_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.link_category(link))
    }

    pub fn relink_category(&self, link: &TaskCategoryLink) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.relink_category(link))
    }

    pub fn category_of_task(&self, task_id: TaskId) -> Result<Option<Category>, ServiceError> {
        self.rt.block_on(self.inner.category_of_task(task_id))
    }

    pub fn unlink_category(&self, task_id: TaskId) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.unlink_category(task_id))
    }

    pub fn get_profile(&self) -> Result<User, ServiceError> {
        self.rt.block_on(self.inner.get_profile())
    }

    pub fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ServiceError> {
        self.rt.block_on(self.inner.update_profile(update))
    }

    pub fn change_password(&self, current: &str, new: &str) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.change_password(current, new))
    }

    pub fn admin_list_users(&self) -> Result<Vec<User>, ServiceError> {
        self.rt.block_on(self.inner.admin_list_users())
    }

    pub fn admin_create_user(&self, draft: &UserDraft) -> Result<User, ServiceError> {
        self.rt.block_on(self.inner.admin_create_user(draft))
    }

    pub fn admin_update_user(&self, id: UserId, draft: &UserDraft) -> Result<User, ServiceError> {
        self.rt.block_on(self.inner.admin_update_user(id, draft))
    }

    pub fn admin_delete_user(&self, id: UserId) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.admin_delete_user(id))
    }

    pub fn admin_list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.rt.block_on(self.inner.admin_list_tasks())
    }

    // -- Workflows --

    pub fn create_task_with_category(
        &self,
        payload: &TaskPayload,
        category: Option<CategoryId>,
    ) -> Result<CreateOutcome, ServiceError> {
        self.rt.block_on(workflow::create_task_with_category(
            &self.inner,
            payload,
            category,
        ))
    }

    pub fn delete_task_with_link(&self, task_id: TaskId) -> Result<(), ServiceError> {
        self.rt
            .block_on(workflow::delete_task_with_link(&self.inner, task_id))
    }

    pub fn save_task_with_category(
        &self,
        task_id: TaskId,
        payload: &TaskPayload,
        previous: Option<CategoryId>,
        new: Option<CategoryId>,
    ) -> Result<Task, ServiceError> {
        self.rt.block_on(workflow::save_task_with_category(
            &self.inner,
            task_id,
            payload,
            previous,
            new,
        ))
    }

    pub fn load_category_index(&self, tasks: &[Task]) -> CategoryIndex {
        self.rt
            .block_on(resolve::load_category_index(&self.inner, tasks))
    }
}
