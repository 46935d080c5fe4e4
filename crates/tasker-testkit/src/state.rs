use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{json, Value};
use tasker_core::category::{Category, CategoryId, CategoryName};
use tasker_core::task::{Task, TaskId, TaskPayload};
use tasker_core::user::{ProfileUpdate, Role, User, UserDraft, UserId};

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const WRONG_PASSWORD: &str = "Current password is incorrect";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

struct StoredUser {
    user: User,
    password: String,
}

#[derive(Default)]
struct Faults {
    link_listing: bool,
    linking: bool,
    category_lookup: bool,
}

/// In-memory data behind the stand-in REST API.
///
/// Category names are stored exactly as the request body arrived, so a
/// client posting `{"name": "Work"}` gets that JSON text back as the name.
/// Tasks cannot be deleted while a category link still points at them.
pub struct Backend {
    next_id: i64,
    tasks: BTreeMap<TaskId, Task>,
    categories: BTreeMap<CategoryId, String>,
    /// Join rows keyed by link id. Like the real join table, a task may
    /// hold several rows; lookups return the oldest.
    links: BTreeMap<i64, (TaskId, CategoryId)>,
    users: BTreeMap<UserId, StoredUser>,
    current_user: UserId,
    is_admin: bool,
    logged_out: bool,
    faults: Faults,
}

impl Default for Backend {
    fn default() -> Self {
        let mut backend = Self {
            next_id: 1,
            tasks: BTreeMap::new(),
            categories: BTreeMap::new(),
            links: BTreeMap::new(),
            users: BTreeMap::new(),
            current_user: 0,
            is_admin: false,
            logged_out: false,
            faults: Faults::default(),
        };
        let me = backend.insert_user(
            UserDraft {
                username: "jdoe".into(),
                email: "jdoe@example.com".into(),
                age: Some(29),
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                role_name: Role::User,
                password: None,
            },
            "secret".into(),
        );
        backend.current_user = me.user_id;
        backend
    }
}

impl Backend {
    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn insert_user(&mut self, draft: UserDraft, password: String) -> User {
        let user = User {
            user_id: self.next_id(),
            username: draft.username,
            email: draft.email,
            age: draft.age,
            first_name: Some(draft.first_name),
            last_name: Some(draft.last_name),
            role: draft.role_name,
        };
        self.users.insert(
            user.user_id,
            StoredUser {
                user: user.clone(),
                password,
            },
        );
        user
    }

    fn username_taken(&self, username: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| u.user.username == username && Some(u.user.user_id) != except)
    }

    // -- Auth --

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn logout(&mut self) {
        self.logged_out = true;
    }

    // -- Tasks --

    pub fn list_tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    pub fn get_task(&self, id: TaskId) -> Result<Task, BackendError> {
        self.tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| BackendError::NotFound(format!("task {id} not found")))
    }

    pub fn create_task(&mut self, input: TaskPayload) -> Task {
        let task = Task {
            id: self.next_id(),
            title: input.title,
            description: input.description,
            status: input.status,
            priority: input.priority,
            deadline: input.deadline,
        };
        self.tasks.insert(task.id, task.clone());
        task
    }

    pub fn update_task(&mut self, id: TaskId, input: TaskPayload) -> Result<Task, BackendError> {
        let task = self
            .tasks
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("task {id} not found")))?;
        task.title = input.title;
        task.description = input.description;
        task.status = input.status;
        task.priority = input.priority;
        task.deadline = input.deadline;
        Ok(task.clone())
    }

    pub fn delete_task(&mut self, id: TaskId) -> Result<(), BackendError> {
        if !self.tasks.contains_key(&id) {
            return Err(BackendError::NotFound(format!("task {id} not found")));
        }
        if self.has_link(id) {
            return Err(BackendError::Internal(format!(
                "task {id} is still referenced by a category link"
            )));
        }
        self.tasks.remove(&id);
        Ok(())
    }

    // -- Categories --

    fn category(&self, id: CategoryId) -> Option<Category> {
        self.categories.get(&id).map(|raw| Category {
            id,
            name: CategoryName::parse(raw),
        })
    }

    pub fn list_categories(&self) -> Vec<Category> {
        self.categories
            .keys()
            .filter_map(|id| self.category(*id))
            .collect()
    }

    pub fn create_category(&mut self, raw_body: String) -> Result<Category, BackendError> {
        if raw_body.trim().is_empty() {
            return Err(BackendError::BadRequest("category name is required".into()));
        }
        let id = self.next_id();
        self.categories.insert(id, raw_body);
        self.category(id)
            .ok_or_else(|| BackendError::Internal("category vanished".into()))
    }

    // -- Links --

    pub fn list_links(&self) -> Result<Vec<Value>, BackendError> {
        if self.faults.link_listing {
            return Err(BackendError::Internal("link listing unavailable".into()));
        }
        Ok(self
            .links
            .iter()
            .filter_map(|(link_id, (task_id, category_id))| {
                let task = self.tasks.get(task_id)?;
                let category = self.category(*category_id)?;
                Some(json!({ "id": link_id, "task": task, "category": category }))
            })
            .collect())
    }

    fn check_link(&self, task_id: TaskId, category_id: CategoryId) -> Result<(), BackendError> {
        if self.faults.linking {
            return Err(BackendError::Internal("linking unavailable".into()));
        }
        if !self.tasks.contains_key(&task_id) {
            return Err(BackendError::Internal(format!("task {task_id} not found")));
        }
        if !self.categories.contains_key(&category_id) {
            return Err(BackendError::Internal(format!(
                "category {category_id} not found"
            )));
        }
        Ok(())
    }

    pub fn link(&mut self, task_id: TaskId, category_id: CategoryId) -> Result<(), BackendError> {
        self.check_link(task_id, category_id)?;
        let link_id = self.next_id();
        self.links.insert(link_id, (task_id, category_id));
        Ok(())
    }

    fn has_link(&self, task_id: TaskId) -> bool {
        self.links.values().any(|(t, _)| *t == task_id)
    }

    /// Rows currently joining `task_id` to a category.
    pub fn links_for(&self, task_id: TaskId) -> usize {
        self.links.values().filter(|(t, _)| *t == task_id).count()
    }

    pub fn relink(&mut self, task_id: TaskId, category_id: CategoryId) -> Result<(), BackendError> {
        self.check_link(task_id, category_id)?;
        if !self.has_link(task_id) {
            return Err(BackendError::Internal(format!(
                "task {task_id} has no category link"
            )));
        }
        for (t, category) in self.links.values_mut() {
            if *t == task_id {
                *category = category_id;
            }
        }
        Ok(())
    }

    /// Per-task lookup as the route serves it, honouring the fault switch.
    pub fn lookup_category(&self, task_id: TaskId) -> Result<Option<Category>, BackendError> {
        if self.faults.category_lookup {
            return Err(BackendError::Internal("category lookup unavailable".into()));
        }
        Ok(self.category_of_task(task_id))
    }

    pub fn category_of_task(&self, task_id: TaskId) -> Option<Category> {
        self.links
            .values()
            .find(|(t, _)| *t == task_id)
            .and_then(|(_, category_id)| self.category(*category_id))
    }

    pub fn unlink(&mut self, task_id: TaskId) {
        self.links.retain(|_, (t, _)| *t != task_id);
    }

    // -- Users --

    pub fn profile(&self) -> Result<User, BackendError> {
        self.users
            .get(&self.current_user)
            .map(|u| u.user.clone())
            .ok_or_else(|| BackendError::NotFound("current user not found".into()))
    }

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<User, BackendError> {
        if self.username_taken(&update.username, Some(self.current_user)) {
            return Err(BackendError::Conflict(USERNAME_TAKEN.into()));
        }
        let stored = self
            .users
            .get_mut(&self.current_user)
            .ok_or_else(|| BackendError::NotFound("current user not found".into()))?;
        stored.user.username = update.username;
        stored.user.email = update.email;
        stored.user.age = update.age;
        stored.user.first_name = Some(update.first_name);
        stored.user.last_name = Some(update.last_name);
        Ok(stored.user.clone())
    }

    pub fn change_password(&mut self, current: &str, new: &str) -> Result<(), BackendError> {
        let stored = self
            .users
            .get_mut(&self.current_user)
            .ok_or_else(|| BackendError::NotFound("current user not found".into()))?;
        if stored.password != current {
            return Err(BackendError::BadRequest(WRONG_PASSWORD.into()));
        }
        stored.password = new.to_string();
        Ok(())
    }

    pub fn list_users(&self) -> Vec<User> {
        self.users.values().map(|u| u.user.clone()).collect()
    }

    pub fn create_user(&mut self, draft: UserDraft) -> Result<User, BackendError> {
        if draft.username.trim().is_empty() {
            return Err(BackendError::BadRequest("username is required".into()));
        }
        if self.username_taken(&draft.username, None) {
            return Err(BackendError::Conflict(USERNAME_TAKEN.into()));
        }
        let password = draft.password.clone().unwrap_or_default();
        Ok(self.insert_user(draft, password))
    }

    pub fn update_user(&mut self, id: UserId, draft: UserDraft) -> Result<User, BackendError> {
        if self.username_taken(&draft.username, Some(id)) {
            return Err(BackendError::Conflict(USERNAME_TAKEN.into()));
        }
        let stored = self
            .users
            .get_mut(&id)
            .ok_or_else(|| BackendError::NotFound(format!("user {id} not found")))?;
        stored.user.username = draft.username;
        stored.user.email = draft.email;
        stored.user.age = draft.age;
        stored.user.first_name = Some(draft.first_name);
        stored.user.last_name = Some(draft.last_name);
        stored.user.role = draft.role_name;
        Ok(stored.user.clone())
    }

    pub fn delete_user(&mut self, id: UserId) -> Result<(), BackendError> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| BackendError::NotFound(format!("user {id} not found")))
    }
}

/// Shared handle to the backend, cloned into every handler and kept by
/// tests for seeding and inspection.
#[derive(Clone, Default)]
pub struct AppState {
    inner: Arc<Mutex<Backend>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Backend> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Grant or revoke admin rights for the signed-in user.
    pub fn set_admin(&self, admin: bool) {
        let mut backend = self.lock();
        backend.is_admin = admin;
        let me = backend.current_user;
        if let Some(stored) = backend.users.get_mut(&me) {
            stored.user.role = if admin { Role::Admin } else { Role::User };
        }
    }

    pub fn fail_link_listing(&self, fail: bool) {
        self.lock().faults.link_listing = fail;
    }

    pub fn fail_linking(&self, fail: bool) {
        self.lock().faults.linking = fail;
    }

    pub fn fail_category_lookup(&self, fail: bool) {
        self.lock().faults.category_lookup = fail;
    }

    pub fn logged_out(&self) -> bool {
        self.lock().logged_out
    }

    pub fn task_count(&self) -> usize {
        self.lock().tasks.len()
    }

    pub fn link_count(&self) -> usize {
        self.lock().links.len()
    }

    pub fn password(&self) -> String {
        let backend = self.lock();
        backend
            .users
            .get(&backend.current_user)
            .map(|u| u.password.clone())
            .unwrap_or_default()
    }

    pub fn seed_task(&self, input: TaskPayload) -> Task {
        self.lock().create_task(input)
    }

    /// Store a category whose name is exactly `raw`.
    pub fn seed_category(&self, raw: &str) -> Category {
        let mut backend = self.lock();
        let id = backend.next_id();
        backend.categories.insert(id, raw.to_string());
        Category {
            id,
            name: CategoryName::parse(raw),
        }
    }

    pub fn seed_link(&self, task_id: TaskId, category_id: CategoryId) {
        let mut backend = self.lock();
        let link_id = backend.next_id();
        backend.links.insert(link_id, (task_id, category_id));
    }

    pub fn seed_user(&self, username: &str, age: Option<u32>, role: Role) -> User {
        self.lock().insert_user(
            UserDraft {
                username: username.into(),
                email: format!("{username}@example.com"),
                age,
                first_name: username.into(),
                last_name: "Tester".into(),
                role_name: role,
                password: None,
            },
            "password".into(),
        )
    }
}

/// A user as the backend serialises it, with the role as an object.
pub fn user_json(user: &User) -> Value {
    let role_id = match user.role {
        Role::User => 1,
        Role::Admin => 2,
    };
    json!({
        "userId": user.user_id,
        "username": user.username,
        "email": user.email,
        "age": user.age,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "role": { "id": role_id, "name": user.role.as_str() },
    })
}
