//! In-memory copies of what the views show. The backend stays the source of
//! truth: every mutation is followed by a full re-fetch, and a failed fetch
//! leaves the previous snapshot in place.

use tasker_core::{Category, CategoryId, CategoryIndex, LogisticsData, Task, TaskId, User};
use tasker_service::{BlockingHttpService, ServiceError};

/// The signed-in user's tasks, the category list and the task → category map.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
    index: CategoryIndex,
}

impl TaskStore {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn index(&self) -> &CategoryIndex {
        &self.index
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn category_id_of(&self, task_id: TaskId) -> Option<CategoryId> {
        self.index.category_for(task_id).map(|c| c.id)
    }

    pub fn refresh_tasks(&mut self, service: &BlockingHttpService) -> Result<(), ServiceError> {
        let tasks = service.list_tasks()?;
        let index = service.load_category_index(&tasks);
        self.set_tasks(tasks, index);
        Ok(())
    }

    pub fn refresh_categories(&mut self, service: &BlockingHttpService) -> Result<(), ServiceError> {
        self.categories = service.list_categories()?;
        Ok(())
    }

    pub fn set_tasks(&mut self, tasks: Vec<Task>, index: CategoryIndex) {
        self.tasks = tasks;
        self.index = index;
    }

    pub fn set_categories(&mut self, categories: Vec<Category>) {
        self.categories = categories;
    }
}

/// Admin lists plus the logistics projection derived from them.
#[derive(Debug, Default)]
pub struct AdminStore {
    users: Vec<User>,
    tasks: Vec<Task>,
    logistics: LogisticsData,
}

impl AdminStore {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn logistics(&self) -> &LogisticsData {
        &self.logistics
    }

    /// Re-fetch both lists. Whichever call succeeds replaces its list;
    /// logistics are recomputed either way.
    pub fn refresh(&mut self, service: &BlockingHttpService) -> Result<(), ServiceError> {
        let users = service.admin_list_users();
        let tasks = service.admin_list_tasks();
        let mut first_error = None;

        match users {
            Ok(users) => self.users = users,
            Err(e) => first_error = Some(e),
        }
        match tasks {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
        self.recompute();

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn set_lists(&mut self, users: Vec<User>, tasks: Vec<Task>) {
        self.users = users;
        self.tasks = tasks;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.logistics = LogisticsData::compute(&self.tasks, &self.users);
    }
}
