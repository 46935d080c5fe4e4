use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::task::TaskId;

pub type CategoryId = i64;

pub const NO_CATEGORY: &str = "No category";

/// A category name as stored by the backend.
///
/// Some backend versions store the raw request body, so a category created
/// as `{"name": "Work"}` comes back with that whole JSON text as its name.
/// The name is decoded once when it is read and callers only see
/// [`CategoryName::display`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryName {
    Plain(String),
    Encoded { raw: String, name: String },
}

impl CategoryName {
    pub fn parse(raw: &str) -> Self {
        let decoded = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(serde_json::Value::Object(map)) => map
                .get("name")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from),
            Ok(serde_json::Value::String(s)) => Some(s),
            _ => None,
        };
        match decoded {
            Some(name) => CategoryName::Encoded {
                raw: raw.to_string(),
                name,
            },
            None => CategoryName::Plain(raw.to_string()),
        }
    }

    pub fn display(&self) -> &str {
        match self {
            CategoryName::Plain(raw) => raw,
            CategoryName::Encoded { name, .. } => name,
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            CategoryName::Plain(raw) => raw,
            CategoryName::Encoded { raw, .. } => raw,
        }
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display())
    }
}

impl Serialize for CategoryName {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.raw())
    }
}

impl<'de> Deserialize<'de> for CategoryName {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        Ok(CategoryName::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

/// Join between a task and a category, as sent to the link endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCategoryLink {
    pub task_id: TaskId,
    pub category_id: CategoryId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkedTask {
    pub id: TaskId,
}

/// Join record as returned by the link listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCategory {
    #[serde(default)]
    pub id: Option<i64>,
    pub task: LinkedTask,
    pub category: Category,
}

/// Category of every linked task, keyed by task id.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    by_task: HashMap<TaskId, Category>,
}

impl CategoryIndex {
    pub fn from_links(links: impl IntoIterator<Item = TaskCategory>) -> Self {
        let by_task = links
            .into_iter()
            .map(|link| (link.task.id, link.category))
            .collect();
        Self { by_task }
    }

    pub fn insert(&mut self, task_id: TaskId, category: Category) {
        self.by_task.insert(task_id, category);
    }

    pub fn category_for(&self, task_id: TaskId) -> Option<&Category> {
        self.by_task.get(&task_id)
    }

    /// Display name for a task's category, or "No category".
    pub fn name_for(&self, task_id: TaskId) -> &str {
        self.category_for(task_id)
            .map(|c| c.name.display())
            .unwrap_or(NO_CATEGORY)
    }

    pub fn len(&self) -> usize {
        self.by_task.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_task.is_empty()
    }
}
