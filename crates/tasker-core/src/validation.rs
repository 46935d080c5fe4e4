use std::fmt;

use crate::category::CategoryId;
use crate::error::TaskerError;
use crate::task::{parse_deadline, Priority, Status, Task, TaskPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Description,
    Deadline,
    Category,
    Status,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Description => "Description",
            Field::Deadline => "Deadline",
            Field::Category => "Category",
            Field::Status => "Status",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which draft fields must be filled before a task form may be submitted.
///
/// The create and edit forms have historically disagreed about whether a
/// description is mandatory, so the rule set is chosen per form instead of
/// being hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    required: Vec<Field>,
}

impl ValidationRules {
    pub fn new(required: impl IntoIterator<Item = Field>) -> Self {
        let mut fields: Vec<Field> = Vec::new();
        for f in required {
            if !fields.contains(&f) {
                fields.push(f);
            }
        }
        Self { required: fields }
    }

    pub fn creation() -> Self {
        Self::new([Field::Title, Field::Deadline])
    }

    pub fn edit() -> Self {
        Self::new([Field::Title, Field::Category, Field::Status])
    }

    pub fn edit_strict() -> Self {
        Self::new([Field::Title, Field::Category, Field::Status, Field::Description])
    }

    pub fn requires(&self, field: Field) -> bool {
        self.required.contains(&field)
    }

    pub fn required(&self) -> &[Field] {
        &self.required
    }
}

/// Form-side view of a task: free text where the user types, options where
/// the user may leave a choice empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub deadline: String,
    pub priority: Priority,
    pub status: Option<Status>,
    pub category: Option<CategoryId>,
}

impl TaskDraft {
    /// Blank creation form. New tasks always start as To-Do.
    pub fn for_creation(default_category: Option<CategoryId>) -> Self {
        Self {
            status: Some(Status::Todo),
            category: default_category,
            ..Default::default()
        }
    }

    pub fn from_task(task: &Task, category: Option<CategoryId>) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            deadline: task
                .deadline
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            priority: task.priority,
            status: Some(task.status),
            category,
        }
    }

    fn is_filled(&self, field: Field) -> bool {
        match field {
            Field::Title => !self.title.trim().is_empty(),
            Field::Description => !self.description.trim().is_empty(),
            Field::Deadline => !self.deadline.trim().is_empty(),
            Field::Category => self.category.is_some(),
            Field::Status => self.status.is_some(),
        }
    }

    pub fn missing(&self, rules: &ValidationRules) -> Vec<Field> {
        rules
            .required()
            .iter()
            .copied()
            .filter(|f| !self.is_filled(*f))
            .collect()
    }

    /// Check the draft against `rules` and build the request body.
    pub fn validate(&self, rules: &ValidationRules) -> Result<TaskPayload, TaskerError> {
        let missing = self.missing(rules);
        if !missing.is_empty() {
            return Err(TaskerError::MissingFields(missing));
        }

        let deadline_text = self.deadline.trim();
        let deadline = if deadline_text.is_empty() {
            None
        } else {
            Some(parse_deadline(deadline_text).ok_or_else(|| {
                TaskerError::InvalidInput(format!(
                    "deadline must be YYYY-MM-DD, got {deadline_text:?}"
                ))
            })?)
        };

        let description = self.description.trim();
        Ok(TaskPayload {
            title: self.title.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status: self.status.unwrap_or_default(),
            priority: self.priority,
            deadline,
        })
    }
}
