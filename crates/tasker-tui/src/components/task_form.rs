use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use tasker_core::category::NO_CATEGORY;
use tasker_core::{Category, CategoryId, Priority, Status, Task, TaskDraft};

use super::form::{Form, FormEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskField {
    Title,
    Description,
    Deadline,
    Priority,
    Status,
    Category,
}

/// Task create/edit form. The category selector lists "No category"
/// followed by every known category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    form: Form<TaskField>,
    category_ids: Vec<Option<CategoryId>>,
}

fn priority_options() -> Vec<String> {
    Priority::ALL.iter().map(|p| p.display_name().to_string()).collect()
}

fn status_options() -> Vec<String> {
    Status::ALL.iter().map(|s| s.display_name().to_string()).collect()
}

fn category_choices(categories: &[Category]) -> (Vec<String>, Vec<Option<CategoryId>>) {
    let mut names = vec![NO_CATEGORY.to_string()];
    let mut ids = vec![None];
    for c in categories {
        names.push(c.name.display().to_string());
        ids.push(Some(c.id));
    }
    (names, ids)
}

fn index_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|i| i == item).unwrap_or(0)
}

impl TaskForm {
    /// Blank creation form with the first category preselected.
    pub fn creation(categories: &[Category]) -> Self {
        let draft = TaskDraft::for_creation(categories.first().map(|c| c.id));
        let (names, ids) = category_choices(categories);
        let selected = index_of(&ids, &draft.category);
        let form = Form::new("New Task")
            .text(TaskField::Title, "Title", draft.title)
            .text(TaskField::Description, "Description", draft.description)
            .text(TaskField::Deadline, "Deadline (YYYY-MM-DD)", draft.deadline)
            .choice(
                TaskField::Priority,
                "Priority",
                priority_options(),
                index_of(Priority::ALL, &draft.priority),
            )
            .choice(TaskField::Category, "Category", names, selected);
        Self {
            form,
            category_ids: ids,
        }
    }

    /// Edit form prefilled from `task` and its current category.
    pub fn edit(task: &Task, categories: &[Category], current: Option<CategoryId>) -> Self {
        let draft = TaskDraft::from_task(task, current);
        let (names, ids) = category_choices(categories);
        let selected = index_of(&ids, &draft.category);
        let form = Self::base("Edit Task", &draft)
            .choice(TaskField::Category, "Category", names, selected);
        Self {
            form,
            category_ids: ids,
        }
    }

    /// Admin edit: no category selector.
    pub fn admin_edit(task: &Task) -> Self {
        let draft = TaskDraft::from_task(task, None);
        Self {
            form: Self::base("Edit Task (admin)", &draft),
            category_ids: Vec::new(),
        }
    }

    fn base(title: &str, draft: &TaskDraft) -> Form<TaskField> {
        Form::new(title)
            .text(TaskField::Title, "Title", draft.title.clone())
            .text(TaskField::Description, "Description", draft.description.clone())
            .text(TaskField::Deadline, "Deadline (YYYY-MM-DD)", draft.deadline.clone())
            .choice(
                TaskField::Priority,
                "Priority",
                priority_options(),
                index_of(Priority::ALL, &draft.priority),
            )
            .choice(
                TaskField::Status,
                "Status",
                status_options(),
                index_of(Status::ALL, &draft.status.unwrap_or_default()),
            )
    }

    /// Swap in a fresh category list, selecting `select` when present.
    pub fn set_categories(&mut self, categories: &[Category], select: Option<CategoryId>) {
        let (names, ids) = category_choices(categories);
        let selected = index_of(&ids, &select);
        self.form.set_options(TaskField::Category, names, selected);
        self.category_ids = ids;
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.form
            .selected(TaskField::Category)
            .and_then(|i| self.category_ids.get(i).copied().flatten())
    }

    /// Current contents as a draft, ready for validation.
    pub fn draft(&self) -> TaskDraft {
        let priority = self
            .form
            .selected(TaskField::Priority)
            .and_then(|i| Priority::ALL.get(i).copied())
            .unwrap_or_default();
        let status = match self.form.selected(TaskField::Status) {
            Some(i) => Status::ALL.get(i).copied(),
            None => Some(Status::Todo),
        };
        TaskDraft {
            title: self.form.value(TaskField::Title).to_string(),
            description: self.form.value(TaskField::Description).to_string(),
            deadline: self.form.value(TaskField::Deadline).to_string(),
            priority,
            status,
            category: self.category(),
        }
    }

    pub fn set_value(&mut self, field: TaskField, value: &str) {
        self.form.set_value(field, value);
    }

    pub fn focus(&mut self, field: TaskField) {
        self.form.focus(field);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        self.form.handle_key(key)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        self.form.render(frame, area);
    }
}
