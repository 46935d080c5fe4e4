//! Multi-call operations. The backend has no transactions, so each step
//! runs in order and a later failure does not undo an earlier success.

use tasker_core::category::{CategoryId, TaskCategoryLink};
use tasker_core::task::{Task, TaskId, TaskPayload};
use tracing::{info, warn};

use crate::{ServiceError, TaskerApi};

#[derive(Debug)]
pub enum CreateOutcome {
    Created(Task),
    /// The task exists but the category link call failed.
    CreatedUnlinked { task: Task, error: ServiceError },
}

impl CreateOutcome {
    pub fn task(&self) -> &Task {
        match self {
            CreateOutcome::Created(task) | CreateOutcome::CreatedUnlinked { task, .. } => task,
        }
    }
}

pub async fn create_task_with_category<A: TaskerApi + ?Sized>(
    api: &A,
    payload: &TaskPayload,
    category: Option<CategoryId>,
) -> Result<CreateOutcome, ServiceError> {
    let task = api.create_task(payload).await?;
    info!(task_id = task.id, "created task");

    let Some(category_id) = category else {
        return Ok(CreateOutcome::Created(task));
    };
    let link = TaskCategoryLink {
        task_id: task.id,
        category_id,
    };
    match api.link_category(&link).await {
        Ok(()) => Ok(CreateOutcome::Created(task)),
        Err(error) => {
            warn!(task_id = task.id, category_id, %error, "task created without its category");
            Ok(CreateOutcome::CreatedUnlinked { task, error })
        }
    }
}

/// Remove the category link, then the task.
pub async fn delete_task_with_link<A: TaskerApi + ?Sized>(
    api: &A,
    task_id: TaskId,
) -> Result<(), ServiceError> {
    match api.unlink_category(task_id).await {
        Ok(()) | Err(ServiceError::NotFound(_)) => {}
        Err(e) => return Err(e),
    }
    api.delete_task(task_id).await?;
    info!(task_id, "deleted task");
    Ok(())
}

/// Update the task, then bring its category link in line with `new`.
pub async fn save_task_with_category<A: TaskerApi + ?Sized>(
    api: &A,
    task_id: TaskId,
    payload: &TaskPayload,
    previous: Option<CategoryId>,
    new: Option<CategoryId>,
) -> Result<Task, ServiceError> {
    let task = api.update_task(task_id, payload).await?;

    match (previous, new) {
        (None, Some(category_id)) => {
            api.link_category(&TaskCategoryLink {
                task_id,
                category_id,
            })
            .await?
        }
        (Some(old), Some(category_id)) if old != category_id => {
            api.relink_category(&TaskCategoryLink {
                task_id,
                category_id,
            })
            .await?
        }
        (Some(_), None) => api.unlink_category(task_id).await?,
        _ => {}
    }
    Ok(task)
}
