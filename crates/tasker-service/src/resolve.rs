use tasker_core::category::CategoryIndex;
use tasker_core::task::Task;
use tracing::{debug, warn};

use crate::TaskerApi;

/// Resolve the category of every task in `tasks`.
///
/// One listing of all links is tried first. If that endpoint fails, each
/// task is looked up on its own; tasks whose lookup fails are left out of the
/// index and display as uncategorised.
pub async fn load_category_index<A: TaskerApi + ?Sized>(api: &A, tasks: &[Task]) -> CategoryIndex {
    match api.list_task_categories().await {
        Ok(links) => {
            debug!(links = links.len(), "loaded task categories in one call");
            return CategoryIndex::from_links(links);
        }
        Err(e) => warn!(error = %e, "batched category lookup failed, falling back to per-task"),
    }

    let mut index = CategoryIndex::default();
    for task in tasks {
        match api.category_of_task(task.id).await {
            Ok(Some(category)) => index.insert(task.id, category),
            Ok(None) => {}
            Err(e) => warn!(task_id = task.id, error = %e, "category lookup failed"),
        }
    }
    index
}
