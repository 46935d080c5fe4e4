use std::cmp::Ordering;

use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Priority,
    Deadline,
}

impl SortKey {
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Title => "Name",
            SortKey::Priority => "Priority",
            SortKey::Deadline => "Due",
        }
    }

    /// Direction a key starts in when it is first selected.
    pub fn default_direction(&self) -> SortDirection {
        match self {
            SortKey::Title | SortKey::Deadline => SortDirection::Ascending,
            SortKey::Priority => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub active: Option<(SortKey, SortDirection)>,
}

impl SortState {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            active: Some((key, direction)),
        }
    }

    /// Selecting the active key flips its direction; any other key starts
    /// at its default direction.
    pub fn toggle(&mut self, key: SortKey) {
        self.active = Some(match self.active {
            Some((current, dir)) if current == key => (key, dir.flipped()),
            _ => (key, key.default_direction()),
        });
    }

    pub fn key(&self) -> Option<SortKey> {
        self.active.map(|(k, _)| k)
    }

    pub fn direction(&self) -> Option<SortDirection> {
        self.active.map(|(_, d)| d)
    }

    /// Header label with an arrow when this key is active.
    pub fn header(&self, key: SortKey) -> String {
        match self.active {
            Some((k, d)) if k == key => format!("{} {}", key.label(), d.arrow()),
            _ => key.label().to_string(),
        }
    }
}

fn compare(a: &Task, b: &Task, key: SortKey, dir: SortDirection) -> Ordering {
    let directed = |ord: Ordering| match dir {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    };
    match key {
        SortKey::Title => directed(a.title.cmp(&b.title)),
        SortKey::Priority => directed(a.priority.rank().cmp(&b.priority.rank())),
        // missing deadlines stay at the bottom in both directions
        SortKey::Deadline => match (a.deadline, b.deadline) {
            (Some(x), Some(y)) => directed(x.cmp(&y)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

/// Stable sort of `tasks` by the active key. No active key leaves the
/// backend order untouched.
pub fn sort_tasks(tasks: &mut [Task], state: SortState) {
    if let Some((key, dir)) = state.active {
        tasks.sort_by(|a, b| compare(a, b, key, dir));
    }
}

pub fn sorted(tasks: &[Task], state: SortState) -> Vec<Task> {
    let mut out = tasks.to_vec();
    sort_tasks(&mut out, state);
    out
}

/// Tasks with a deadline, latest first, at most `n` of them.
pub fn upcoming(tasks: &[Task], n: usize) -> Vec<Task> {
    let mut dated: Vec<Task> = tasks.iter().filter(|t| t.deadline.is_some()).cloned().collect();
    dated.sort_by(|a, b| b.deadline.cmp(&a.deadline));
    dated.truncate(n);
    dated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};
    use chrono::NaiveDate;

    fn task(id: i64, title: &str, priority: Priority, deadline: Option<(i32, u32, u32)>) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            status: Status::Todo,
            priority,
            deadline: deadline.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        }
    }

    fn fixture() -> Vec<Task> {
        vec![
            task(1, "Bake", Priority::Medium, Some((2024, 5, 3))),
            task(2, "Clean", Priority::Critical, None),
            task(3, "Argue", Priority::Low, Some((2024, 1, 9))),
            task(4, "Drive", Priority::High, Some((2024, 9, 1))),
        ]
    }

    fn ids(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn toggle_same_key_flips_and_new_key_resets() {
        let mut state = SortState::default();
        state.toggle(SortKey::Title);
        assert_eq!(state.direction(), Some(SortDirection::Ascending));
        state.toggle(SortKey::Title);
        assert_eq!(state.direction(), Some(SortDirection::Descending));
        state.toggle(SortKey::Priority);
        assert_eq!(state.active, Some((SortKey::Priority, SortDirection::Descending)));
    }

    #[test]
    fn title_toggled_twice_restores_first_order() {
        let tasks = fixture();
        let mut state = SortState::default();
        state.toggle(SortKey::Title);
        let first = sorted(&tasks, state);
        assert_eq!(ids(&first), vec![3, 1, 2, 4]);

        state.toggle(SortKey::Title);
        assert_eq!(ids(&sorted(&first, state)), vec![4, 2, 1, 3]);

        state.toggle(SortKey::Title);
        assert_eq!(ids(&sorted(&first, state)), ids(&first));
    }

    #[test]
    fn priority_sorts_critical_first() {
        let mut state = SortState::default();
        state.toggle(SortKey::Priority);
        let out = sorted(&fixture(), state);
        let prios: Vec<Priority> = out.iter().map(|t| t.priority).collect();
        assert_eq!(
            prios,
            vec![Priority::Critical, Priority::High, Priority::Medium, Priority::Low]
        );
    }

    #[test]
    fn missing_deadline_sorts_last_both_ways() {
        let mut state = SortState::new(SortKey::Deadline, SortDirection::Ascending);
        assert_eq!(ids(&sorted(&fixture(), state)), vec![3, 1, 4, 2]);
        state.toggle(SortKey::Deadline);
        assert_eq!(ids(&sorted(&fixture(), state)), vec![4, 1, 3, 2]);
    }

    #[test]
    fn no_active_key_keeps_order() {
        assert_eq!(ids(&sorted(&fixture(), SortState::default())), vec![1, 2, 3, 4]);
    }

    #[test]
    fn upcoming_takes_latest_dated_tasks() {
        assert_eq!(ids(&upcoming(&fixture(), 2)), vec![4, 1]);
        assert_eq!(upcoming(&[], 3).len(), 0);
    }

    #[test]
    fn header_marks_active_key() {
        let state = SortState::new(SortKey::Deadline, SortDirection::Descending);
        assert_eq!(state.header(SortKey::Deadline), "Due ▼");
        assert_eq!(state.header(SortKey::Title), "Name");
    }
}
