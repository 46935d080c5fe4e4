use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use tasker_core::sort::sorted;
use tasker_core::{CategoryIndex, SortKey, SortState, Task, TaskId};

use super::{class_style, priority_style};

/// Sortable task table. Keeps its rows in display order and re-sorts
/// whenever the tasks or the sort state change.
pub struct TaskTable {
    rows: Vec<Task>,
    sort: SortState,
    state: TableState,
    show_category: bool,
}

impl TaskTable {
    pub fn new(show_category: bool) -> Self {
        Self {
            rows: Vec::new(),
            sort: SortState::default(),
            state: TableState::default(),
            show_category,
        }
    }

    pub fn rows(&self) -> &[Task] {
        &self.rows
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    /// Replace the rows, keeping the selected task selected when it is
    /// still present.
    pub fn set_tasks(&mut self, tasks: &[Task]) {
        let selected = self.selected_task().map(|t| t.id);
        self.rows = sorted(tasks, self.sort);
        self.reselect(selected);
    }

    pub fn toggle_sort(&mut self, key: SortKey) {
        let selected = self.selected_task().map(|t| t.id);
        self.sort.toggle(key);
        self.rows = sorted(&self.rows, self.sort);
        self.reselect(selected);
    }

    fn reselect(&mut self, id: Option<TaskId>) {
        let idx = id
            .and_then(|id| self.rows.iter().position(|t| t.id == id))
            .or(if self.rows.is_empty() { None } else { Some(0) });
        self.state.select(idx);
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.rows.get(self.state.selected()?)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.rows.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let last = self.rows.len() - 1;
        let next = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (current + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(1),
            KeyCode::Char('g') | KeyCode::Home => 0,
            KeyCode::Char('G') | KeyCode::End => last,
            _ => return,
        };
        self.state.select(Some(next));
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        categories: &CategoryIndex,
        today: NaiveDate,
    ) {
        let mut header = vec![Cell::from(self.sort.header(SortKey::Title))];
        if self.show_category {
            header.push(Cell::from("Category"));
        }
        header.push(Cell::from("Status"));
        header.push(Cell::from(self.sort.header(SortKey::Priority)));
        header.push(Cell::from(self.sort.header(SortKey::Deadline)));
        let header = Row::new(header).style(Style::default().fg(Color::Yellow).bold());

        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|task| {
                let mut cells = vec![Cell::from(task.title.clone())];
                if self.show_category {
                    cells.push(Cell::from(categories.name_for(task.id).to_string()));
                }
                cells.push(Cell::from(task.status.display_name()));
                cells.push(Cell::from(Span::styled(
                    task.priority.display_name(),
                    priority_style(task.priority),
                )));
                cells.push(Cell::from(task.deadline_label()));
                Row::new(cells).style(class_style(task.classify(today)))
            })
            .collect();

        let widths: Vec<Constraint> = if self.show_category {
            vec![
                Constraint::Percentage(34),
                Constraint::Percentage(18),
                Constraint::Percentage(14),
                Constraint::Percentage(14),
                Constraint::Percentage(20),
            ]
        } else {
            vec![
                Constraint::Percentage(46),
                Constraint::Percentage(18),
                Constraint::Percentage(16),
                Constraint::Percentage(20),
            ]
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .title(format!(" {title} ({}) ", self.rows.len()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = self.state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasker_core::{Priority, SortDirection, Status};

    fn task(id: TaskId, title: &str, priority: Priority, day: Option<u32>) -> Task {
        Task {
            id,
            title: title.into(),
            description: None,
            status: Status::Todo,
            priority,
            deadline: day.and_then(|d| NaiveDate::from_ymd_opt(2024, 5, d)),
        }
    }

    fn table() -> TaskTable {
        let mut t = TaskTable::new(true);
        t.set_tasks(&[
            task(1, "beta", Priority::Low, Some(20)),
            task(2, "alpha", Priority::Critical, None),
            task(3, "gamma", Priority::High, Some(2)),
        ]);
        t
    }

    fn ids(t: &TaskTable) -> Vec<TaskId> {
        t.rows().iter().map(|t| t.id).collect()
    }

    #[test]
    fn unsorted_table_keeps_backend_order() {
        assert_eq!(ids(&table()), vec![1, 2, 3]);
    }

    #[test]
    fn toggling_a_key_twice_reverses() {
        let mut t = table();
        t.toggle_sort(SortKey::Title);
        assert_eq!(ids(&t), vec![2, 1, 3]);
        t.toggle_sort(SortKey::Title);
        assert_eq!(ids(&t), vec![3, 1, 2]);
        assert_eq!(t.sort().direction(), Some(SortDirection::Descending));
    }

    #[test]
    fn priority_starts_with_critical() {
        let mut t = table();
        t.toggle_sort(SortKey::Priority);
        assert_eq!(ids(&t), vec![2, 3, 1]);
    }

    #[test]
    fn undated_tasks_sort_last() {
        let mut t = table();
        t.toggle_sort(SortKey::Deadline);
        assert_eq!(ids(&t), vec![3, 1, 2]);
        t.toggle_sort(SortKey::Deadline);
        assert_eq!(ids(&t), vec![1, 3, 2]);
    }

    #[test]
    fn selection_follows_the_task_across_sorts() {
        let mut t = table();
        t.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(t.selected_task().unwrap().id, 2);
        t.toggle_sort(SortKey::Priority);
        assert_eq!(t.selected_task().unwrap().id, 2);
        t.handle_key(KeyEvent::from(KeyCode::Char('G')));
        assert_eq!(t.selected_task().unwrap().id, 1);
    }

    #[test]
    fn refresh_keeps_sort_and_drops_missing_selection() {
        let mut t = table();
        t.toggle_sort(SortKey::Title);
        t.handle_key(KeyEvent::from(KeyCode::Char('G')));
        assert_eq!(t.selected_task().unwrap().id, 3);

        t.set_tasks(&[task(1, "beta", Priority::Low, None), task(4, "aaa", Priority::Low, None)]);
        assert_eq!(ids(&t), vec![4, 1]);
        assert_eq!(t.selected_task().unwrap().id, 4);
    }
}
