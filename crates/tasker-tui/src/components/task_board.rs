use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use tasker_core::{DeadlineClass, Status, Task, TaskId};

use super::{class_style, priority_style};

/// Two-column board: To-Do on the left, Completed on the right.
pub struct TaskBoard {
    columns: Vec<BoardColumn>,
    active_column: usize,
}

struct BoardColumn {
    status: Status,
    tasks: Vec<Task>,
    list_state: ListState,
}

impl TaskBoard {
    pub fn new(tasks: &[Task]) -> Self {
        let columns = Status::ALL
            .iter()
            .map(|&status| {
                let tasks: Vec<Task> = tasks.iter().filter(|t| t.status == status).cloned().collect();
                let mut list_state = ListState::default();
                if !tasks.is_empty() {
                    list_state.select(Some(0));
                }
                BoardColumn {
                    status,
                    tasks,
                    list_state,
                }
            })
            .collect();
        Self {
            columns,
            active_column: 0,
        }
    }

    /// Returns the currently highlighted task, if any.
    pub fn selected_task(&self) -> Option<&Task> {
        let col = self.columns.get(self.active_column)?;
        let idx = col.list_state.selected()?;
        col.tasks.get(idx)
    }

    /// Select the task with the given id, moving to its column.
    /// Returns `false` and leaves the cursor alone if no column holds it.
    pub fn select_task_by_id(&mut self, task_id: TaskId) -> bool {
        for (col_idx, col) in self.columns.iter_mut().enumerate() {
            if let Some(task_idx) = col.tasks.iter().position(|t| t.id == task_id) {
                self.active_column = col_idx;
                col.list_state.select(Some(task_idx));
                return true;
            }
        }
        false
    }

    pub fn active_status(&self) -> Status {
        self.columns
            .get(self.active_column)
            .map(|c| c.status)
            .unwrap_or_default()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => {
                if self.active_column > 0 {
                    self.active_column -= 1;
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if self.active_column + 1 < self.columns.len() {
                    self.active_column += 1;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current + 1 < col.tasks.len() {
                        col.list_state.select(Some(current + 1));
                    }
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    let current = col.list_state.selected().unwrap_or(0);
                    if current > 0 {
                        col.list_state.select(Some(current - 1));
                    }
                }
            }
            KeyCode::Char('g') => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    if !col.tasks.is_empty() {
                        col.list_state.select(Some(0));
                    }
                }
            }
            KeyCode::Char('G') => {
                if let Some(col) = self.columns.get_mut(self.active_column) {
                    if !col.tasks.is_empty() {
                        col.list_state.select(Some(col.tasks.len() - 1));
                    }
                }
            }
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, today: NaiveDate) {
        let col_count = self.columns.len() as u32;
        if col_count == 0 {
            return;
        }

        let constraints: Vec<Constraint> = (0..col_count)
            .map(|_| Constraint::Ratio(1, col_count))
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, (col, chunk)) in self.columns.iter().zip(chunks.iter()).enumerate() {
            let is_active = i == self.active_column;
            self.render_column(frame, col, *chunk, is_active, today);
        }
    }

    fn render_column(
        &self,
        frame: &mut Frame,
        col: &BoardColumn,
        area: Rect,
        is_active: bool,
        today: NaiveDate,
    ) {
        let title = format!(" {} ({}) ", col.status.display_name(), col.tasks.len());

        let border_style = if is_active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let items: Vec<ListItem> = col
            .tasks
            .iter()
            .map(|task| {
                let class = task.classify(today);
                let mut spans = vec![
                    Span::styled(
                        format!("{} ", task.priority.symbol()),
                        priority_style(task.priority),
                    ),
                    Span::styled(task.title.as_str(), class_style(class)),
                ];
                if let Some(deadline) = task.deadline {
                    let due = if class == DeadlineClass::Overdue {
                        format!("  overdue {deadline}")
                    } else {
                        format!("  {deadline}")
                    };
                    spans.push(Span::styled(due, Style::default().fg(Color::DarkGray)));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
            .highlight_symbol("> ");

        let mut state = col.list_state.clone();
        frame.render_stateful_widget(list, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasker_core::Priority;

    fn make_task(id: TaskId, status: Status) -> Task {
        Task {
            id,
            title: format!("Task {id}"),
            description: None,
            status,
            priority: Priority::Medium,
            deadline: None,
        }
    }

    fn make_board() -> TaskBoard {
        TaskBoard::new(&[
            make_task(1, Status::Todo),
            make_task(2, Status::Completed),
            make_task(3, Status::Todo),
            make_task(4, Status::Completed),
            make_task(5, Status::Completed),
        ])
    }

    #[test]
    fn tasks_split_by_status() {
        let board = make_board();
        assert_eq!(board.columns[0].status, Status::Todo);
        assert_eq!(board.columns[0].tasks.len(), 2);
        assert_eq!(board.columns[1].status, Status::Completed);
        assert_eq!(board.columns[1].tasks.len(), 3);
        assert_eq!(board.selected_task().unwrap().id, 1);
    }

    #[test]
    fn select_task_in_second_column() {
        let mut board = make_board();
        assert!(board.select_task_by_id(4));
        assert_eq!(board.active_column, 1);
        assert_eq!(board.active_status(), Status::Completed);
        assert_eq!(board.selected_task().unwrap().id, 4);
    }

    #[test]
    fn select_nonexistent_task_returns_false() {
        let mut board = make_board();
        board.select_task_by_id(5);
        assert!(!board.select_task_by_id(99));
        assert_eq!(board.active_column, 1);
        assert_eq!(board.selected_task().unwrap().id, 5);
    }

    #[test]
    fn select_on_empty_board() {
        let mut board = TaskBoard::new(&[]);
        assert!(!board.select_task_by_id(1));
        assert!(board.selected_task().is_none());
    }

    #[test]
    fn keys_move_within_and_across_columns() {
        let mut board = make_board();
        board.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(board.selected_task().unwrap().id, 3);
        board.handle_key(KeyEvent::from(KeyCode::Char('j')));
        assert_eq!(board.selected_task().unwrap().id, 3);

        board.handle_key(KeyEvent::from(KeyCode::Char('l')));
        board.handle_key(KeyEvent::from(KeyCode::Char('G')));
        assert_eq!(board.selected_task().unwrap().id, 5);
        board.handle_key(KeyEvent::from(KeyCode::Char('l')));
        assert_eq!(board.active_column, 1);
        board.handle_key(KeyEvent::from(KeyCode::Char('g')));
        assert_eq!(board.selected_task().unwrap().id, 2);
    }
}
