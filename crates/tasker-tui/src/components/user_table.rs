use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use tasker_core::{Role, User, UserId};

pub struct UserTable {
    users: Vec<User>,
    state: TableState,
}

impl Default for UserTable {
    fn default() -> Self {
        Self::new()
    }
}

impl UserTable {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            state: TableState::default(),
        }
    }

    pub fn set_users(&mut self, users: &[User]) {
        let selected = self.selected_user().map(|u| u.user_id);
        self.users = users.to_vec();
        self.select_id(selected);
    }

    fn select_id(&mut self, id: Option<UserId>) {
        let idx = id
            .and_then(|id| self.users.iter().position(|u| u.user_id == id))
            .or(if self.users.is_empty() { None } else { Some(0) });
        self.state.select(idx);
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.users.get(self.state.selected()?)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.users.is_empty() {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        let last = self.users.len() - 1;
        let next = match key.code {
            KeyCode::Char('j') | KeyCode::Down => (current + 1).min(last),
            KeyCode::Char('k') | KeyCode::Up => current.saturating_sub(1),
            KeyCode::Char('g') => 0,
            KeyCode::Char('G') => last,
            _ => return,
        };
        self.state.select(Some(next));
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Username", "Name", "Email", "Age", "Role"])
            .style(Style::default().fg(Color::Yellow).bold());

        let rows: Vec<Row> = self
            .users
            .iter()
            .map(|u| {
                let role_style = if u.role == Role::Admin {
                    Style::default().fg(Color::Magenta)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(u.username.clone()),
                    Cell::from(u.full_name()),
                    Cell::from(u.email.clone()),
                    Cell::from(u.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into())),
                    Cell::from(Span::styled(u.role.as_str(), role_style)),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(20),
                Constraint::Percentage(25),
                Constraint::Percentage(30),
                Constraint::Percentage(10),
                Constraint::Percentage(15),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" Users ({}) ", self.users.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan).bold())
        .highlight_symbol("> ");

        let mut state = self.state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}
