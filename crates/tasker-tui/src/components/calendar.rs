use chrono::{Duration, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, List, ListItem, Row, Table};
use tasker_core::calendar::{CalendarEvent, MonthView};
use tasker_core::TaskId;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Month grid with a selected day. The shown month always contains the
/// selected day.
pub struct CalendarPanel {
    month: MonthView,
    selected: NaiveDate,
    today: NaiveDate,
}

impl CalendarPanel {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            month: MonthView::containing(today),
            selected: today,
            today,
        }
    }

    pub fn month(&self) -> MonthView {
        self.month
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selected
    }

    fn select(&mut self, day: NaiveDate) {
        self.selected = day;
        self.month = MonthView::containing(day);
    }

    fn jump_to_month(&mut self, month: MonthView) {
        self.month = month;
        if let Some(first) = month.weeks().iter().flatten().flatten().next() {
            self.selected = *first;
        }
    }

    /// Returns `true` when the key was a calendar key.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('[') => self.jump_to_month(self.month.prev()),
            KeyCode::Char(']') => self.jump_to_month(self.month.next()),
            KeyCode::Char('.') => self.select(self.today),
            KeyCode::Char('h') | KeyCode::Left => self.select(self.selected - Duration::days(1)),
            KeyCode::Char('l') | KeyCode::Right => self.select(self.selected + Duration::days(1)),
            KeyCode::Char('k') | KeyCode::Up => self.select(self.selected - Duration::days(7)),
            KeyCode::Char('j') | KeyCode::Down => self.select(self.selected + Duration::days(7)),
            _ => return false,
        }
        true
    }

    /// Task behind the first event on the selected day.
    pub fn selected_task_id(&self, events: &[CalendarEvent]) -> Option<TaskId> {
        self.month
            .events_on(events, self.selected)
            .next()
            .map(|e| e.task_id)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, events: &[CalendarEvent]) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(7)])
            .split(area);

        let header = Row::new(WEEKDAYS.iter().map(|d| Cell::from(*d)))
            .style(Style::default().fg(Color::Yellow).bold());

        let rows: Vec<Row> = self
            .month
            .weeks()
            .iter()
            .map(|week| {
                let cells = week.iter().map(|day| match day {
                    Some(date) => self.day_cell(*date, events),
                    None => Cell::from(""),
                });
                Row::new(cells).height(2)
            })
            .collect();

        let grid = Table::new(rows, [Constraint::Ratio(1, 7); 7]).header(header).block(
            Block::default()
                .title(format!(" {} ", self.month.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(grid, chunks[0]);

        let items: Vec<ListItem> = self
            .month
            .events_on(events, self.selected)
            .map(|e| {
                let style = if e.overdue {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                ListItem::new(Span::styled(e.title.clone(), style))
            })
            .collect();
        let day_list = List::new(items).block(
            Block::default()
                .title(format!(" {} ", self.selected.format("%A %Y-%m-%d")))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        frame.render_widget(day_list, chunks[1]);
    }

    fn day_cell(&self, date: NaiveDate, events: &[CalendarEvent]) -> Cell<'static> {
        let on_day: Vec<&CalendarEvent> = self.month.events_on(events, date).collect();
        let any_overdue = on_day.iter().any(|e| e.overdue);

        let mut style = Style::default();
        if date == self.today {
            style = style.fg(Color::Cyan).bold();
        }
        if date == self.selected {
            style = style.bg(Color::DarkGray);
        }

        let marker = match on_day.len() {
            0 => String::new(),
            1 => on_day[0].title.chars().take(8).collect(),
            n => format!("{n} tasks"),
        };
        let marker_style = if any_overdue {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };

        Cell::from(Text::from(vec![
            Line::from(Span::styled(format!("{:>2}", date.format("%-d")), style)),
            Line::from(Span::styled(marker, marker_style)),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::from(KeyCode::Char(c))
    }

    #[test]
    fn month_navigation_and_back_to_today() {
        let mut cal = CalendarPanel::new(date(2024, 12, 15));
        assert!(cal.handle_key(key(']')));
        assert_eq!((cal.month().year(), cal.month().month()), (2025, 1));
        assert_eq!(cal.selected_day(), date(2025, 1, 1));

        cal.handle_key(key('['));
        cal.handle_key(key('['));
        assert_eq!(cal.month().month(), 11);

        cal.handle_key(key('.'));
        assert_eq!(cal.selected_day(), date(2024, 12, 15));
        assert_eq!(cal.month().month(), 12);
    }

    #[test]
    fn day_moves_cross_month_boundaries() {
        let mut cal = CalendarPanel::new(date(2024, 3, 31));
        cal.handle_key(key('l'));
        assert_eq!(cal.selected_day(), date(2024, 4, 1));
        assert_eq!(cal.month().month(), 4);
        cal.handle_key(key('k'));
        assert_eq!(cal.selected_day(), date(2024, 3, 25));
        assert!(!cal.handle_key(key('x')));
    }

    #[test]
    fn selected_day_resolves_its_task() {
        let cal = CalendarPanel::new(date(2024, 6, 10));
        let events = vec![
            CalendarEvent {
                task_id: 4,
                title: "Dentist".into(),
                date: date(2024, 6, 10),
                overdue: false,
            },
            CalendarEvent {
                task_id: 5,
                title: "Other".into(),
                date: date(2024, 6, 11),
                overdue: false,
            },
        ];
        assert_eq!(cal.selected_task_id(&events), Some(4));
        assert_eq!(cal.selected_task_id(&events[1..]), None);
    }
}
