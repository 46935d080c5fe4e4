pub mod calendar;
pub mod form;
pub mod logistics;
pub mod task_board;
pub mod task_form;
pub mod task_table;
pub mod user_form;
pub mod user_table;

use ratatui::prelude::*;
use tasker_core::{DeadlineClass, Priority};

pub fn priority_style(p: Priority) -> Style {
    match p {
        Priority::Critical => Style::default().fg(Color::Red).bold(),
        Priority::High => Style::default().fg(Color::LightRed),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Blue),
    }
}

/// Row colour: completed green, overdue red.
pub fn class_style(class: DeadlineClass) -> Style {
    match class {
        DeadlineClass::Completed => Style::default().fg(Color::Green),
        DeadlineClass::Overdue => Style::default().fg(Color::Red),
        DeadlineClass::Open => Style::default(),
    }
}
