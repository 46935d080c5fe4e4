use ratatui::prelude::*;
use ratatui::widgets::{BarChart, Block, Borders, Paragraph};
use tasker_core::{AgeGroup, LogisticsData};

/// Bars for the task statistics chart, in display order.
pub fn task_bars(data: &LogisticsData) -> Vec<(&'static str, u64)> {
    let stats = &data.task_statistics;
    vec![
        ("Completed", stats.completed_tasks as u64),
        ("Ongoing", stats.ongoing_tasks as u64),
        ("Total", stats.total_tasks as u64),
    ]
}

/// One bar per observed age group.
pub fn age_bars(data: &LogisticsData) -> Vec<(&'static str, u64)> {
    AgeGroup::ALL
        .iter()
        .filter(|g| data.user_age_groups.contains_key(*g))
        .map(|g| (g.label(), data.count_for(*g) as u64))
        .collect()
}

pub fn render(frame: &mut Frame, area: Rect, data: &LogisticsData) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(50),
            Constraint::Min(0),
        ])
        .split(area);

    let rate = Paragraph::new(Line::from(vec![
        Span::styled("Completion rate: ", Style::default().bold()),
        Span::styled(data.completion_rate_label(), Style::default().fg(Color::Green)),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Logistics "));
    frame.render_widget(rate, chunks[0]);

    let tasks = task_bars(data);
    let task_chart = BarChart::default()
        .block(
            Block::default()
                .title(" Task Statistics ")
                .borders(Borders::ALL),
        )
        .data(tasks.as_slice())
        .bar_width(11)
        .bar_gap(3)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    frame.render_widget(task_chart, chunks[1]);

    let ages = age_bars(data);
    let age_chart = BarChart::default()
        .block(
            Block::default()
                .title(" User Age Groups ")
                .borders(Borders::ALL),
        )
        .data(ages.as_slice())
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Magenta))
        .value_style(Style::default().fg(Color::Black).bg(Color::Magenta));
    frame.render_widget(age_chart, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasker_core::{Priority, Role, Status, Task, User};

    fn task(id: i64, status: Status) -> Task {
        Task {
            id,
            title: String::new(),
            description: None,
            status,
            priority: Priority::Low,
            deadline: None,
        }
    }

    fn user(age: Option<u32>) -> User {
        User {
            user_id: 1,
            username: "u".into(),
            email: String::new(),
            age,
            first_name: None,
            last_name: None,
            role: Role::User,
        }
    }

    #[test]
    fn bars_mirror_the_projection() {
        let data = LogisticsData::compute(
            &[task(1, Status::Completed), task(2, Status::Completed), task(3, Status::Todo)],
            &[user(Some(20)), user(Some(30)), user(Some(40)), user(Some(60))],
        );
        assert_eq!(
            task_bars(&data),
            vec![("Completed", 2), ("Ongoing", 1), ("Total", 3)]
        );
        assert_eq!(
            age_bars(&data),
            vec![("18-24", 1), ("25-34", 1), ("35-44", 1), ("55+", 1)]
        );
    }

    #[test]
    fn empty_data_has_no_age_bars() {
        let data = LogisticsData::default();
        assert!(age_bars(&data).is_empty());
        assert_eq!(task_bars(&data)[2], ("Total", 0));
    }
}
