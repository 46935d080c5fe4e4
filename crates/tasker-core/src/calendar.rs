use chrono::{Datelike, Duration, NaiveDate};

use crate::task::{Task, TaskId};

/// All-day calendar entry for one task deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub task_id: TaskId,
    pub title: String,
    pub date: NaiveDate,
    pub overdue: bool,
}

/// Map tasks onto calendar events. Tasks without a deadline have no event.
pub fn events_for(tasks: &[Task], today: NaiveDate) -> Vec<CalendarEvent> {
    tasks
        .iter()
        .filter_map(|t| {
            t.deadline.map(|date| CalendarEvent {
                task_id: t.id,
                title: t.title.clone(),
                date,
                overdue: t.is_overdue(today),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthView {
    year: i32,
    month: u32,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|_| Self { year, month })
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn title(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Six Monday-first weeks. Days outside this month are `None`.
    pub fn weeks(&self) -> [[Option<NaiveDate>; 7]; 6] {
        let first = self.first_day();
        let offset = i64::from(first.weekday().num_days_from_monday());
        let start = first - Duration::days(offset);

        let mut grid = [[None; 7]; 6];
        for (w, week) in grid.iter_mut().enumerate() {
            for (d, cell) in week.iter_mut().enumerate() {
                let day = start + Duration::days((w * 7 + d) as i64);
                if self.contains(day) {
                    *cell = Some(day);
                }
            }
        }
        grid
    }

    pub fn events_on<'a>(
        &self,
        events: &'a [CalendarEvent],
        date: NaiveDate,
    ) -> impl Iterator<Item = &'a CalendarEvent> {
        events.iter().filter(move |e| e.date == date)
    }
}
