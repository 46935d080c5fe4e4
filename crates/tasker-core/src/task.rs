use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

pub type TaskId = i64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[default]
    #[serde(rename = "To-Do", alias = "to-do", alias = "todo")]
    Todo,
    #[serde(rename = "Completed", alias = "completed")]
    Completed,
}

impl Status {
    pub const ALL: &[Status] = &[Status::Todo, Status::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Todo => "To-Do",
            Status::Completed => "Completed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "to-do" | "todo" => Some(Status::Todo),
            "completed" => Some(Status::Completed),
            _ => None,
        }
    }

    /// The status a single toggle moves to.
    pub fn toggled(&self) -> Self {
        match self {
            Status::Todo => Status::Completed,
            Status::Completed => Status::Todo,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Declaration order is the rank order: Low < Medium < High < Critical.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: &[Priority] = &[
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }

    pub fn display_name(&self) -> &'static str {
        self.as_str()
    }

    pub fn rank(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
            Priority::Critical => 3,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Priority::Critical => "!!!",
            Priority::High => "!!",
            Priority::Medium => "!",
            Priority::Low => "-",
        }
    }

    pub fn parse_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Priority::Low),
            "medium" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            "critical" => Some(Priority::Critical),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Colour class of a task row, derived from status and deadline only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineClass {
    Completed,
    Overdue,
    Open,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "priority_or_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
}

impl Task {
    /// A task is overdue when its deadline has passed and it is not completed.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != Status::Completed && self.deadline.is_some_and(|d| d < today)
    }

    pub fn classify(&self, today: NaiveDate) -> DeadlineClass {
        if self.status == Status::Completed {
            DeadlineClass::Completed
        } else if self.is_overdue(today) {
            DeadlineClass::Overdue
        } else {
            DeadlineClass::Open
        }
    }

    pub fn deadline_label(&self) -> String {
        self.deadline
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "No deadline".into())
    }

    pub fn to_payload(&self) -> TaskPayload {
        TaskPayload {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            deadline: self.deadline,
        }
    }
}

/// Body of task create and update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "status_or_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "priority_or_default")]
    pub priority: Priority,
    #[serde(default, deserialize_with = "lenient_date")]
    pub deadline: Option<NaiveDate>,
}

/// Parse a deadline the way the backend has been seen to send it.
pub fn parse_deadline(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y/%m/%d").ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn status_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Status, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(Status::parse_str).unwrap_or_default())
}

fn priority_or_default<'de, D: Deserializer<'de>>(d: D) -> Result<Priority, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.as_deref().and_then(Priority::parse_str).unwrap_or_default())
}

fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(date_from_value))
}

fn date_from_value(value: &serde_json::Value) -> Option<NaiveDate> {
    match value {
        serde_json::Value::String(s) => parse_deadline(s),
        // LocalDate written as a timestamp array: [year, month, day]
        serde_json::Value::Array(parts) if parts.len() >= 3 => {
            let year = parts[0].as_i64()?;
            let month = parts[1].as_u64()?;
            let day = parts[2].as_u64()?;
            NaiveDate::from_ymd_opt(
                i32::try_from(year).ok()?,
                u32::try_from(month).ok()?,
                u32::try_from(day).ok()?,
            )
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(status: Status, deadline: Option<&str>) -> Task {
        Task {
            id: 1,
            title: "Write report".into(),
            description: None,
            status,
            priority: Priority::Medium,
            deadline: deadline.map(date),
        }
    }

    #[test]
    fn priority_rank_follows_total_order() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Critical);
        let ranks: Vec<u8> = Priority::ALL.iter().map(Priority::rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn status_toggle_flips_between_two_states() {
        assert_eq!(Status::Todo.toggled(), Status::Completed);
        assert_eq!(Status::Completed.toggled(), Status::Todo);
    }

    #[test]
    fn status_parse_accepts_backend_spellings() {
        assert_eq!(Status::parse_str("To-Do"), Some(Status::Todo));
        assert_eq!(Status::parse_str("to-do"), Some(Status::Todo));
        assert_eq!(Status::parse_str("completed"), Some(Status::Completed));
        assert_eq!(Status::parse_str("archived"), None);
    }

    #[test]
    fn past_deadline_open_task_is_overdue() {
        let today = date("2024-06-10");
        let t = task(Status::Todo, Some("2024-06-09"));
        assert!(t.is_overdue(today));
        assert_eq!(t.classify(today), DeadlineClass::Overdue);
    }

    #[test]
    fn completed_task_is_never_overdue() {
        let today = date("2024-06-10");
        let t = task(Status::Completed, Some("2000-01-01"));
        assert!(!t.is_overdue(today));
        assert_eq!(t.classify(today), DeadlineClass::Completed);
    }

    #[test]
    fn due_today_is_not_overdue() {
        let today = date("2024-06-10");
        let t = task(Status::Todo, Some("2024-06-10"));
        assert!(!t.is_overdue(today));
        assert_eq!(t.classify(today), DeadlineClass::Open);
        assert!(!task(Status::Todo, None).is_overdue(today));
    }

    #[test]
    fn decodes_backend_task_with_nulls_and_extra_fields() {
        let json = r#"{
            "id": 7,
            "title": "Pay rent",
            "description": null,
            "status": null,
            "priority": "High",
            "deadline": "2024-07-01",
            "user": {"userId": 3, "username": "sam"}
        }"#;
        let t: Task = serde_json::from_str(json).unwrap();
        assert_eq!(t.id, 7);
        assert_eq!(t.status, Status::Todo);
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.deadline, Some(date("2024-07-01")));
    }

    #[test]
    fn decodes_alternative_deadline_shapes() {
        let iso: Task = serde_json::from_str(
            r#"{"id":1,"title":"a","deadline":"2024-03-05T10:00:00.000Z"}"#,
        )
        .unwrap();
        assert_eq!(iso.deadline, Some(date("2024-03-05")));

        let array: Task =
            serde_json::from_str(r#"{"id":1,"title":"a","deadline":[2024,3,5]}"#).unwrap();
        assert_eq!(array.deadline, Some(date("2024-03-05")));

        let garbage: Task =
            serde_json::from_str(r#"{"id":1,"title":"a","deadline":"soon"}"#).unwrap();
        assert_eq!(garbage.deadline, None);
    }

    #[test]
    fn payload_serializes_wire_names() {
        let payload = task(Status::Todo, Some("2024-06-09")).to_payload();
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["status"], "To-Do");
        assert_eq!(value["priority"], "Medium");
        assert_eq!(value["deadline"], "2024-06-09");
    }
}
