use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::task::{Status, Task};
use crate::user::User;

/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55+")]
    From55,
    Unknown,
}

impl AgeGroup {
    pub const ALL: &[AgeGroup] = &[
        AgeGroup::From18To24,
        AgeGroup::From25To34,
        AgeGroup::From35To44,
        AgeGroup::From45To54,
        AgeGroup::From55,
        AgeGroup::Unknown,
    ];

    /// Missing ages, minors and values the decoder could not read
    /// (negative or out of range) land in `Unknown`.
    pub fn for_age(age: Option<u32>) -> Self {
        match age {
            Some(18..=24) => AgeGroup::From18To24,
            Some(25..=34) => AgeGroup::From25To34,
            Some(35..=44) => AgeGroup::From35To44,
            Some(45..=54) => AgeGroup::From45To54,
            Some(a) if a >= 55 => AgeGroup::From55,
            _ => AgeGroup::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::From18To24 => "18-24",
            AgeGroup::From25To34 => "25-34",
            AgeGroup::From35To44 => "35-44",
            AgeGroup::From45To54 => "45-54",
            AgeGroup::From55 => "55+",
            AgeGroup::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub ongoing_tasks: usize,
}

/// Admin dashboard projection. Always rebuilt from the full lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsData {
    pub task_statistics: TaskStatistics,
    pub task_completion_rate: f64,
    pub user_age_groups: BTreeMap<AgeGroup, usize>,
}

impl LogisticsData {
    pub fn compute(tasks: &[Task], users: &[User]) -> Self {
        let completed = tasks
            .iter()
            .filter(|t| t.status == Status::Completed)
            .count();
        let total = tasks.len();
        let task_completion_rate = if total == 0 {
            0.0
        } else {
            completed as f64 * 100.0 / total as f64
        };

        let mut user_age_groups = BTreeMap::new();
        for user in users {
            *user_age_groups.entry(AgeGroup::for_age(user.age)).or_insert(0) += 1;
        }

        Self {
            task_statistics: TaskStatistics {
                total_tasks: total,
                completed_tasks: completed,
                ongoing_tasks: total - completed,
            },
            task_completion_rate,
            user_age_groups,
        }
    }

    pub fn completion_rate_label(&self) -> String {
        format!("{:.2}%", self.task_completion_rate)
    }

    pub fn count_for(&self, group: AgeGroup) -> usize {
        self.user_age_groups.get(&group).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Priority;
    use crate::user::Role;

    fn task(id: i64, status: Status) -> Task {
        Task {
            id,
            title: format!("t{id}"),
            description: None,
            status,
            priority: Priority::Low,
            deadline: None,
        }
    }

    fn user(id: i64, age: Option<u32>) -> User {
        User {
            user_id: id,
            username: format!("u{id}"),
            email: String::new(),
            age,
            first_name: None,
            last_name: None,
            role: Role::User,
        }
    }

    #[test]
    fn two_of_three_completed_is_66_67_percent() {
        let tasks = vec![
            task(1, Status::Completed),
            task(2, Status::Completed),
            task(3, Status::Todo),
        ];
        let data = LogisticsData::compute(&tasks, &[]);
        assert_eq!(
            data.task_statistics,
            TaskStatistics {
                total_tasks: 3,
                completed_tasks: 2,
                ongoing_tasks: 1
            }
        );
        assert_eq!(data.completion_rate_label(), "66.67%");
    }

    #[test]
    fn empty_task_list_has_zero_rate() {
        let data = LogisticsData::compute(&[], &[]);
        assert_eq!(data.task_completion_rate, 0.0);
        assert_eq!(data.completion_rate_label(), "0.00%");
        assert!(data.user_age_groups.is_empty());
    }

    #[test]
    fn ages_fall_into_observed_buckets_only() {
        let users: Vec<User> = [20, 30, 40, 60]
            .iter()
            .enumerate()
            .map(|(i, age)| user(i as i64, Some(*age)))
            .collect();
        let data = LogisticsData::compute(&[], &users);
        let expected: BTreeMap<AgeGroup, usize> = [
            (AgeGroup::From18To24, 1),
            (AgeGroup::From25To34, 1),
            (AgeGroup::From35To44, 1),
            (AgeGroup::From55, 1),
        ]
        .into_iter()
        .collect();
        assert_eq!(data.user_age_groups, expected);
        assert_eq!(data.count_for(AgeGroup::From45To54), 0);
    }

    #[test]
    fn minors_and_missing_ages_are_unknown() {
        let users = vec![user(1, None), user(2, Some(12)), user(3, Some(55))];
        let data = LogisticsData::compute(&[], &users);
        assert_eq!(data.count_for(AgeGroup::Unknown), 2);
        assert_eq!(data.count_for(AgeGroup::From55), 1);
    }

    #[test]
    fn negative_backend_age_counts_as_unknown() {
        let users: Vec<User> = serde_json::from_str(
            r#"[{"userId":1,"username":"a","age":30},{"userId":2,"username":"b","age":-1}]"#,
        )
        .unwrap();
        let data = LogisticsData::compute(&[], &users);
        assert_eq!(data.count_for(AgeGroup::From25To34), 1);
        assert_eq!(data.count_for(AgeGroup::Unknown), 1);
    }

    #[test]
    fn age_group_serializes_as_label() {
        let data = LogisticsData::compute(&[], &[user(1, Some(24))]);
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["userAgeGroups"]["18-24"], 1);
        assert_eq!(value["taskStatistics"]["totalTasks"], 0);
    }
}
