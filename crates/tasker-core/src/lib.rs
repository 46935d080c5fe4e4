pub mod calendar;
pub mod category;
pub mod confirm;
pub mod error;
pub mod logistics;
pub mod session;
pub mod sort;
pub mod task;
pub mod user;
pub mod validation;

pub use category::{Category, CategoryId, CategoryIndex, CategoryName, TaskCategoryLink};
pub use confirm::{ConfirmOutcome, Confirmation};
pub use error::TaskerError;
pub use logistics::{AgeGroup, LogisticsData};
pub use session::Session;
pub use sort::{SortDirection, SortKey, SortState};
pub use task::{DeadlineClass, Priority, Status, Task, TaskId, TaskPayload};
pub use user::{PasswordChange, ProfileUpdate, Role, User, UserDraft, UserId};
pub use validation::{Field, TaskDraft, ValidationRules};
