mod blocking;
mod http;
pub mod resolve;
mod traits;
pub mod workflow;

pub use blocking::BlockingHttpService;
pub use http::HttpService;
pub use traits::{ServiceError, TaskerApi, USERNAME_TAKEN};
pub use workflow::CreateOutcome;
