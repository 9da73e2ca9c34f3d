pub mod bridge;
pub mod fetch;
pub mod frame;
pub mod poller;
pub mod runtime;

pub use protocol::models;
pub use protocol::{AppError, AppErrorPayload, AppResult, ErrorContextItem, ResultExt};
