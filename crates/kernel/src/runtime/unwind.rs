use std::any::Any;
use std::future::{Future, poll_fn};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::pin::pin;
use std::task::Poll;

use crate::{AppError, AppResult};

/// Drives `job` on the current task and turns a panic raised while polling it
/// into an `AppError`. Nothing is spawned.
pub async fn run_guarded<T, F>(label: &'static str, job: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let mut job = pin!(job);
    poll_fn(|cx| match catch_unwind(AssertUnwindSafe(|| job.as_mut().poll(cx))) {
        Ok(poll) => poll,
        Err(payload) => Poll::Ready(Err(AppError::new(
            "guarded_task_panicked",
            "异步任务发生 panic",
        )
        .with_context("guardedTask", label)
        .with_context("panic", panic_detail(payload.as_ref())))),
    })
    .await
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        return (*text).to_string();
    }
    if let Some(text) = payload.downcast_ref::<String>() {
        return text.clone();
    }
    "non-string panic payload".to_string()
}

#[cfg(test)]
#[path = "../../tests/runtime/unwind_tests.rs"]
mod tests;
