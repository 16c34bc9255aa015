//! Scheduler 单元测试
//!
//! 测试延迟值、定时器顺序和事件循环

use std::future::Future;

use tokio::task::LocalSet;

mod deferred;

/// Run `f` inside a fresh `LocalSet` on the test runtime.
async fn local<F: Future>(f: F) -> F::Output {
    LocalSet::new().run_until(f).await
}
