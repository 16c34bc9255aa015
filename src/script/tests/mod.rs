//! Script context and hello script tests

use std::future::Future;

use tokio::task::LocalSet;

mod context;

async fn local<F: Future>(f: F) -> F::Output {
    LocalSet::new().run_until(f).await
}
