use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use super::local;
use crate::runtime::scheduler::{deferred, Deferred, DeferredState};

#[test]
fn test_pending_until_resolved() {
    let (resolver, handle) = deferred::<i64>();
    assert_eq!(handle.state(), DeferredState::Pending);
    assert_eq!(handle.peek(), None);
    assert!(resolver.is_observed());

    resolver.resolve(7);
    assert_eq!(handle.state(), DeferredState::Resolved);
    assert_eq!(handle.peek(), Some(7));
}

#[test]
fn test_resolved_constructor() {
    let handle = Deferred::resolved("ready");
    assert_eq!(handle.state(), DeferredState::Resolved);
    assert!(!handle.is_abandoned());
    assert_eq!(handle.peek(), Some("ready"));
}

#[test]
fn test_resolver_sees_dropped_observers() {
    let (resolver, handle) = deferred::<()>();
    drop(handle);
    assert!(!resolver.is_observed());
}

#[tokio::test(start_paused = true)]
async fn test_observers_before_and_after_agree() {
    let (resolver, handle) = deferred::<String>();
    let early = handle.clone();
    let waiter = tokio::spawn(async move { early.wait().await });

    tokio::time::sleep(Duration::from_millis(10)).await;
    resolver.resolve("value".to_string());

    let late = handle.wait().await;
    assert_eq!(waiter.await.unwrap(), Some("value".to_string()));
    assert_eq!(late, Some("value".to_string()));
}

#[tokio::test]
async fn test_wait_on_resolved_handle_returns_value() {
    let handle = Deferred::resolved(vec![1, 2]);
    assert_eq!(handle.wait().await, Some(vec![1, 2]));
    assert_eq!(handle.wait().await, Some(vec![1, 2]));
}

#[tokio::test]
async fn test_abandoned_handle_yields_none() {
    let (resolver, handle) = deferred::<i64>();
    drop(resolver);
    assert!(handle.is_abandoned());
    assert_eq!(handle.state(), DeferredState::Pending);
    assert_eq!(handle.wait().await, None);
}

#[tokio::test]
async fn test_then_transforms_value() {
    local(async {
        let (resolver, handle) = deferred::<i64>();
        let doubled = handle.then(|v| v * 2);
        resolver.resolve(21);
        assert_eq!(doubled.wait().await, Some(42));
    })
    .await;
}

#[tokio::test]
async fn test_then_after_resolution_still_runs() {
    local(async {
        let handle = Deferred::resolved(5i64);
        let next = handle.then(|v| v + 1);
        assert_eq!(next.wait().await, Some(6));
    })
    .await;
}

#[tokio::test]
async fn test_then_on_abandoned_never_runs() {
    local(async {
        let ran = Rc::new(Cell::new(false));
        let (resolver, handle) = deferred::<i64>();
        let flag = ran.clone();
        let next = handle.then(move |_| flag.set(true));
        drop(resolver);

        assert_eq!(next.wait().await, None);
        assert!(!ran.get());
    })
    .await;
}
