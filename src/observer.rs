// src/observer.rs
//! Observation of a single asynchronous operation.
//!
//! A [`TaskObserver`] is bound to exactly one operation, watches it settle
//! exactly once, and fires the outcome callback followed by the settled
//! callback. It is never reused for a second operation; the paginator builds
//! a fresh observer per page load.

use crate::error::FetchError;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Where the watched operation currently stands.
///
/// Transitions out of `Pending` at most once, then never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Succeeded,
    Faulted,
    Canceled,
}

impl TaskStatus {
    pub fn is_completed(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

type Operation<T> = BoxFuture<'static, Result<T, FetchError>>;
type OperationFactory<T> = Box<dyn FnOnce() -> Operation<T> + Send>;

/// Outcome bookkeeping, written exactly once by the watcher task.
struct Completion<T> {
    status: TaskStatus,
    value: Option<Arc<T>>,
    error: Option<Arc<FetchError>>,
}

struct Callbacks<T> {
    on_succeeded: Option<Box<dyn FnOnce(&T) + Send>>,
    on_faulted: Option<Box<dyn FnOnce(&FetchError) + Send>>,
    on_canceled: Option<Box<dyn FnOnce() + Send>>,
    on_settled: Option<Box<dyn FnOnce() + Send>>,
}

impl<T> Callbacks<T> {
    fn none() -> Self {
        Self {
            on_succeeded: None,
            on_faulted: None,
            on_canceled: None,
            on_settled: None,
        }
    }
}

/// Fluent construction of a [`TaskObserver`].
pub struct TaskObserverBuilder<T> {
    factory: OperationFactory<T>,
    default_result: T,
    callbacks: Callbacks<T>,
}

impl<T: Send + 'static> TaskObserverBuilder<T> {
    /// Starts from a cold operation: `factory` runs when the observer starts.
    pub fn new<F, Fut>(factory: F, default_result: T) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        Self {
            factory: Box::new(move || -> Operation<T> { Box::pin(factory()) }),
            default_result,
            callbacks: Callbacks::none(),
        }
    }

    /// Called with the operation's value when it succeeds.
    pub fn on_succeeded(mut self, callback: impl FnOnce(&T) + Send + 'static) -> Self {
        self.callbacks.on_succeeded = Some(Box::new(callback));
        self
    }

    /// Called with the failure when the operation faults.
    pub fn on_faulted(mut self, callback: impl FnOnce(&FetchError) + Send + 'static) -> Self {
        self.callbacks.on_faulted = Some(Box::new(callback));
        self
    }

    /// Called when the operation reports external cancellation.
    pub fn on_canceled(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_canceled = Some(Box::new(callback));
        self
    }

    /// Called after the outcome callback, whichever outcome it was.
    pub fn on_settled(mut self, callback: impl FnOnce() + Send + 'static) -> Self {
        self.callbacks.on_settled = Some(Box::new(callback));
        self
    }

    pub fn build(self) -> TaskObserver<T> {
        TaskObserver {
            completion: Arc::new(Mutex::new(Completion {
                status: TaskStatus::Pending,
                value: None,
                error: None,
            })),
            default_result: self.default_result,
            start_state: Mutex::new(Some((self.factory, self.callbacks))),
        }
    }
}

/// Watches one asynchronous operation and records its outcome.
///
/// Reading [`result`](TaskObserver::result) never blocks: it yields the
/// operation's value once succeeded and the caller-supplied default until
/// then. The observer initiates no retries and no cancellation of its own.
pub struct TaskObserver<T> {
    completion: Arc<Mutex<Completion<T>>>,
    default_result: T,
    start_state: Mutex<Option<(OperationFactory<T>, Callbacks<T>)>>,
}

impl<T: Send + Sync + 'static> TaskObserver<T> {
    /// Cold construction: the operation starts when [`start`](Self::start)
    /// is called.
    pub fn builder<F, Fut>(factory: F, default_result: T) -> TaskObserverBuilder<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        TaskObserverBuilder::new(factory, default_result)
    }

    /// Hot construction: wraps an operation that is already running (for
    /// example a join handle). Observation still begins on `start()`.
    pub fn from_future<Fut>(operation: Fut, default_result: T) -> TaskObserverBuilder<T>
    where
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        TaskObserverBuilder::new(move || operation, default_result)
    }

    /// Begins observing the operation on a spawned task.
    ///
    /// Must run inside a tokio runtime. A second call is a no-op: the
    /// observer is bound to exactly one operation for its lifetime.
    pub fn start(&self) {
        let Some((factory, callbacks)) = self.start_state.lock().take() else {
            log::warn!("observer already started, ignoring start()");
            return;
        };

        let completion = Arc::clone(&self.completion);
        tokio::spawn(async move {
            let outcome = factory().await;
            settle(&completion, outcome, callbacks);
        });
    }

    pub fn status(&self) -> TaskStatus {
        self.completion.lock().status
    }

    pub fn is_pending(&self) -> bool {
        self.status() == TaskStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status().is_completed()
    }

    pub fn is_succeeded(&self) -> bool {
        self.status() == TaskStatus::Succeeded
    }

    pub fn is_faulted(&self) -> bool {
        self.status() == TaskStatus::Faulted
    }

    pub fn is_canceled(&self) -> bool {
        self.status() == TaskStatus::Canceled
    }

    /// The operation's value once succeeded, the default until then.
    pub fn result(&self) -> T
    where
        T: Clone,
    {
        match &self.completion.lock().value {
            Some(value) => T::clone(value),
            None => self.default_result.clone(),
        }
    }

    /// The failure recorded for a faulted operation.
    pub fn error(&self) -> Option<Arc<FetchError>> {
        self.completion.lock().error.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error().map(|err| err.to_string())
    }
}

/// Records the outcome, then fires the outcome callback and the settled
/// callback in that order.
///
/// The status is written before any callback runs, so a callback that reads
/// the observer sees the final status, and a panicking callback cannot leave
/// the bookkeeping half-done.
fn settle<T: Send + Sync>(
    completion: &Mutex<Completion<T>>,
    outcome: Result<T, FetchError>,
    callbacks: Callbacks<T>,
) {
    let Callbacks {
        on_succeeded,
        on_faulted,
        on_canceled,
        on_settled,
    } = callbacks;

    match outcome {
        Ok(value) => {
            let value = Arc::new(value);
            {
                let mut slot = completion.lock();
                slot.status = TaskStatus::Succeeded;
                slot.value = Some(Arc::clone(&value));
            }
            if let Some(callback) = on_succeeded {
                run_shielded("on_succeeded", move || callback(&value));
            }
        }
        Err(FetchError::Canceled) => {
            completion.lock().status = TaskStatus::Canceled;
            log::info!("observed operation was canceled");
            if let Some(callback) = on_canceled {
                run_shielded("on_canceled", callback);
            }
        }
        Err(error) => {
            let error = Arc::new(error);
            {
                let mut slot = completion.lock();
                slot.status = TaskStatus::Faulted;
                slot.error = Some(Arc::clone(&error));
            }
            if let Some(callback) = on_faulted {
                run_shielded("on_faulted", move || callback(&error));
            }
        }
    }

    if let Some(callback) = on_settled {
        run_shielded("on_settled", callback);
    }
}

/// Runs a caller-supplied callback, swallowing and logging any panic.
fn run_shielded(name: &str, callback: impl FnOnce()) {
    if catch_unwind(AssertUnwindSafe(callback)).is_err() {
        log::error!("panic in {name} callback suppressed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::oneshot;

    fn settled_channel() -> (Box<dyn FnOnce() + Send>, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        (
            Box::new(move || {
                let _ = tx.send(());
            }),
            rx,
        )
    }

    #[tokio::test]
    async fn success_fires_succeeded_then_settled() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let (tx, rx) = oneshot::channel();

        let succeeded_order = Arc::clone(&order);
        let settled_order = Arc::clone(&order);
        let observer = TaskObserver::builder(|| async { Ok(41) }, 0)
            .on_succeeded(move |value: &i32| {
                succeeded_order.lock().push(format!("succeeded {value}"));
            })
            .on_settled(move || {
                settled_order.lock().push("settled".to_string());
                let _ = tx.send(());
            })
            .build();

        assert!(observer.is_pending());
        observer.start();
        rx.await.unwrap();

        assert_eq!(observer.status(), TaskStatus::Succeeded);
        assert_eq!(observer.result(), 41);
        assert_eq!(*order.lock(), vec!["succeeded 41", "settled"]);
    }

    #[tokio::test]
    async fn fault_records_the_error_and_keeps_the_default_result() {
        let (on_settled, rx) = settled_channel();
        let observer = TaskObserver::builder(
            || async { Err::<i32, _>(FetchError::communication("timeout")) },
            7,
        )
        .on_settled(on_settled)
        .build();

        observer.start();
        rx.await.unwrap();

        assert!(observer.is_faulted());
        assert_eq!(observer.result(), 7);
        assert_eq!(
            observer.error_message().as_deref(),
            Some("communication failure: timeout")
        );
    }

    #[tokio::test]
    async fn cancellation_surfaces_as_canceled_status() {
        let canceled = Arc::new(Mutex::new(false));
        let seen = Arc::clone(&canceled);
        let (on_settled, rx) = settled_channel();

        let observer = TaskObserver::builder(|| async { Err::<i32, _>(FetchError::Canceled) }, 0)
            .on_canceled(move || *seen.lock() = true)
            .on_settled(on_settled)
            .build();

        observer.start();
        rx.await.unwrap();

        assert!(observer.is_canceled());
        assert!(*canceled.lock());
        assert!(observer.error().is_none());
    }

    #[tokio::test]
    async fn hot_operation_settles_like_a_cold_one() {
        let (on_settled, rx) = settled_channel();
        // Already running before the observer exists.
        let handle = tokio::spawn(async { 17 });
        let operation = async move {
            handle
                .await
                .map_err(|join_error| FetchError::message(join_error.to_string()))
        };

        let observer = TaskObserver::from_future(operation, 0)
            .on_settled(on_settled)
            .build();
        observer.start();
        rx.await.unwrap();

        assert!(observer.is_succeeded());
        assert_eq!(observer.result(), 17);
    }

    #[tokio::test]
    async fn result_is_the_default_while_pending() {
        let observer =
            TaskObserver::builder(|| futures::future::pending::<Result<i32, FetchError>>(), 99)
                .build();
        observer.start();

        assert!(observer.is_pending());
        assert_eq!(observer.result(), 99);
    }

    #[tokio::test]
    async fn panicking_callback_does_not_corrupt_completion() {
        let (on_settled, rx) = settled_channel();
        let observer = TaskObserver::builder(|| async { Ok(5) }, 0)
            .on_succeeded(|_value: &i32| panic!("broken UI callback"))
            .on_settled(on_settled)
            .build();

        observer.start();
        rx.await.unwrap();

        assert!(observer.is_succeeded());
        assert_eq!(observer.result(), 5);
    }

    #[tokio::test]
    async fn second_start_is_ignored() {
        let fetches = Arc::new(Mutex::new(0u32));
        let counted = Arc::clone(&fetches);
        let (on_settled, rx) = settled_channel();

        let observer = TaskObserver::builder(
            move || {
                *counted.lock() += 1;
                async { Ok(1) }
            },
            0,
        )
        .on_settled(on_settled)
        .build();

        observer.start();
        observer.start();
        rx.await.unwrap();

        assert_eq!(*fetches.lock(), 1);
    }
}
