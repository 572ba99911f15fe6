//! Post-commit hooks for fire-and-forget side effects.
//!
//! Business operations that notify or schedule reminders must not let those
//! side effects participate in the database transaction: losing a reminder is
//! recoverable, a phantom write is not. Actions collect their side effects
//! here while the transaction is open, commit, then run the list.
//!
//! Each queued task contains its own failure handling (the dispatcher and
//! scheduler log and swallow); `run` never fails.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::future::Future;

/// Ordered list of side effects deferred until after a transaction commits.
#[derive(Default)]
pub struct PostCommit {
    tasks: Vec<BoxFuture<'static, ()>>,
}

impl PostCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a side effect to run after commit.
    pub fn push<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.push(task.boxed());
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run all queued side effects in order.
    pub async fn run(self) {
        for task in self.tasks {
            task.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_runs_tasks_in_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut hooks = PostCommit::new();

        for n in 0..3 {
            let order = order.clone();
            hooks.push(async move {
                order.lock().unwrap().push(n);
            });
        }

        hooks.run().await;
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_run_is_noop() {
        let hooks = PostCommit::new();
        assert!(hooks.is_empty());
        hooks.run().await;
    }

    #[tokio::test]
    async fn test_tasks_queued_while_tx_open_only_run_on_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut hooks = PostCommit::new();

        let c = counter.clone();
        hooks.push(async move {
            c.fetch_add(1, Ordering::SeqCst);
        });

        // Nothing runs until the owning transaction has committed
        assert_eq!(counter.load(Ordering::SeqCst), 0);
        hooks.run().await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
