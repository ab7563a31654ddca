//! Process-wide FIFO serialization of mutating operations.
//!
//! Waiters queue on a fair async mutex, so they are served in arrival order.
//! The owned guard travels with the work item: exclusion holds until the
//! operation really finishes, even when the calling task is cancelled.

use anyhow::Context;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, Mutex};

use crate::error::BridgeError;

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

const WORKER_THREAD_NAME: &str = "bridge-exec";

/// Where serialized operations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionAffinity {
    /// Any thread of the blocking pool
    #[default]
    None,
    /// One long-lived thread owned by the serializer
    DedicatedThread,
}

impl FromStr for ExecutionAffinity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(ExecutionAffinity::None),
            "dedicated-thread" | "dedicated_thread" => Ok(ExecutionAffinity::DedicatedThread),
            other => Err(format!("Unknown execution affinity: {}", other)),
        }
    }
}

impl fmt::Display for ExecutionAffinity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionAffinity::None => f.write_str("none"),
            ExecutionAffinity::DedicatedThread => f.write_str("dedicated-thread"),
        }
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

fn spawn_worker() -> anyhow::Result<mpsc::UnboundedSender<Job>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Job>();
    thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(move || {
            while let Some(job) = rx.blocking_recv() {
                // A panicking job drops its result sender; the caller sees that.
                if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                    tracing::error!("Serialized operation panicked on the execution thread");
                }
            }
            tracing::debug!("Execution thread stopped");
        })
        .context("Failed to spawn execution thread")?;
    Ok(tx)
}

pub struct OperationSerializer {
    lock: Arc<Mutex<()>>,
    timeout: Duration,
    affinity: ExecutionAffinity,
    worker: Option<mpsc::UnboundedSender<Job>>,
}

impl OperationSerializer {
    pub fn new(timeout: Duration, affinity: ExecutionAffinity) -> anyhow::Result<Self> {
        let worker = match affinity {
            ExecutionAffinity::None => None,
            ExecutionAffinity::DedicatedThread => Some(spawn_worker()?),
        };
        Ok(Self {
            lock: Arc::new(Mutex::new(())),
            timeout,
            affinity,
            worker,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn affinity(&self) -> ExecutionAffinity {
        self.affinity
    }

    /// Run `f` with exclusive access to the mutating surface.
    ///
    /// Fails with `Timeout` if access is not granted within the configured
    /// timeout; `f` is then never run. Dropping the returned future while
    /// queued leaves the queue; once `f` has started it runs to completion
    /// and keeps exclusion even if the caller goes away.
    pub async fn with_exclusive_access<F, R>(&self, operation: &str, f: F) -> Result<R, BridgeError>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let guard = match tokio::time::timeout(self.timeout, self.lock.clone().lock_owned()).await
        {
            Ok(guard) => guard,
            Err(_) => {
                let waited = self.timeout.as_millis();
                tracing::warn!(
                    operation,
                    waited_ms = waited as u64,
                    "Timed out waiting for exclusive access"
                );
                return Err(BridgeError::Timeout(format!(
                    "{} could not acquire exclusive access within {} ms",
                    operation, waited
                )));
            }
        };

        let work = move || {
            let _guard = guard;
            f()
        };

        match &self.worker {
            None => tokio::task::spawn_blocking(work).await.map_err(|e| {
                tracing::error!(operation, error = %e, "Serialized operation failed to complete");
                BridgeError::Internal(format!("{} did not complete", operation))
            }),
            Some(worker) => {
                let (done_tx, done_rx) = oneshot::channel();
                worker
                    .send(Box::new(move || {
                        let _ = done_tx.send(work());
                    }))
                    .map_err(|_| {
                        tracing::error!(operation, "Execution thread is gone");
                        BridgeError::Internal(format!("{} could not be scheduled", operation))
                    })?;
                done_rx.await.map_err(|_| {
                    BridgeError::Internal(format!("{} did not complete", operation))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn test_affinity_parsing() {
        assert_eq!("none".parse::<ExecutionAffinity>(), Ok(ExecutionAffinity::None));
        assert_eq!(
            "Dedicated-Thread".parse::<ExecutionAffinity>(),
            Ok(ExecutionAffinity::DedicatedThread)
        );
        assert!("main".parse::<ExecutionAffinity>().is_err());
        assert_eq!(ExecutionAffinity::DedicatedThread.to_string(), "dedicated-thread");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_operations_never_overlap() {
        let serializer = Arc::new(
            OperationSerializer::new(Duration::from_secs(5), ExecutionAffinity::None).unwrap(),
        );
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let serializer = serializer.clone();
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            handles.push(tokio::spawn(async move {
                serializer
                    .with_exclusive_access("op", move || {
                        let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(10));
                        in_flight.fetch_sub(1, Ordering::SeqCst);
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_timeout_skips_operation() {
        let serializer = Arc::new(
            OperationSerializer::new(Duration::from_millis(50), ExecutionAffinity::None).unwrap(),
        );

        let holder = serializer.clone();
        let slow = tokio::spawn(async move {
            holder
                .with_exclusive_access("slow", || thread::sleep(Duration::from_millis(400)))
                .await
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let err = serializer
            .with_exclusive_access("late", move || flag.store(true, Ordering::SeqCst))
            .await
            .unwrap_err();

        assert!(matches!(err, BridgeError::Timeout(_)));
        slow.await.unwrap().unwrap();
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_dedicated_thread_runs_everything_on_one_thread() {
        let serializer =
            OperationSerializer::new(Duration::from_secs(1), ExecutionAffinity::DedicatedThread)
                .unwrap();

        let first = serializer
            .with_exclusive_access("a", || thread::current().id())
            .await
            .unwrap();
        let second = serializer
            .with_exclusive_access("b", || thread::current().name().map(str::to_string))
            .await
            .unwrap();
        let third = serializer
            .with_exclusive_access("c", || thread::current().id())
            .await
            .unwrap();

        assert_eq!(first, third);
        assert_ne!(first, thread::current().id());
        assert_eq!(second.as_deref(), Some(WORKER_THREAD_NAME));
    }

    #[tokio::test]
    async fn test_panic_on_dedicated_thread_is_internal() {
        let serializer =
            OperationSerializer::new(Duration::from_secs(1), ExecutionAffinity::DedicatedThread)
                .unwrap();

        let err = serializer
            .with_exclusive_access("boom", || -> u32 { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::Internal(_)));

        // The thread and the lock both survive
        let value = serializer.with_exclusive_access("after", || 7).await.unwrap();
        assert_eq!(value, 7);
    }
}
