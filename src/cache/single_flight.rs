//! Collapse concurrent identical requests into one execution.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::oneshot;
use tracing::debug;

type Waiters<T> = Vec<oneshot::Sender<T>>;

/// Runs at most one operation per key at a time. Callers arriving while an
/// operation is in flight wait for it and receive a clone of its result.
pub struct SingleFlight<T> {
    in_flight: Mutex<HashMap<String, Waiters<T>>>,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self {
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Run `operation` for `key`, or join the run already in flight.
    ///
    /// If the caller executing the operation is dropped before finishing, its
    /// waiters are released and one of them runs its own operation instead.
    pub async fn run<F, Fut>(&self, key: &str, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        loop {
            let receiver = {
                let mut in_flight = self.in_flight.lock();
                match in_flight.get_mut(key) {
                    Some(waiters) => {
                        let (sender, receiver) = oneshot::channel();
                        waiters.push(sender);
                        receiver
                    }
                    None => {
                        in_flight.insert(key.to_string(), Vec::new());
                        break;
                    }
                }
            };

            debug!(key, "joining in-flight request");
            match receiver.await {
                Ok(value) => return value,
                Err(_) => debug!(key, "in-flight request was abandoned; retrying"),
            }
        }

        let flight = Flight {
            in_flight: &self.in_flight,
            key,
            finished: false,
        };
        let value = operation().await;

        let waiters = flight.finish();
        if !waiters.is_empty() {
            debug!(key, waiters = waiters.len(), "sharing result");
        }
        for waiter in waiters {
            let _ = waiter.send(value.clone());
        }
        value
    }

    /// Number of keys with an operation in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Releases the key when the executing caller finishes or is dropped.
struct Flight<'a, T> {
    in_flight: &'a Mutex<HashMap<String, Waiters<T>>>,
    key: &'a str,
    finished: bool,
}

impl<T> Flight<'_, T> {
    fn finish(mut self) -> Waiters<T> {
        self.finished = true;
        self.in_flight.lock().remove(self.key).unwrap_or_default()
    }
}

impl<T> Drop for Flight<'_, T> {
    fn drop(&mut self) {
        if !self.finished {
            // dropping the senders wakes every waiter with a RecvError
            self.in_flight.lock().remove(self.key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_execution() {
        let flights = Arc::new(SingleFlight::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let flights = flights.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                flights
                    .run("k", move || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        42
                    })
                    .await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flights.in_flight(), 0);
    }

    #[tokio::test]
    async fn distinct_keys_run_independently() {
        let flights = SingleFlight::<&'static str>::new();
        let (a, b) = tokio::join!(
            flights.run("a", || async { "a" }),
            flights.run("b", || async { "b" })
        );
        assert_eq!((a, b), ("a", "b"));
    }

    #[tokio::test]
    async fn key_is_released_after_completion() {
        let flights = SingleFlight::<u32>::new();
        assert_eq!(flights.run("k", || async { 1 }).await, 1);
        assert_eq!(flights.run("k", || async { 2 }).await, 2);
    }

    #[tokio::test]
    async fn waiter_takes_over_when_leader_is_dropped() {
        let flights = Arc::new(SingleFlight::<u32>::new());

        let leader = {
            let flights = flights.clone();
            tokio::spawn(async move { flights.run("k", || std::future::pending::<u32>()).await })
        };
        tokio::task::yield_now().await;
        assert_eq!(flights.in_flight(), 1);

        let waiter = {
            let flights = flights.clone();
            tokio::spawn(async move { flights.run("k", || async { 7 }).await })
        };
        tokio::task::yield_now().await;

        leader.abort();
        assert_eq!(waiter.await.unwrap(), 7);
        assert_eq!(flights.in_flight(), 0);
    }
}
