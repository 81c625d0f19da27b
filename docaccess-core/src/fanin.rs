//! Concurrent fan-out with a single fan-in point.
//!
//! [`fan_out`] starts one sub-operation per input, polls all of them concurrently and
//! resolves only once every one has finished. Each completion is recorded into a
//! [`FanIn`] behind an async mutex, so the collector sees results in completion order
//! regardless of how sub-operations are scheduled.

use std::future::Future;

use futures::future::join_all;
use mea::mutex::Mutex;

use crate::error::{AccessError, AccessResult};

/// Accumulates the results of a fan-out.
///
/// Successful values are slotted by input position; the error slot holds whichever
/// failure completed last.
#[derive(Debug)]
pub(crate) struct FanIn<T> {
    slots: Vec<Option<T>>,
    last_error: Option<AccessError>,
    successes: usize,
    completed: usize,
}

impl<T> FanIn<T> {
    pub(crate) fn new(expected: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(expected).collect(),
            last_error: None,
            successes: 0,
            completed: 0,
        }
    }

    pub(crate) fn record(&mut self, index: usize, result: AccessResult<T>) {
        self.completed += 1;

        match result {
            Ok(value) => {
                self.successes += 1;
                self.slots[index] = Some(value);
            }
            Err(err) => self.last_error = Some(err),
        }
    }

    pub(crate) fn is_complete(&self) -> bool {
        self.completed == self.slots.len()
    }

    /// Resolves the aggregate.
    ///
    /// Any success wins: the successful values are returned in input order and every
    /// error is dropped. With no success, the last observed error is returned, or
    /// `fallback` when nothing failed either (an empty fan-out).
    pub(crate) fn finish(self, fallback: AccessError) -> AccessResult<Vec<T>> {
        if self.successes == 0 {
            return Err(self.last_error.unwrap_or(fallback));
        }

        Ok(self.slots.into_iter().flatten().collect())
    }
}

/// Runs `op` for every input concurrently and joins on all of them.
pub(crate) async fn fan_out<I, F, Fut, T>(inputs: I, op: F) -> FanIn<T>
where
    I: IntoIterator,
    F: Fn(I::Item) -> Fut,
    Fut: Future<Output = AccessResult<T>>,
{
    let futures: Vec<Fut> = inputs.into_iter().map(op).collect();
    let collector = Mutex::new(FanIn::new(futures.len()));

    join_all(futures.into_iter().enumerate().map(|(index, future)| {
        let collector = &collector;
        async move {
            let result = future.await;
            collector.lock().await.record(index, result);
        }
    }))
    .await;

    let fan_in = collector.into_inner();
    debug_assert!(fan_in.is_complete());
    fan_in
}
