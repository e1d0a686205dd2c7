//! Request pacing
//!
//! Every wait in the crawler (rate-limit pauses and retry backoff) goes
//! through a [`Sleeper`], so tests can observe pauses without waiting.

use std::future::Future;
use std::time::Duration;

/// Something that can suspend the current task for a while
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Enforces the politeness delay between consecutive requests
#[derive(Debug, Clone)]
pub struct Throttle<S> {
    sleeper: S,
    delay: Duration,
}

impl<S: Sleeper> Throttle<S> {
    pub fn new(sleeper: S, delay: Duration) -> Self {
        Self { sleeper, delay }
    }

    /// The configured delay
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Pauses after item `index` (0-based) of `total`, except after the last one
    ///
    /// Called once per item, this yields exactly `total - 1` pauses.
    pub async fn pause_between(&self, index: usize, total: usize) {
        if index + 1 < total {
            tracing::trace!("Rate limiting for {:?}", self.delay);
            self.sleeper.sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Sleeper;
    use std::future::Future;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Records requested durations and returns immediately
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSleeper {
        calls: Arc<Mutex<Vec<Duration>>>,
    }

    impl RecordingSleeper {
        pub fn calls(&self) -> Vec<Duration> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.calls.lock().unwrap().push(duration);
            std::future::ready(())
        }
    }
}
