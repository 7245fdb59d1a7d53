//! Fixed-delay retry loop
//!
//! A [`RetryPolicy`] repeatedly invokes an operation while its classifier
//! reports the failure as transient, sleeping a fixed delay between attempts
//! and logging before each sleep. When the stop condition fires the last
//! error is handed back unchanged, so callers always see the real failure.

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, warn};

/// Delay between attempts when none is configured
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Snapshot handed to stop conditions after each failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    /// Number of the attempt that just finished, starting at 1
    pub attempt_number: usize,
    /// Wall-clock time since the first attempt started
    pub elapsed: Duration,
}

/// Predicate type for caller-supplied stop conditions
pub type StopFn = dyn Fn(&RetryState) -> bool + Send + Sync;

/// When to give up retrying
#[derive(Clone, Default)]
pub enum StopCondition {
    /// Retry transient failures forever
    #[default]
    Never,
    /// Stop once this many attempts have been made
    AfterAttempt(usize),
    /// Stop once this much time has passed since the first attempt
    AfterDelay(Duration),
    /// Stop once the flag is raised, e.g. on shutdown
    OnSignal(Arc<AtomicBool>),
    /// Caller-supplied predicate
    Custom(Arc<StopFn>),
}

impl StopCondition {
    /// Build a custom stop condition from a closure
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&RetryState) -> bool + Send + Sync + 'static,
    {
        StopCondition::Custom(Arc::new(predicate))
    }

    /// Whether the loop should give up after the attempt described by `state`
    pub fn should_stop(&self, state: &RetryState) -> bool {
        match self {
            StopCondition::Never => false,
            StopCondition::AfterAttempt(max) => state.attempt_number >= *max,
            StopCondition::AfterDelay(limit) => state.elapsed >= *limit,
            StopCondition::OnSignal(flag) => flag.load(Ordering::Relaxed),
            StopCondition::Custom(predicate) => predicate(state),
        }
    }
}

impl fmt::Debug for StopCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopCondition::Never => f.write_str("Never"),
            StopCondition::AfterAttempt(max) => f.debug_tuple("AfterAttempt").field(max).finish(),
            StopCondition::AfterDelay(limit) => f.debug_tuple("AfterDelay").field(limit).finish(),
            StopCondition::OnSignal(flag) => f
                .debug_tuple("OnSignal")
                .field(&flag.load(Ordering::Relaxed))
                .finish(),
            StopCondition::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Identity of the wrapped operation, used in retry log records
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub name: &'a str,
    pub args: String,
}

impl<'a> CallSite<'a> {
    pub fn new(name: &'a str, args: impl fmt::Debug) -> Self {
        Self {
            name,
            args: format!("{:?}", args),
        }
    }
}

/// What the previous attempt produced
enum Outcome<'a> {
    Raised(&'a dyn fmt::Display),
    Returned(&'a dyn fmt::Debug),
}

/// Attempt bookkeeping shared by the async and blocking loops
struct Attempts {
    start: Instant,
    attempt_number: usize,
}

impl Attempts {
    fn begin() -> Self {
        Self {
            start: Instant::now(),
            attempt_number: 1,
        }
    }

    fn state(&self) -> RetryState {
        RetryState {
            attempt_number: self.attempt_number,
            elapsed: self.start.elapsed(),
        }
    }

    /// Decide whether to go again. Returns the delay to sleep, or `None` when
    /// the stop condition fired.
    fn advance(
        &mut self,
        policy: &RetryPolicy,
        call: &CallSite<'_>,
        outcome: Outcome<'_>,
    ) -> Option<Duration> {
        let state = self.state();
        if policy.stop.should_stop(&state) {
            error!(
                attempt = state.attempt_number,
                "Giving up on {} after {} attempts ({:.3}s)",
                call.name,
                state.attempt_number,
                state.elapsed.as_secs_f64()
            );
            return None;
        }

        let (verb, value) = match outcome {
            Outcome::Raised(err) => ("raised", err.to_string()),
            Outcome::Returned(value) => ("returned", format!("{:?}", value)),
        };
        warn!(
            attempt = state.attempt_number,
            "Failed after {:.3}(s) Retrying {} Args {} in {} seconds as it {} {}.",
            state.elapsed.as_secs_f64(),
            call.name,
            call.args,
            policy.wait.as_secs_f64(),
            verb,
            value
        );

        self.attempt_number += 1;
        Some(policy.wait)
    }
}

/// Fixed-delay retry policy
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    wait: Duration,
    stop: StopCondition,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            wait: DEFAULT_WAIT,
            stop: StopCondition::Never,
        }
    }
}

impl RetryPolicy {
    pub fn new(wait: Duration, stop: StopCondition) -> Self {
        Self { wait, stop }
    }

    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_stop(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn stop(&self) -> &StopCondition {
        &self.stop
    }

    /// Run `operation` until it succeeds, fails permanently, or the stop
    /// condition fires
    pub async fn execute<T, E, F, Fut, C>(
        &self,
        call: &CallSite<'_>,
        is_retryable: C,
        operation: F,
    ) -> Result<T, E>
    where
        T: fmt::Debug,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
    {
        self.execute_until(call, is_retryable, |_: &T| false, operation)
            .await
    }

    /// Like [`execute`](Self::execute), but a successful value for which
    /// `retry_on_result` holds is also retried. If the stop condition fires on
    /// such a value, the value is returned.
    pub async fn execute_until<T, E, F, Fut, C, R>(
        &self,
        call: &CallSite<'_>,
        is_retryable: C,
        retry_on_result: R,
        mut operation: F,
    ) -> Result<T, E>
    where
        T: fmt::Debug,
        E: fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        C: Fn(&E) -> bool,
        R: Fn(&T) -> bool,
    {
        let mut attempts = Attempts::begin();
        loop {
            let delay = match operation().await {
                Ok(value) if retry_on_result(&value) => {
                    match attempts.advance(self, call, Outcome::Returned(&value)) {
                        Some(delay) => delay,
                        None => return Ok(value),
                    }
                }
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) => {
                    match attempts.advance(self, call, Outcome::Raised(&err)) {
                        Some(delay) => delay,
                        None => return Err(err),
                    }
                }
                Err(err) => return Err(err),
            };
            tokio::time::sleep(delay).await;
        }
    }

    /// Blocking counterpart of [`execute`](Self::execute); sleeps the
    /// current thread between attempts
    pub fn execute_blocking<T, E, F, C>(
        &self,
        call: &CallSite<'_>,
        is_retryable: C,
        mut operation: F,
    ) -> Result<T, E>
    where
        T: fmt::Debug,
        E: fmt::Display,
        F: FnMut() -> Result<T, E>,
        C: Fn(&E) -> bool,
    {
        let mut attempts = Attempts::begin();
        loop {
            let delay = match operation() {
                Ok(value) => return Ok(value),
                Err(err) if is_retryable(&err) => {
                    match attempts.advance(self, call, Outcome::Raised(&err)) {
                        Some(delay) => delay,
                        None => return Err(err),
                    }
                }
                Err(err) => return Err(err),
            };
            std::thread::sleep(delay);
        }
    }
}
