//! Oracle handles: a lazily-initialized wrapper and a mock for tests.

use std::sync::{Arc, Mutex};

use super::error::ScheduleError;
use super::traits::ScheduleOracle;

type OracleInit<O> = Box<dyn Fn() -> Result<O, ScheduleError> + Send + Sync>;

enum LazyState<O> {
    Uninitialized,
    Ready(Arc<O>),
    Failed,
}

/// Wraps an oracle whose construction may fail (missing key, no client).
///
/// The initializer runs on the first `ready()`/`request()` call. If it fails,
/// the handle stays unavailable and every extraction runs rule-only until
/// `reset()` is called.
pub struct LazyOracle<O> {
    init: OracleInit<O>,
    state: Mutex<LazyState<O>>,
}

impl<O: ScheduleOracle> LazyOracle<O> {
    pub fn new<F>(init: F) -> Self
    where
        F: Fn() -> Result<O, ScheduleError> + Send + Sync + 'static,
    {
        Self {
            init: Box::new(init),
            state: Mutex::new(LazyState::Uninitialized),
        }
    }

    /// Forget a previous failure (or success) so the next call re-initializes.
    pub fn reset(&self) {
        if let Ok(mut state) = self.state.lock() {
            *state = LazyState::Uninitialized;
        }
    }

    /// Whether initialization has been attempted and failed.
    pub fn has_failed(&self) -> bool {
        self.state
            .lock()
            .map(|state| matches!(*state, LazyState::Failed))
            .unwrap_or(true)
    }

    fn get(&self) -> Option<Arc<O>> {
        let mut state = self.state.lock().ok()?;
        match &*state {
            LazyState::Ready(oracle) => return Some(Arc::clone(oracle)),
            LazyState::Failed => return None,
            LazyState::Uninitialized => {}
        }

        match (self.init)() {
            Ok(oracle) => {
                tracing::info!("External schedule oracle initialized");
                let oracle = Arc::new(oracle);
                *state = LazyState::Ready(Arc::clone(&oracle));
                Some(oracle)
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "External schedule oracle unavailable, using rule-based extraction only"
                );
                *state = LazyState::Failed;
                None
            }
        }
    }
}

impl<O: ScheduleOracle> ScheduleOracle for LazyOracle<O> {
    fn ready(&self) -> bool {
        self.get().is_some_and(|oracle| oracle.ready())
    }

    fn request(&self, text: &str, today_iso: &str) -> Result<String, ScheduleError> {
        let oracle = self.get().ok_or(ScheduleError::OracleUnavailable)?;
        oracle.request(text, today_iso)
    }
}

/// Mock oracle for testing. Returns a configurable reply and records requests.
pub struct MockOracle {
    ready: bool,
    reply: Result<String, String>,
    requests: Mutex<Vec<(String, String)>>,
}

impl MockOracle {
    pub fn new(reply: &str) -> Self {
        Self {
            ready: true,
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// An oracle whose requests fail with `OracleRequest`.
    pub fn failing(message: &str) -> Self {
        Self {
            ready: true,
            reply: Err(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::new("[]")
        }
    }

    /// (text, today_iso) pairs received so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

impl ScheduleOracle for MockOracle {
    fn ready(&self) -> bool {
        self.ready
    }

    fn request(&self, text: &str, today_iso: &str) -> Result<String, ScheduleError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((text.to_string(), today_iso.to_string()));
        }
        self.reply
            .clone()
            .map_err(ScheduleError::OracleRequest)
    }
}
