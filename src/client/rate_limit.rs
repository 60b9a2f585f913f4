use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identifies one debounced invocation. Stays current until a newer call or
/// a cancel supersedes it.
#[derive(Debug, Clone)]
pub struct DebounceToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl DebounceToken {
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

/// Runs work only after `delay` has passed without another call.
///
/// Superseded calls never start. Work that already started receives its
/// token so it can drop results that arrive after a newer call.
pub struct Debouncer {
    delay: Duration,
    latest: Arc<AtomicU64>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: Arc::new(AtomicU64::new(0)),
        }
    }

    fn supersede(&self) -> DebounceToken {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        DebounceToken {
            generation,
            latest: self.latest.clone(),
        }
    }

    pub fn call<F, Fut>(&self, work: F) -> JoinHandle<()>
    where
        F: FnOnce(DebounceToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.supersede();
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !token.is_current() {
                log::debug!("Debounced call {} superseded before firing", token.generation);
                return;
            }
            work(token).await;
        })
    }

    /// Invalidates the pending call and any in-flight work.
    pub fn cancel(&self) {
        self.supersede();
    }
}

/// Leading-edge throttle: admits at most one call per `interval`.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Instant>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    pub fn try_acquire(&mut self) -> bool {
        self.try_acquire_at(Instant::now())
    }

    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
