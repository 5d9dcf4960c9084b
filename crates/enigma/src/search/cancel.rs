use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{EnigmaError, Result};

/// Cooperative stop signal: a shared flag plus an optional deadline.
///
/// Clones share the flag, so a caller can keep one clone and cancel a search
/// running on another thread.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    stop_flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn cancel(&self) {
        self.stop_flag.store(true, Ordering::SeqCst);
    }

    /// Set once the flag was raised or the deadline has passed.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        if self.stop_flag.load(Ordering::Relaxed) {
            return true;
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => {
                self.stop_flag.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(EnigmaError::Cancelled)
        } else {
            Ok(())
        }
    }
}
