#![forbid(unsafe_code)]

//! Scheduler wakeups.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Auto-resetting wakeup flag for the frame scheduler.
///
/// Any number of [`FrameWaker::wake`] calls between two waits collapse into a
/// single wakeup.
#[derive(Clone, Default)]
pub struct FrameWaker {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl FrameWaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn wake(&self) {
        let (lock, cvar) = &*self.inner;
        *lock.lock().unwrap_or_else(PoisonError::into_inner) = true;
        cvar.notify_one();
    }

    /// Block until woken or `timeout` elapses, then clear the flag.
    ///
    /// Returns `true` if woken.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (lock, cvar) = &*self.inner;
        let deadline = Instant::now() + timeout;
        let mut woken = lock.lock().unwrap_or_else(PoisonError::into_inner);
        while !*woken {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            woken = cvar
                .wait_timeout(woken, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        *woken = false;
        true
    }
}

impl std::fmt::Debug for FrameWaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FrameWaker")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wakes_collapse() {
        let waker = FrameWaker::new();
        waker.wake();
        waker.wake();
        assert!(waker.wait_timeout(Duration::from_secs(5)));
        assert!(!waker.wait_timeout(Duration::from_millis(5)));
    }

    #[test]
    fn wake_from_other_thread() {
        let waker = FrameWaker::new();
        let remote = waker.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(10));
            remote.wake();
        });
        assert!(waker.wait_timeout(Duration::from_secs(30)));
        handle.join().unwrap();
    }
}
