//! Progress reporting for multi-pass algorithms.
//!
//! ```
//! use wingloop::algo::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(0, 2, "Loop subdivision");
//! ```

/// A callback receiving `(current, total, message)` updates.
///
/// `current` counts completed steps, so a run of `total` steps reports
/// `0, 1, ..., total`.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Create a progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// A reporter that forwards every update to the `log` facade at info level.
    pub fn logged() -> Self {
        Self::new(|current, total, message| {
            log::info!("{}: {}/{}", message, current, total);
        })
    }

    /// A reporter that discards all updates.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }

    /// Report progress.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn test_callback_receives_updates() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = Progress::new(move |current, total, message| {
            sink.lock().unwrap().push((current, total, message.to_string()));
        });

        progress.report(1, 3, "step");
        assert_eq!(*seen.lock().unwrap(), vec![(1, 3, "step".to_string())]);
    }

    #[test]
    fn test_none_and_logged_do_not_panic() {
        Progress::none().report(0, 1, "quiet");
        Progress::logged().report(1, 1, "loud");
        assert_eq!(format!("{:?}", Progress::default()), "Progress { .. }");
    }
}
