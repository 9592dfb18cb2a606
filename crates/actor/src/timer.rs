use std::fmt;
use std::time::Duration;

use tokio::task::JoinHandle;

/// A pending delayed message, created by [`crate::Actor::send_after`].
///
/// Dropping the timer cancels it, so the owner can simply replace or
/// discard it. A timer that has already delivered its message is inert.
pub struct Timer {
    task: JoinHandle<()>,
    delay: Duration,
}

impl Timer {
    #[inline]
    pub(crate) fn new(task: JoinHandle<()>, delay: Duration) -> Self {
        Self { task, delay }
    }

    /// Returns the delay this timer was armed with.
    #[inline]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns `true` if the timer has fired or has been cancelled.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancels the timer. The message will not be delivered unless it
    /// already was.
    #[inline]
    pub fn cancel(self) {
        // Dropping does the work.
    }
}

impl Drop for Timer {
    #[inline]
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("delay", &self.delay)
            .field("finished", &self.task.is_finished())
            .finish()
    }
}
