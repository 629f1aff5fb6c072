use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Signal emitted by the countdown task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// One second of the countdown elapsed.
    Tick,
    /// The configured duration is exhausted; no further ticks will fire.
    Expired,
}

/// Cancellable one-second countdown for a session.
///
/// Owns the scheduled task; `stop` (or dropping the handle) aborts it.
/// A signal already queued when `stop` runs may still be received by a
/// draining event loop — the session controller treats ticks after
/// completion as no-ops, so that race is harmless. After `stop`, no new
/// signal is ever produced.
#[derive(Debug)]
pub struct SessionTimer {
    handle: JoinHandle<()>,
    signals: UnboundedReceiver<TimerSignal>,
}

impl SessionTimer {
    /// Start a countdown that emits one `Tick` per second, `duration_secs`
    /// times, followed by a single `Expired`.
    ///
    /// Must be called within a tokio runtime.
    #[must_use]
    pub fn start(duration_secs: u32) -> Self {
        let (tx, signals) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run_countdown(duration_secs, tx));
        Self { handle, signals }
    }

    /// Receive the next signal. Returns `None` once the countdown is
    /// exhausted and drained, or stopped.
    pub async fn recv(&mut self) -> Option<TimerSignal> {
        self.signals.recv().await
    }

    /// Non-blocking receive for event loops that poll.
    pub fn try_recv(&mut self) -> Option<TimerSignal> {
        self.signals.try_recv().ok()
    }

    /// Permanently stop the countdown. Idempotent. Completion paths call
    /// this before anything else so no further tick can be produced.
    pub fn stop(&mut self) {
        self.handle.abort();
        self.signals.close();
    }
}

impl Drop for SessionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_countdown(duration_secs: u32, tx: UnboundedSender<TimerSignal>) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first interval tick resolves immediately; consume it so the first
    // emitted Tick lands one second after start.
    interval.tick().await;

    for _ in 0..duration_secs {
        interval.tick().await;
        if tx.send(TimerSignal::Tick).is_err() {
            return;
        }
    }
    let _ = tx.send(TimerSignal::Expired);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn timer_emits_one_tick_per_second_then_expires() {
        let mut timer = SessionTimer::start(3);

        for _ in 0..3 {
            assert_eq!(timer.recv().await, Some(TimerSignal::Tick));
        }
        assert_eq!(timer.recv().await, Some(TimerSignal::Expired));
        assert_eq!(timer.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn stopped_timer_produces_no_further_signals() {
        let mut timer = SessionTimer::start(60);
        assert_eq!(timer.recv().await, Some(TimerSignal::Tick));

        timer.stop();
        // Drain anything that was already in flight when stop ran.
        while timer.try_recv().is_some() {}

        advance(Duration::from_secs(10)).await;
        assert_eq!(timer.try_recv(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent() {
        let mut timer = SessionTimer::start(5);
        timer.stop();
        timer.stop();
        advance(Duration::from_secs(10)).await;
        assert_eq!(timer.recv().await, None);
    }
}
