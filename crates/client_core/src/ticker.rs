//! Periodic "thinking" tick tied to the lifetime of one submission.

use std::time::Duration;

use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

pub const DEFAULT_THINKING_TICK: Duration = Duration::from_millis(400);
pub const MAX_THINKING_DOTS: u8 = 3;

/// Dot count after `dots`, cycling 0..=MAX_THINKING_DOTS.
pub fn next_dots(dots: u8) -> u8 {
    if dots >= MAX_THINKING_DOTS {
        0
    } else {
        dots + 1
    }
}

/// Runs `on_tick` every period until stopped or dropped.
#[must_use = "the ticker stops as soon as it is dropped"]
pub struct ThinkingTicker {
    handle: JoinHandle<()>,
}

impl ThinkingTicker {
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ThinkingTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn dots_cycle_back_after_three() {
        let mut dots = 0;
        let mut seen = Vec::new();
        for _ in 0..5 {
            dots = next_dots(dots);
            seen.push(dots);
        }
        assert_eq!(seen, vec![1, 2, 3, 0, 1]);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_until_dropped() {
        let ticks = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ticks);
        let ticker = ThinkingTicker::spawn(DEFAULT_THINKING_TICK, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::sleep(Duration::from_millis(1_250)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);

        ticker.stop();
        tokio::time::sleep(Duration::from_millis(2_000)).await;
        assert_eq!(ticks.load(Ordering::SeqCst), 3);
    }
}
