//! Count-down / count-up round timer.
//!
//! [`Timer`] is the plain state machine, advanced one second per [`Timer::tick`].
//! [`TimerDriver`] owns a timer behind a mutex and runs the one-second tick on
//! the tokio runtime, cancelling and restarting it whenever the timer is
//! paused, resumed or reset.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

pub const TICK: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CountDirection {
    Up,
    Down,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Paused or already ended
    Ignored,
    Ticked(u32),
    /// The countdown reached zero on this tick
    Ended,
}

pub type TimeoutCallback = Box<dyn FnMut() + Send + 'static>;

pub struct Timer {
    seconds: u32,
    direction: CountDirection,
    paused: bool,
    ended: bool,
    epoch: u64,
    on_timeout: Option<TimeoutCallback>,
}

impl Timer {
    /// A countdown from `duration` seconds, or a stopwatch when `None`
    pub fn new(duration: Option<u32>) -> Self {
        Timer {
            seconds: duration.unwrap_or(0),
            direction: direction_for(duration),
            paused: false,
            ended: false,
            epoch: 0,
            on_timeout: None,
        }
    }

    pub fn countdown(seconds: u32) -> Self {
        Timer::new(Some(seconds))
    }

    pub fn stopwatch() -> Self {
        Timer::new(None)
    }

    /// Called once when a countdown reaches zero
    pub fn on_timeout<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_timeout = Some(Box::new(callback));
    }

    pub fn seconds(&self) -> u32 {
        self.seconds
    }

    pub fn direction(&self) -> CountDirection {
        self.direction
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_running(&self) -> bool {
        !self.paused && !self.ended
    }

    /// Bumped on every reset and on every actual pause or resume
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TimerEvent {
        if !self.is_running() {
            return TimerEvent::Ignored;
        }

        match self.direction {
            CountDirection::Up => {
                self.seconds = self.seconds.saturating_add(1);
                TimerEvent::Ticked(self.seconds)
            }
            CountDirection::Down => {
                self.seconds = self.seconds.saturating_sub(1);
                if self.seconds > 0 {
                    return TimerEvent::Ticked(self.seconds);
                }
                self.ended = true;
                if let Some(callback) = self.on_timeout.as_mut() {
                    callback();
                }
                TimerEvent::Ended
            }
        }
    }

    /// Returns `false` when the timer was already paused
    pub fn pause(&mut self) -> bool {
        if self.paused {
            return false;
        }
        self.paused = true;
        self.epoch += 1;
        true
    }

    /// Returns `false` when the timer was not paused
    pub fn resume(&mut self) -> bool {
        if !self.paused {
            return false;
        }
        self.paused = false;
        self.epoch += 1;
        true
    }

    /// Start over with a new duration. The displayed value changes right away,
    /// even while paused.
    pub fn reset(&mut self, duration: Option<u32>) {
        self.seconds = duration.unwrap_or(0);
        self.direction = direction_for(duration);
        self.ended = false;
        self.epoch += 1;
    }
}

fn direction_for(duration: Option<u32>) -> CountDirection {
    match duration {
        Some(_) => CountDirection::Down,
        None => CountDirection::Up,
    }
}

impl fmt::Display for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:02}", self.seconds / 60, self.seconds % 60)
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("seconds", &self.seconds)
            .field("direction", &self.direction)
            .field("paused", &self.paused)
            .field("ended", &self.ended)
            .field("epoch", &self.epoch)
            .field("on_timeout", &self.on_timeout.is_some())
            .finish()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::stopwatch()
    }
}

pub type SharedTimer = Arc<Mutex<Timer>>;

/// Runs the one-second tick for a timer. At most one tick task is alive at a
/// time, and it is aborted when the driver is dropped.
pub struct TimerDriver {
    timer: SharedTimer,
    ticker: Option<JoinHandle<()>>,
}

impl TimerDriver {
    pub fn new(timer: Timer) -> Self {
        TimerDriver {
            timer: Arc::new(Mutex::new(timer)),
            ticker: None,
        }
    }

    /// Start ticking. Needs a tokio runtime.
    pub async fn start(&mut self) {
        self.restart().await;
    }

    pub fn timer(&self) -> SharedTimer {
        Arc::clone(&self.timer)
    }

    pub async fn display(&self) -> String {
        self.timer.lock().await.to_string()
    }

    pub async fn seconds(&self) -> u32 {
        self.timer.lock().await.seconds()
    }

    pub async fn is_ended(&self) -> bool {
        self.timer.lock().await.is_ended()
    }

    pub async fn on_timeout<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.timer.lock().await.on_timeout(callback);
    }

    /// Stop the tick. A no-op on a paused timer.
    pub async fn pause(&mut self) {
        if self.timer.lock().await.pause() {
            self.cancel();
        }
    }

    /// Restart the tick of a paused timer. A running timer keeps its
    /// pending tick.
    pub async fn resume(&mut self) {
        let resumed = self.timer.lock().await.resume();
        if resumed {
            self.restart().await;
        }
    }

    pub async fn reset(&mut self, duration: Option<u32>) {
        self.cancel();
        self.timer.lock().await.reset(duration);
        self.restart().await;
    }

    fn cancel(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }

    async fn restart(&mut self) {
        self.cancel();
        let epoch = {
            let timer = self.timer.lock().await;
            if !timer.is_running() {
                return;
            }
            timer.epoch()
        };
        self.ticker = Some(tokio::spawn(run_ticker(Arc::clone(&self.timer), epoch)));
    }
}

impl Drop for TimerDriver {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for TimerDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerDriver")
            .field("ticking", &self.ticker.is_some())
            .finish()
    }
}

async fn run_ticker(timer: SharedTimer, epoch: u64) {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    loop {
        interval.tick().await;
        let mut timer = timer.lock().await;
        if timer.epoch() != epoch {
            tracing::debug!(epoch, current = timer.epoch(), "dropping stale tick");
            break;
        }
        match timer.tick() {
            TimerEvent::Ticked(seconds) => tracing::trace!(seconds, "tick"),
            TimerEvent::Ended => {
                tracing::info!("timer ran out");
                break;
            }
            TimerEvent::Ignored => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_timer(seconds: u32) -> (Timer, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut timer = Timer::countdown(seconds);
        let counter = Arc::clone(&fired);
        timer.on_timeout(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (timer, fired)
    }

    #[test]
    fn test_display_format() {
        assert_eq!(Timer::countdown(0).to_string(), "0:00");
        assert_eq!(Timer::countdown(65).to_string(), "1:05");
        assert_eq!(Timer::countdown(600).to_string(), "10:00");
    }

    #[test]
    fn test_countdown_ends_once() {
        let (mut timer, fired) = counting_timer(5);
        for expected in (1..5).rev() {
            assert_eq!(timer.tick(), TimerEvent::Ticked(expected));
        }
        assert_eq!(timer.tick(), TimerEvent::Ended);
        assert_eq!(timer.to_string(), "0:00");
        assert_eq!(timer.tick(), TimerEvent::Ignored);
        assert_eq!(timer.tick(), TimerEvent::Ignored);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stopwatch_counts_up() {
        let mut timer = Timer::stopwatch();
        for _ in 0..61 {
            timer.tick();
        }
        assert_eq!(timer.direction(), CountDirection::Up);
        assert_eq!(timer.to_string(), "1:01");
        assert!(!timer.is_ended());
    }

    #[test]
    fn test_pause_freezes_value() {
        let mut timer = Timer::countdown(10);
        timer.tick();
        timer.pause();
        assert_eq!(timer.tick(), TimerEvent::Ignored);
        assert_eq!(timer.seconds(), 9);
        timer.resume();
        assert_eq!(timer.tick(), TimerEvent::Ticked(8));
    }

    #[test]
    fn test_repeated_pause_and_resume_keep_epoch() {
        let mut timer = Timer::countdown(10);
        let epoch = timer.epoch();
        assert!(!timer.resume());
        assert_eq!(timer.epoch(), epoch);

        assert!(timer.pause());
        let paused_epoch = timer.epoch();
        assert!(!timer.pause());
        assert_eq!(timer.epoch(), paused_epoch);
        assert!(timer.is_paused());

        assert!(timer.resume());
        assert!(timer.is_running());
    }

    #[test]
    fn test_reset_while_paused_updates_display() {
        let mut timer = Timer::countdown(10);
        timer.pause();
        timer.reset(Some(90));
        assert_eq!(timer.to_string(), "1:30");
        assert!(timer.is_paused());
        assert_eq!(timer.tick(), TimerEvent::Ignored);
    }

    #[test]
    fn test_reset_after_end_runs_again() {
        let (mut timer, fired) = counting_timer(1);
        assert_eq!(timer.tick(), TimerEvent::Ended);
        timer.reset(Some(2));
        assert!(timer.is_running());
        assert_eq!(timer.tick(), TimerEvent::Ticked(1));
        assert_eq!(timer.tick(), TimerEvent::Ended);
        assert_eq!(fired.load(Ordering::SeqCst), 2);

        timer.reset(None);
        assert_eq!(timer.direction(), CountDirection::Up);
        assert_eq!(timer.tick(), TimerEvent::Ticked(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_five_second_countdown() {
        let (timer, fired) = counting_timer(5);
        let mut driver = TimerDriver::new(timer);
        driver.start().await;

        tokio::time::sleep(Duration::from_millis(4500)).await;
        assert_eq!(driver.display().await, "0:01");
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(driver.is_ended().await);
        assert_eq!(driver.display().await, "0:00");
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_pause_and_resume() {
        let (timer, fired) = counting_timer(5);
        let mut driver = TimerDriver::new(timer);
        driver.start().await;

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(driver.seconds().await, 3);

        driver.pause().await;
        tokio::time::sleep(Duration::from_secs(100)).await;
        assert_eq!(driver.seconds().await, 3);

        driver.resume().await;
        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(driver.seconds().await, 1);
        assert!(!driver.is_ended().await);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(driver.is_ended().await);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_resume_while_running_keeps_tick() {
        let (timer, fired) = counting_timer(3);
        let mut driver = TimerDriver::new(timer);
        driver.start().await;

        for _ in 0..3 {
            tokio::time::sleep(Duration::from_millis(900)).await;
            driver.resume().await;
        }
        // 2.7s elapsed: ticks at 1s and 2s still happened
        assert_eq!(driver.seconds().await, 1);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(driver.is_ended().await);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_pause_twice_then_resume_once() {
        let (timer, fired) = counting_timer(3);
        let mut driver = TimerDriver::new(timer);
        driver.start().await;

        tokio::time::sleep(Duration::from_millis(1500)).await;
        driver.pause().await;
        driver.pause().await;
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert_eq!(driver.seconds().await, 2);

        driver.resume().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(driver.seconds().await, 1);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(driver.is_ended().await);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_driver_reset_restarts_tick() {
        let mut driver = TimerDriver::new(Timer::countdown(1));
        driver.start().await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(driver.is_ended().await);

        driver.reset(None).await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(driver.display().await, "0:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_driver_stops_tick() {
        let mut driver = TimerDriver::new(Timer::stopwatch());
        driver.start().await;
        tokio::time::sleep(Duration::from_millis(2500)).await;

        let timer = driver.timer();
        drop(driver);
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(timer.lock().await.seconds(), 2);
    }
}
