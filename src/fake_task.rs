//! Simulated long-running task that reports randomized progress.
//!
//! [`FakeTask::start`] spawns a worker thread that adds a random increment to
//! its progress, hands the value to the UI loop and sleeps for a random
//! pause, until it reaches 100. The worker never touches any widget: values
//! travel through a channel and come back into the Bubble Tea update loop as
//! [`ProgressPostedMsg`], where the application applies them.
//!
//! ```rust,no_run
//! use bubbletea_rs::{Cmd, Msg};
//! use circle_progress::circle::Model as CircleProgress;
//! use circle_progress::fake_task::{FakeTask, ProgressPostedMsg};
//!
//! fn on_msg(ring: &mut CircleProgress, task: &FakeTask, msg: Msg) -> Option<Cmd> {
//!     if let Some(posted) = msg.downcast_ref::<ProgressPostedMsg>() {
//!         // Applied on the UI loop, then wait for the next value
//!         let frame = ring.set_progress(posted.progress);
//!         return Some(bubbletea_rs::batch(vec![frame, task.listen()]));
//!     }
//!     ring.update(msg)
//! }
//! ```

use crate::geometry::MAX_PROGRESS;
use bubbletea_rs::{Cmd, Msg};
use rand::Rng;
use std::ops::Range;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Range the random progress increment is drawn from.
pub const INCREMENT_RANGE: Range<i32> = 1..5;

/// Range of the pause between two updates, in milliseconds.
pub const PAUSE_RANGE_MS: Range<u64> = 100..137;

/// A progress value produced by the worker, delivered on the UI loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressPostedMsg {
    /// New progress, in `1..=100`.
    pub progress: i32,
}

/// Drives a worker thread that fakes progress updates.
#[derive(Debug)]
pub struct FakeTask {
    pause_ms: Range<u64>,
    worker: Option<JoinHandle<()>>,
    receiver: Option<Arc<Mutex<UnboundedReceiver<i32>>>>,
}

impl Default for FakeTask {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTask {
    /// A task pausing [`PAUSE_RANGE_MS`] between updates.
    pub fn new() -> Self {
        Self::with_pause(PAUSE_RANGE_MS)
    }

    /// A task pausing a random number of milliseconds in `pause_ms` between updates.
    pub fn with_pause(pause_ms: Range<u64>) -> Self {
        Self {
            pause_ms,
            worker: None,
            receiver: None,
        }
    }

    /// True while the worker thread is alive.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Starts the worker and returns the command waiting for its first value.
    ///
    /// Returns `None` without doing anything when a worker is still running.
    pub fn start(&mut self) -> Option<Cmd> {
        if self.is_running() {
            debug!("fake task already running");
            return None;
        }

        let (sender, receiver) = mpsc::unbounded_channel();
        let pause_ms = self.pause_ms.clone();
        self.worker = Some(thread::spawn(move || {
            run_worker(&sender, pause_ms, &mut rand::thread_rng())
        }));
        self.receiver = Some(Arc::new(Mutex::new(receiver)));
        info!("fake task started");

        Some(self.listen())
    }

    /// Command yielding the next [`ProgressPostedMsg`].
    ///
    /// Yields no message once the worker has finished and every value was
    /// delivered, or when the task was never started.
    pub fn listen(&self) -> Cmd {
        let receiver = self.receiver.clone();
        Box::pin(async move {
            let receiver = receiver?;
            let progress = receiver.lock().await.recv().await?;
            Some(Box::new(ProgressPostedMsg { progress }) as Msg)
        })
    }
}

/// Next progress value: `current` plus a random increment, capped at 100.
pub fn next_progress<R: Rng>(current: i32, rng: &mut R) -> i32 {
    (current + rng.gen_range(INCREMENT_RANGE)).min(MAX_PROGRESS)
}

/// Random pause drawn from `pause_ms`; an empty range means no pause.
pub fn next_pause<R: Rng>(pause_ms: &Range<u64>, rng: &mut R) -> Duration {
    if pause_ms.is_empty() {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.gen_range(pause_ms.clone()))
}

fn run_worker<R: Rng>(sender: &UnboundedSender<i32>, pause_ms: Range<u64>, rng: &mut R) {
    let mut progress = 0;
    loop {
        progress = next_progress(progress, rng);
        if sender.send(progress).is_err() {
            debug!("progress receiver dropped, stopping fake task");
            return;
        }
        thread::sleep(next_pause(&pause_ms, rng));
        if progress == MAX_PROGRESS {
            break;
        }
    }
    info!("fake task finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_next_progress_increments_within_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for current in 0..100 {
            let next = next_progress(current, &mut rng);
            let step = next - current;
            assert!(next <= 100);
            assert!(step >= 1 || next == 100);
            assert!(step < 5);
        }
    }

    #[test]
    fn test_next_progress_caps_at_full() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(next_progress(99, &mut rng), 100);
        assert_eq!(next_progress(100, &mut rng), 100);
    }

    #[test]
    fn test_next_pause_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let pause = next_pause(&PAUSE_RANGE_MS, &mut rng);
            assert!(pause >= Duration::from_millis(100));
            assert!(pause < Duration::from_millis(137));
        }
        assert_eq!(next_pause(&(0..0), &mut rng), Duration::ZERO);
    }

    #[test]
    fn test_worker_reaches_full_progress() {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let mut rng = StdRng::seed_from_u64(42);
        run_worker(&sender, 0..0, &mut rng);
        drop(sender);

        let mut values = Vec::new();
        while let Ok(value) = receiver.try_recv() {
            values.push(value);
        }

        assert_eq!(values.last(), Some(&100));
        assert!(values.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(values.iter().filter(|&&v| v == 100).count(), 1);
    }

    #[test]
    fn test_worker_stops_when_receiver_dropped() {
        let (sender, receiver) = mpsc::unbounded_channel();
        drop(receiver);
        let mut rng = StdRng::seed_from_u64(42);
        // Returns instead of looping forever
        run_worker(&sender, 0..0, &mut rng);
    }

    #[tokio::test]
    async fn test_listen_before_start_yields_nothing() {
        let task = FakeTask::new();
        assert!(!task.is_running());
        assert!(task.listen().await.is_none());
    }

    #[tokio::test]
    async fn test_start_streams_progress_to_completion() {
        let mut task = FakeTask::with_pause(0..0);
        let first = task.start().expect("first start runs");

        let msg = first.await.expect("a value");
        let posted = msg.downcast_ref::<ProgressPostedMsg>().unwrap();
        assert!((1..5).contains(&posted.progress));

        let mut last = posted.progress;
        while let Some(msg) = task.listen().await {
            let posted = msg.downcast_ref::<ProgressPostedMsg>().unwrap();
            assert!(posted.progress > last);
            last = posted.progress;
        }
        assert_eq!(last, 100);
    }

    #[tokio::test]
    async fn test_second_start_is_refused_while_running() {
        let mut task = FakeTask::with_pause(200..201);
        assert!(task.start().is_some());
        assert!(task.is_running());
        assert!(task.start().is_none());
    }
}
