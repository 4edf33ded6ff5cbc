use std::time::{Duration, Instant};

/// Frame rate limits accepted from the command line
pub const MIN_FPS: u32 = 1;
pub const MAX_FPS: u32 = 240;

/// The single frame the scheduler has queued
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingFrame {
    pub id: u64,
    pub due: Instant,
}

/// Drives one simulate+render cycle per display frame.
///
/// Holds at most one pending frame. `fire` hands out a due frame and queues the next one
/// before the caller does the work; `stop` drops whatever is queued.
#[derive(Debug)]
pub struct FrameScheduler {
    interval: Duration,
    pending: Option<PendingFrame>,
    next_id: u64,
    frames_run: u64,
}

impl FrameScheduler {
    pub fn new(fps: u32) -> Self {
        let fps = fps.clamp(MIN_FPS, MAX_FPS);
        Self {
            interval: Duration::from_nanos(1_000_000_000 / fps as u64),
            pending: None,
            next_id: 0,
            frames_run: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    #[cfg(test)]
    pub fn pending(&self) -> Option<PendingFrame> {
        self.pending
    }

    pub fn frames_run(&self) -> u64 {
        self.frames_run
    }

    fn schedule(&mut self, due: Instant) {
        self.next_id += 1;
        self.pending = Some(PendingFrame {
            id: self.next_id,
            due,
        });
    }

    /// Begin producing frames; the first one is due immediately. No-op while running.
    pub fn start(&mut self, now: Instant) {
        if self.is_running() {
            return;
        }
        self.schedule(now);
        log::debug!("frame scheduler started at {:?} per frame", self.interval);
    }

    /// Cancel the pending frame. Safe to call any number of times.
    pub fn stop(&mut self) {
        if let Some(frame) = self.pending.take() {
            log::debug!("frame scheduler stopped, dropped frame {}", frame.id);
        }
    }

    /// How long until the pending frame is due, or None when stopped
    pub fn time_until_next(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|frame| frame.due.saturating_duration_since(now))
    }

    /// If the pending frame is due, queue the following one and return the due frame
    pub fn fire(&mut self, now: Instant) -> Option<PendingFrame> {
        let frame = self.pending?;
        if frame.due > now {
            return None;
        }

        // Keep a steady cadence, but don't try to catch up after a stall
        let mut next = frame.due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.schedule(next);
        self.frames_run += 1;
        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_stopped() {
        let scheduler = FrameScheduler::new(60);
        assert!(!scheduler.is_running());
        assert_eq!(scheduler.time_until_next(Instant::now()), None);
    }

    #[test]
    fn test_first_frame_due_immediately() {
        let now = Instant::now();
        let mut scheduler = FrameScheduler::new(60);
        scheduler.start(now);

        assert_eq!(scheduler.time_until_next(now), Some(Duration::ZERO));
        let frame = scheduler.fire(now).unwrap();
        assert_eq!(frame.due, now);
        assert_eq!(scheduler.frames_run(), 1);
    }

    #[test]
    fn test_fire_queues_next_frame() {
        let now = Instant::now();
        let mut scheduler = FrameScheduler::new(50);
        scheduler.start(now);
        scheduler.fire(now).unwrap();

        let pending = scheduler.pending().unwrap();
        assert_eq!(pending.due, now + Duration::from_millis(20));
        assert!(scheduler.fire(now + Duration::from_millis(10)).is_none());
        assert!(scheduler.fire(now + Duration::from_millis(20)).is_some());
    }

    #[test]
    fn test_no_catch_up_after_stall() {
        let now = Instant::now();
        let mut scheduler = FrameScheduler::new(50);
        scheduler.start(now);
        scheduler.fire(now).unwrap();

        let late = now + Duration::from_millis(500);
        assert!(scheduler.fire(late).is_some());
        assert!(scheduler.fire(late).is_none());
        assert_eq!(scheduler.pending().unwrap().due, late + Duration::from_millis(20));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let now = Instant::now();
        let mut scheduler = FrameScheduler::new(60);

        scheduler.stop();
        scheduler.start(now);
        scheduler.stop();
        scheduler.stop();

        assert!(!scheduler.is_running());
        assert!(scheduler.fire(now + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_start_while_running_keeps_pending_frame() {
        let now = Instant::now();
        let mut scheduler = FrameScheduler::new(60);
        scheduler.start(now);
        let first = scheduler.pending().unwrap();

        scheduler.start(now + Duration::from_secs(1));
        assert_eq!(scheduler.pending(), Some(first));
    }

    #[test]
    fn test_fps_clamped() {
        assert_eq!(FrameScheduler::new(0).interval(), Duration::from_secs(1));
        assert_eq!(
            FrameScheduler::new(10_000).interval(),
            Duration::from_nanos(1_000_000_000 / 240)
        );
    }
}
