/// What a frame callback wants next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reschedule {
    Again,
    Stop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickerState {
    Idle,
    Scheduled,
    Disposed,
}

/// A cancellable per-frame task.
///
/// Each scheduled frame fires at most once. A callback keeps the task alive
/// by returning [`Reschedule::Again`]. Once cancelled the ticker stays
/// disposed: nothing fires and nothing can schedule it again.
#[derive(Debug)]
pub struct FrameTicker {
    state: TickerState,
    fired: u64,
}

impl FrameTicker {
    pub fn new() -> Self {
        Self {
            state: TickerState::Idle,
            fired: 0,
        }
    }

    pub fn state(&self) -> TickerState {
        self.state
    }

    pub fn is_scheduled(&self) -> bool {
        self.state == TickerState::Scheduled
    }

    /// Number of frames that actually ran a callback.
    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Returns false if the ticker was already disposed.
    pub fn schedule(&mut self) -> bool {
        match self.state {
            TickerState::Disposed => false,
            _ => {
                self.state = TickerState::Scheduled;
                true
            }
        }
    }

    /// Runs `frame` if a frame is scheduled. Returns whether it ran.
    pub fn fire<F>(&mut self, frame: F) -> bool
    where
        F: FnOnce() -> Reschedule,
    {
        if self.state != TickerState::Scheduled {
            return false;
        }
        self.state = TickerState::Idle;
        self.fired += 1;
        if frame() == Reschedule::Again {
            self.state = TickerState::Scheduled;
        }
        true
    }

    /// Tears the task down. True only on the first call.
    pub fn cancel(&mut self) -> bool {
        if self.state == TickerState::Disposed {
            return false;
        }
        self.state = TickerState::Disposed;
        true
    }
}

impl Default for FrameTicker {
    fn default() -> Self {
        Self::new()
    }
}

/// Gates simulation steps to a minimum interval while rendering continues
/// every frame.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval_ms: Option<u64>,
    last_ms: Option<u64>,
}

impl Throttle {
    /// `None` lets every frame through.
    pub fn new(interval_ms: Option<u64>) -> Self {
        Self {
            interval_ms,
            last_ms: None,
        }
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    pub fn ready(&mut self, now_ms: u64) -> bool {
        let due = match (self.interval_ms, self.last_ms) {
            (None, _) | (_, None) => true,
            (Some(interval), Some(last)) => now_ms.saturating_sub(last) >= interval,
        };
        if due {
            self.last_ms = Some(now_ms);
        }
        due
    }

    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_when_scheduled() {
        let mut t = FrameTicker::new();
        assert!(!t.fire(|| Reschedule::Again));
        assert!(t.schedule());
        assert!(t.fire(|| Reschedule::Again));
        assert!(t.fire(|| Reschedule::Stop));
        assert!(!t.fire(|| Reschedule::Again));
        assert_eq!(t.fired(), 2);
    }

    #[test]
    fn cancel_is_once_and_final() {
        let mut t = FrameTicker::new();
        t.schedule();
        assert!(t.cancel());
        assert!(!t.cancel());
        assert!(!t.schedule());
        let mut ran = false;
        assert!(!t.fire(|| {
            ran = true;
            Reschedule::Again
        }));
        assert!(!ran);
        assert_eq!(t.state(), TickerState::Disposed);
    }

    #[test]
    fn throttle_waits_for_interval() {
        let mut th = Throttle::new(Some(100));
        assert!(th.ready(0));
        assert!(!th.ready(50));
        assert!(!th.ready(99));
        assert!(th.ready(100));
        assert!(!th.ready(150));
        assert!(th.ready(230));
    }

    #[test]
    fn unthrottled_always_ready() {
        let mut th = Throttle::new(None);
        assert!(th.ready(0));
        assert!(th.ready(0));
        assert!(th.ready(1));
    }
}
