/// Last known pointer position in surface space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

impl PointerSample {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Holds the latest pointer sample. Last value wins, nothing is queued.
///
/// Starts at (0, 0) until the first move is observed.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    sample: PointerSample,
    moves: u64,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, x: f32, y: f32) {
        self.sample = PointerSample::new(x, y);
        self.moves += 1;
    }

    pub fn sample(&self) -> PointerSample {
        self.sample
    }

    /// Whether any pointer movement has been observed yet
    pub fn has_moved(&self) -> bool {
        self.moves > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_origin() {
        let tracker = PointerTracker::new();
        assert_eq!(tracker.sample(), PointerSample::new(0.0, 0.0));
        assert!(!tracker.has_moved());
    }

    #[test]
    fn test_last_value_wins() {
        let mut tracker = PointerTracker::new();
        tracker.record(10.0, 20.0);
        tracker.record(30.0, 40.0);
        tracker.record(5.5, 6.5);

        assert_eq!(tracker.sample(), PointerSample::new(5.5, 6.5));
        assert!(tracker.has_moved());
    }
}
