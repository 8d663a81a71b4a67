use std::time::Instant;

/// Wall-clock source for the raw delta fed into the root clock.
#[derive(Debug, Clone, Default)]
pub struct FrameTimer {
    last: Option<Instant>,
}

impl FrameTimer {
    #[inline]
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Seconds since the previous call; 0 on the first call.
    pub fn next_delta(&mut self) -> f32 {
        let now = Instant::now();
        let dt = match self.last {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);

        if !dt.is_finite() || dt < 0.0 {
            return 0.0;
        }
        dt
    }

    /// Restarts measurement, e.g. after a long stall in window creation.
    #[inline]
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_delta_is_zero_then_non_negative() {
        let mut t = FrameTimer::new();
        assert_eq!(t.next_delta(), 0.0);
        assert!(t.next_delta() >= 0.0);
        t.reset();
        assert_eq!(t.next_delta(), 0.0);
    }
}
