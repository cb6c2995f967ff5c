// clock.rs - Simulated time
//
// Driven either by requestAnimationFrame timestamps (milliseconds) or by
// explicit deltas in tests. Time never runs backwards.

#[derive(Debug, Clone, Default)]
pub struct AnimationClock {
    /// Seconds since the clock was created
    now: f64,
    /// Seconds covered by the last advance
    delta: f32,
    last_timestamp: Option<f64>,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to a host frame timestamp in milliseconds. The first frame
    /// only anchors the clock. Stale or non-finite timestamps yield a zero
    /// delta.
    pub fn advance_to(&mut self, timestamp_ms: f64) -> f32 {
        if !timestamp_ms.is_finite() {
            return self.advance_by(0.0);
        }
        let dt = match self.last_timestamp {
            Some(prev) if timestamp_ms > prev => (timestamp_ms - prev) / 1000.0,
            _ => 0.0,
        };
        self.last_timestamp = Some(self.last_timestamp.map_or(timestamp_ms, |p| p.max(timestamp_ms)));
        self.advance_by(dt)
    }

    /// Advance by `dt` seconds. Negative or non-finite deltas count as zero.
    pub fn advance_by(&mut self, dt: f64) -> f32 {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.now += dt;
        self.delta = dt as f32;
        self.delta
    }

    #[inline]
    pub fn now(&self) -> f64 {
        self.now
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta
    }
}
