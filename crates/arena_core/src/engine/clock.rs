//! Monotonic simulation clock with a fixed tick delta.

#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    time: f32,
    tick: u64,
    dt: f32,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self { time: 0.0, tick: 0, dt }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
        self.time += self.dt;
    }

    /// Absolute simulation time in seconds.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn dt(&self) -> f32 {
        self.dt
    }
}
