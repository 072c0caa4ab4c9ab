//! Lightweight xorshift32 PRNG shared by the simulation and the tween bench

/// Seeded pseudo-random source. The same seed always yields the same sequence.
#[derive(Debug, Clone)]
pub struct SimRng {
    state: u32,
}

impl SimRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Seed derived from the wall clock, for non-replayable runs
    pub fn from_time() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0xDEAD_BEEF);
        Self::new(nanos)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Returns a float in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        self.next_u32() as f64 / (u32::MAX as f64 + 1.0)
    }

    /// Returns a float in [min, max)
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns `floor(next * n)`, an integer-valued float in [0, n)
    pub fn below(&mut self, n: f64) -> f64 {
        (self.next_f64() * n).floor()
    }
}
