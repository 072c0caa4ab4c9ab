//! Shared horizontal wind: a bounded random walk advanced once per frame

use haze_core::SimRng;

/// Scalar wind velocity in pixels per millisecond, always within
/// [`WindField::MIN`, `WindField::MAX`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindField {
    velocity: f64,
}

impl WindField {
    pub const MIN: f64 = 0.0;
    pub const MAX: f64 = 0.015;
    pub const INITIAL: f64 = 0.01;
    /// Largest change applied by a single `advance`
    pub const MAX_STEP: f64 = 0.001;

    pub fn new() -> Self {
        Self::with_velocity(Self::INITIAL)
    }

    /// Start from a specific velocity, clamped into range
    pub fn with_velocity(velocity: f64) -> Self {
        let velocity = if velocity.is_finite() {
            velocity.clamp(Self::MIN, Self::MAX)
        } else {
            Self::INITIAL
        };
        Self { velocity }
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// One random-walk step: +/- up to `MAX_STEP`, then clamp
    pub fn advance(&mut self, rng: &mut SimRng) {
        self.velocity += (rng.next_f64() - 0.5) * 2.0 * Self::MAX_STEP;
        self.velocity = self.velocity.clamp(Self::MIN, Self::MAX);
    }
}

impl Default for WindField {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_initial() {
        assert_eq!(WindField::new().velocity(), 0.01);
    }

    #[test]
    fn stays_clamped_over_many_frames() {
        let mut wind = WindField::new();
        let mut rng = SimRng::new(5);
        for _ in 0..100_000 {
            let before = wind.velocity();
            wind.advance(&mut rng);
            let v = wind.velocity();
            assert!((WindField::MIN..=WindField::MAX).contains(&v));
            assert!((v - before).abs() <= WindField::MAX_STEP + 1e-12);
        }
    }

    #[test]
    fn construction_clamps() {
        assert_eq!(WindField::with_velocity(1.0).velocity(), WindField::MAX);
        assert_eq!(WindField::with_velocity(-1.0).velocity(), WindField::MIN);
        assert_eq!(WindField::with_velocity(f64::NAN).velocity(), WindField::INITIAL);
    }
}
