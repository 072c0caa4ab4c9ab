//! Simulation context owned by the render loop

use crate::wind::WindField;
use haze_core::{CanvasSize, SimRng};

/// Process-wide simulation state, passed explicitly into systems.
pub struct SimContext {
    pub canvas: CanvasSize,
    pub wind: WindField,
    pub rng: SimRng,
}

impl SimContext {
    pub fn new(canvas: CanvasSize, rng: SimRng) -> Self {
        Self {
            canvas,
            wind: WindField::new(),
            rng,
        }
    }

    pub fn with_wind(mut self, wind: WindField) -> Self {
        self.wind = wind;
        self
    }
}
