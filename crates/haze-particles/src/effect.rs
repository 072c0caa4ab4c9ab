//! The smoke effect as a runtime system

use crate::config::EffectConfig;
use crate::emitter::{Emitter, EmitterConfig};
use haze_core::Result;
use haze_render::Sprite;
use haze_runtime::{Frame, RuntimeSystem, SimContext, SystemStats};

/// Every emitter of one effect, sharing a single sprite.
///
/// Emitters are built in config order during `initialize`, and each frame
/// updates then draws them in that same order.
pub struct SmokeEffect {
    configs: Vec<EmitterConfig>,
    sprite: Sprite,
    emitters: Vec<Emitter>,
    last_drawn: usize,
}

impl SmokeEffect {
    pub fn new(configs: Vec<EmitterConfig>, sprite: Sprite) -> Self {
        Self {
            configs,
            sprite,
            emitters: Vec::new(),
            last_drawn: 0,
        }
    }

    pub fn from_config(config: &EffectConfig, sprite: Sprite) -> Self {
        Self::new(config.emitters.clone(), sprite)
    }

    pub fn emitters(&self) -> &[Emitter] {
        &self.emitters
    }

    pub fn particle_count(&self) -> usize {
        self.emitters.iter().map(Emitter::len).sum()
    }

    pub fn alive_count(&self) -> usize {
        self.emitters.iter().map(Emitter::alive_count).sum()
    }

    /// Particles drawn during the most recent frame
    pub fn last_drawn(&self) -> usize {
        self.last_drawn
    }
}

impl RuntimeSystem for SmokeEffect {
    fn initialize(&mut self, sim: &mut SimContext) -> Result<()> {
        let wind = sim.wind.velocity();
        self.emitters = self
            .configs
            .iter()
            .map(|config| Emitter::init(config, self.sprite.clone(), sim.canvas, wind, &mut sim.rng))
            .collect::<Result<Vec<_>>>()?;
        log::info!(
            "[smoke] {} emitter(s), {} particle(s) on {}x{}",
            self.emitters.len(),
            self.particle_count(),
            sim.canvas.width,
            sim.canvas.height
        );
        Ok(())
    }

    fn frame(&mut self, frame: &mut Frame<'_>) -> Result<()> {
        let wind = frame.sim.wind.velocity();
        let mut drawn = 0;
        for emitter in &mut self.emitters {
            let tick = emitter.update(frame.elapsed_ms, wind, &mut frame.sim.rng)?;
            if tick.frozen > 0 {
                log::debug!("[smoke] {} particle(s) froze", tick.frozen);
            }
            drawn += emitter.render(&mut *frame.surface, &mut *frame.dirty);
        }
        frame.draws += drawn;
        self.last_drawn = drawn;
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.emitters.clear();
        Ok(())
    }

    fn name(&self) -> &str {
        "smoke"
    }

    fn stats(&self) -> SystemStats {
        SystemStats {
            total: self.particle_count(),
            active: self.alive_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::{CanvasSize, Rect, SimRng};
    use haze_render::{RecordingSurface, SurfaceOp};
    use haze_runtime::{FrameClock, RenderLoop};

    fn smoke_loop(seed: u32) -> RenderLoop<RecordingSurface> {
        let config = EffectConfig::reference();
        let canvas = CanvasSize::default();
        let mut lp = RenderLoop::new(
            RecordingSurface::new(canvas),
            SimContext::new(canvas, SimRng::new(seed)),
            FrameClock::fixed_step(16.0),
        )
        .unwrap();
        let sprite = Sprite::solid(20, 20, [0, 0, 0, 255]);
        lp.add_system(Box::new(SmokeEffect::from_config(&config, sprite)))
            .unwrap();
        lp.start().unwrap();
        lp
    }

    #[test]
    fn initialize_builds_emitters_in_order() {
        let mut sim = SimContext::new(CanvasSize::default(), SimRng::new(1));
        let mut effect = SmokeEffect::from_config(
            &EffectConfig::reference(),
            Sprite::solid(4, 4, [0, 0, 0, 255]),
        );
        effect.initialize(&mut sim).unwrap();
        let xs: Vec<f64> = effect
            .emitters()
            .iter()
            .map(|e| e.params().position.x)
            .collect();
        assert_eq!(xs.len(), 3);
        assert!((xs[0] - 0.0).abs() < 1e-9);
        assert!((xs[1] - 94.0).abs() < 1e-9);
        assert!((xs[2] - 141.0).abs() < 1e-9);
        assert_eq!(effect.stats().total, 90);
    }

    #[test]
    fn every_draw_lies_inside_the_dirty_region() {
        let mut lp = smoke_loop(11);
        for _ in 0..120 {
            lp.surface_mut().drain();
            let stats = lp.run_frame().unwrap();
            let mut drawn = 0;
            for op in lp.surface().ops() {
                if let Some(bounds) = op.draw_bounds() {
                    assert!(stats.dirty.contains(&bounds));
                    drawn += 1;
                }
            }
            assert_eq!(stats.draws, drawn);
        }
    }

    #[test]
    fn next_frame_clears_previous_dirty_region() {
        let mut lp = smoke_loop(12);
        let mut previous = Rect::EMPTY;
        for i in 0..30 {
            let stats = lp.run_frame().unwrap();
            if i > 0 {
                assert_eq!(stats.cleared, previous);
            }
            previous = stats.dirty;
        }
    }

    #[test]
    fn same_seed_same_frames() {
        let mut a = smoke_loop(77);
        let mut b = smoke_loop(77);
        for _ in 0..60 {
            a.run_frame().unwrap();
            b.run_frame().unwrap();
        }
        assert_eq!(a.surface().ops(), b.surface().ops());
        assert_eq!(a.sim().wind.velocity(), b.sim().wind.velocity());
    }

    #[test]
    fn pool_sizes_survive_many_frames() {
        let mut lp = smoke_loop(5);
        for _ in 0..2_000 {
            lp.step(40.0).unwrap();
        }
        assert_eq!(lp.stats().total, 90);
        assert!(lp.stats().active <= 90);
    }

    #[test]
    fn draws_carry_group_alpha() {
        let mut lp = smoke_loop(3);
        for _ in 0..50 {
            lp.run_frame().unwrap();
        }
        for op in lp.surface().ops() {
            if let SurfaceOp::Draw { alpha, .. } = op {
                assert!(*alpha >= 0.0 && *alpha <= 0.3 + 1e-12);
            }
        }
    }
}
