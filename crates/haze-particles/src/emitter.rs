//! Emitter configuration (parsed from TOML) and runtime state

use crate::particle::{Particle, ParticleEvent};
use haze_core::{CanvasSize, HazeError, Rect, Result, SimRng, Vec2};
use haze_render::{DrawSurface, Sprite};
use serde::{Deserialize, Serialize};

/// Upper bound on particles per emitter
pub const MAX_PARTICLES: usize = 10_000;
/// Initial age stagger: particle `n` starts `n * STAGGER_MS_PER_SPEED * speed` ms old
pub const STAGGER_MS_PER_SPEED: f64 = 50_000.0;

/// Configuration for one emitter, as written in an `[[emitter]]` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    /// Horizontal anchor as a fraction of the canvas width, in [0, 1]
    pub x_scale: f64,
    /// Vertical anchor as a fraction of the canvas height, in [0, 1]
    pub y_scale: f64,
    /// Pool size, fixed for the emitter's lifetime
    pub particles: usize,
    /// Drift speed in pixels per millisecond
    pub speed: f64,
    /// Group opacity multiplier, in [0, 1]
    pub alpha: f64,
    /// Probability that a dead particle is reborn, in [0, 1]
    pub die_rate: f64,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            x_scale: 0.0,
            y_scale: 0.0,
            particles: 30,
            speed: 0.02,
            alpha: 1.0,
            die_rate: 0.95,
        }
    }
}

impl EmitterConfig {
    pub fn at(x_scale: f64, y_scale: f64) -> Self {
        Self {
            x_scale,
            y_scale,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        HazeError::check_range("x_scale", self.x_scale, 0.0, 1.0)?;
        HazeError::check_range("y_scale", self.y_scale, 0.0, 1.0)?;
        HazeError::check_range("alpha", self.alpha, 0.0, 1.0)?;
        HazeError::check_range("die_rate", self.die_rate, 0.0, 1.0)?;
        HazeError::check_range("speed", self.speed, f64::MIN_POSITIVE, 10.0)?;
        HazeError::check_range(
            "particles",
            self.particles as f64,
            0.0,
            MAX_PARTICLES as f64,
        )?;
        Ok(())
    }
}

/// Emitter parameters particles read (never write) while updating
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterParams {
    /// Anchor in canvas pixels
    pub position: Vec2,
    pub speed: f64,
    pub alpha: f64,
    pub die_rate: f64,
}

/// Per-frame tallies from `Emitter::update`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitterTick {
    pub aged: usize,
    pub reborn: usize,
    pub frozen: usize,
}

/// Runtime state for one emitter: a fixed pool anchored at a canvas position
pub struct Emitter {
    params: EmitterParams,
    sprite: Sprite,
    particles: Vec<Particle>,
}

impl Emitter {
    /// Anchor the emitter on `canvas` and fill its pool with age-staggered particles
    pub fn init(
        config: &EmitterConfig,
        sprite: Sprite,
        canvas: CanvasSize,
        wind: f64,
        rng: &mut SimRng,
    ) -> Result<Self> {
        config.validate()?;
        let params = EmitterParams {
            position: Vec2::new(
                canvas.width as f64 * config.x_scale,
                canvas.height as f64 * config.y_scale,
            ),
            speed: config.speed,
            alpha: config.alpha,
            die_rate: config.die_rate,
        };

        let mut particles = Vec::with_capacity(config.particles);
        for n in 0..config.particles {
            let initial_age = n as f64 * STAGGER_MS_PER_SPEED * params.speed;
            particles.push(Particle::spawn(&params, initial_age, wind, rng)?);
        }

        Ok(Self {
            params,
            sprite,
            particles,
        })
    }

    /// Advance every particle by `elapsed` milliseconds
    pub fn update(&mut self, elapsed: f64, wind: f64, rng: &mut SimRng) -> Result<EmitterTick> {
        let mut tick = EmitterTick::default();
        for p in &mut self.particles {
            match p.update(elapsed, &self.params, wind, rng)? {
                ParticleEvent::Aged => tick.aged += 1,
                ParticleEvent::Reborn => tick.reborn += 1,
                ParticleEvent::Frozen => tick.frozen += 1,
                ParticleEvent::Dormant => {}
            }
        }
        Ok(tick)
    }

    /// Draw every visible particle in pool order. Returns the number drawn.
    pub fn render(&self, surface: &mut dyn DrawSurface, dirty: &mut Rect) -> usize {
        self.particles
            .iter()
            .filter_map(|p| p.render(&self.sprite, surface, dirty))
            .count()
    }

    pub fn params(&self) -> &EmitterParams {
        &self.params
    }

    pub fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Pool size; constant after `init`
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn alive_count(&self) -> usize {
        self.particles.iter().filter(|p| p.is_alive()).count()
    }

    /// Particles that can never come back
    pub fn frozen_count(&self) -> usize {
        self.particles.iter().filter(|p| !p.can_regen).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_render::{RecordingSurface, SurfaceOp};

    fn sprite() -> Sprite {
        Sprite::solid(10, 10, [0, 0, 0, 255])
    }

    #[test]
    fn default_config_is_sane() {
        let config = EmitterConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.die_rate, 0.95);
        assert_eq!(config.particles, 30);
    }

    #[test]
    fn parse_from_toml() {
        let toml_str = r#"
x_scale = 0.15
y_scale = 0.7
particles = 12
alpha = 0.3
"#;
        let config: EmitterConfig = toml::from_str(toml_str).unwrap();
        assert!((config.x_scale - 0.15).abs() < 1e-12);
        assert_eq!(config.particles, 12);
        assert!((config.alpha - 0.3).abs() < 1e-12);
        // Unspecified fields keep their defaults
        assert_eq!(config.speed, 0.02);
    }

    #[test]
    fn out_of_range_scale_is_rejected() {
        let config = EmitterConfig::at(1.5, 0.5);
        assert!(matches!(
            config.validate(),
            Err(HazeError::ValueOutOfRange { .. })
        ));
        let config = EmitterConfig {
            speed: 0.0,
            ..EmitterConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn anchor_is_scaled_canvas_position() {
        let mut rng = SimRng::new(1);
        let emitter = Emitter::init(
            &EmitterConfig::at(0.1, 0.7),
            sprite(),
            CanvasSize::new(940, 300),
            0.01,
            &mut rng,
        )
        .unwrap();
        assert!((emitter.params().position.x - 94.0).abs() < 1e-9);
        assert!((emitter.params().position.y - 210.0).abs() < 1e-9);
    }

    #[test]
    fn pool_ages_are_staggered() {
        let mut rng = SimRng::new(2);
        let emitter = Emitter::init(
            &EmitterConfig::default(),
            sprite(),
            CanvasSize::default(),
            0.01,
            &mut rng,
        )
        .unwrap();
        assert_eq!(emitter.len(), 30);
        for (n, p) in emitter.particles().iter().enumerate() {
            assert!((p.age - n as f64 * 1000.0).abs() < 1e-9);
        }
    }

    #[test]
    fn pool_size_never_changes() {
        let mut rng = SimRng::new(3);
        let config = EmitterConfig {
            die_rate: 0.5,
            ..EmitterConfig::default()
        };
        let mut emitter =
            Emitter::init(&config, sprite(), CanvasSize::default(), 0.01, &mut rng).unwrap();
        for i in 0..5_000 {
            let elapsed = if i % 7 == 0 { 900.0 } else { 16.0 };
            emitter.update(elapsed, 0.01, &mut rng).unwrap();
            assert_eq!(emitter.len(), 30);
        }
        // Half the deaths freeze, so after this long most of the pool is dormant
        assert!(emitter.frozen_count() > 0);
    }

    #[test]
    fn zero_particle_emitter_is_a_no_op() {
        let mut rng = SimRng::new(4);
        let config = EmitterConfig {
            particles: 0,
            ..EmitterConfig::default()
        };
        let mut emitter =
            Emitter::init(&config, sprite(), CanvasSize::default(), 0.01, &mut rng).unwrap();
        assert!(emitter.is_empty());
        assert_eq!(
            emitter.update(16.0, 0.01, &mut rng).unwrap(),
            EmitterTick::default()
        );
        let mut surface = RecordingSurface::new(CanvasSize::default());
        let mut dirty = Rect::EMPTY;
        assert_eq!(emitter.render(&mut surface, &mut dirty), 0);
        assert!(surface.ops().is_empty());
        assert!(dirty.is_empty());
    }

    #[test]
    fn render_order_is_pool_order() {
        let mut rng = SimRng::new(5);
        let mut emitter = Emitter::init(
            &EmitterConfig::default(),
            sprite(),
            CanvasSize::default(),
            0.01,
            &mut rng,
        )
        .unwrap();
        emitter.update(16.0, 0.01, &mut rng).unwrap();

        let mut surface = RecordingSurface::new(CanvasSize::default());
        let mut dirty = Rect::EMPTY;
        let drawn = emitter.render(&mut surface, &mut dirty);

        let expected: Vec<Rect> = emitter
            .particles()
            .iter()
            .filter(|p| p.is_visible())
            .map(|p| p.draw_rect(10, 10))
            .collect();
        let recorded: Vec<Rect> = surface
            .ops()
            .iter()
            .filter_map(SurfaceOp::draw_bounds)
            .collect();
        assert_eq!(drawn, expected.len());
        assert_eq!(recorded, expected);
        for rect in &recorded {
            assert!(dirty.contains(rect));
        }
    }

    /// One particle at the top-left corner, fed 16ms frames for a full lifespan
    #[test]
    fn single_particle_is_reborn_after_its_lifespan() {
        let mut rng = SimRng::new(42);
        let config = EmitterConfig {
            particles: 1,
            die_rate: 1.0,
            ..EmitterConfig::at(0.0, 0.0)
        };
        let mut emitter =
            Emitter::init(&config, sprite(), CanvasSize::new(940, 300), 0.01, &mut rng).unwrap();
        let time_to_die = emitter.particles()[0].time_to_die;

        let mut simulated = 0.0;
        let mut rebirths = 0;
        while simulated < time_to_die {
            let tick = emitter.update(16.0, 0.01, &mut rng).unwrap();
            simulated += 16.0;
            if tick.reborn > 0 {
                rebirths += 1;
                let p = &emitter.particles()[0];
                assert!(p.age < p.time_to_die);
                assert_eq!(p.age, 0.0);
            }
        }
        assert!(rebirths >= 1);
        let p = &emitter.particles()[0];
        assert!(p.age < p.time_to_die);
    }
}
