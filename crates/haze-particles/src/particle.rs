//! A single rising, drifting, fading smoke particle.
//!
//! Life cycle: born with a random trajectory and lifespan, fades in over the
//! first 5% of its life while expanding quickly, then fades out linearly.
//! On death it is either reborn (probability `die_rate`) or frozen for good.

use crate::emitter::EmitterParams;
use haze_core::{HazeError, Rect, Result, SimRng, Vec2};
use haze_render::{DrawSurface, Sprite};

/// Fraction of the lifespan spent fading in
pub const FADE_IN_FRACTION: f64 = 0.05;
/// Scale reached at the end of the fade-in
pub const MAX_START_SCALE: f64 = 0.3;
/// Continuous growth: one unit of scale per this many milliseconds of age
pub const GROWTH_MS: f64 = 4000.0;
/// Floor added to every computed scale
pub const BASE_SCALE: f64 = 0.001;
/// Scale of a freshly (re)born particle
pub const SPAWN_SCALE: f64 = 0.01;
/// Lifespan is `LIFETIME_MIN_MS + floor(U * LIFETIME_SPREAD_MS)`
pub const LIFETIME_MIN_MS: f64 = 20_000.0;
pub const LIFETIME_SPREAD_MS: f64 = 12_000.0;
/// Spawn position jitter: integer offset in [-JITTER, JITTER)
pub const SPAWN_JITTER_PX: f64 = 10.0;

/// Outcome of one `update` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleEvent {
    /// Still alive, moved and re-faded
    Aged,
    /// Died and was reborn with a fresh trajectory
    Reborn,
    /// Died and will never regenerate
    Frozen,
    /// Already frozen; nothing happened
    Dormant,
}

#[derive(Debug, Clone)]
pub struct Particle {
    /// Milliseconds since the last (re)birth
    pub age: f64,
    /// Lifespan in milliseconds
    pub time_to_die: f64,
    pub position: Vec2,
    /// Pixels per millisecond, length equals the emitter speed at (re)birth
    pub velocity: Vec2,
    pub scale: f64,
    /// Fade-in/fade-out opacity before the emitter's alpha is applied, in [0, 1]
    pub fade: f64,
    /// Final opacity used for drawing
    pub alpha: f64,
    pub can_regen: bool,
    /// Set on the frame a particle is reborn; it is not drawn that frame
    reborn: bool,
}

impl Particle {
    /// Create a particle for `params`, pre-aged by `initial_age` milliseconds.
    ///
    /// A positive initial age moves the particle along its trajectory in one
    /// step, so a pool can start out already spread along the plume.
    pub fn spawn(
        params: &EmitterParams,
        initial_age: f64,
        wind: f64,
        rng: &mut SimRng,
    ) -> Result<Self> {
        let mut p = Self {
            age: initial_age.max(0.0),
            time_to_die: 0.0,
            position: params.position,
            velocity: Vec2::ZERO,
            scale: SPAWN_SCALE,
            fade: 0.0,
            alpha: 0.0,
            can_regen: true,
            reborn: false,
        };
        p.start_rand(params, wind, rng)?;
        Ok(p)
    }

    /// Re-roll trajectory, lifespan and spawn point. Keeps the current age.
    pub fn start_rand(&mut self, params: &EmitterParams, wind: f64, rng: &mut SimRng) -> Result<()> {
        // Smoke rises and spreads
        let raw = Vec2::new(rng.range(-0.25, 0.25), -1.5 - rng.next_f64());
        self.time_to_die = LIFETIME_MIN_MS + rng.below(LIFETIME_SPREAD_MS);
        self.velocity = scaled_direction(raw, params.speed)?;

        let jitter_x = rng.below(2.0 * SPAWN_JITTER_PX) - SPAWN_JITTER_PX;
        let jitter_y = rng.below(2.0 * SPAWN_JITTER_PX) - SPAWN_JITTER_PX;
        self.position = params.position + Vec2::new(jitter_x, jitter_y);

        // One-step catch-up for pre-aged particles
        self.position.x += (self.velocity.x + wind) * self.age;
        self.position.y += self.velocity.y * self.age;

        self.scale = SPAWN_SCALE;
        self.fade = 0.0;
        self.alpha = 0.0;
        Ok(())
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.time_to_die
    }

    /// Advance by `elapsed` milliseconds
    pub fn update(
        &mut self,
        elapsed: f64,
        params: &EmitterParams,
        wind: f64,
        rng: &mut SimRng,
    ) -> Result<ParticleEvent> {
        self.reborn = false;
        if !self.can_regen {
            return Ok(ParticleEvent::Dormant);
        }

        self.age += elapsed;
        if !self.is_alive() {
            if rng.next_f64() > params.die_rate {
                self.can_regen = false;
                return Ok(ParticleEvent::Frozen);
            }
            self.age = 0.0;
            self.start_rand(params, wind, rng)?;
            self.reborn = true;
            return Ok(ParticleEvent::Reborn);
        }

        // Fades in and expands rapidly at first
        let fade_in = self.time_to_die * FADE_IN_FRACTION;
        let start_scale;
        if self.age < fade_in {
            self.fade = self.age / fade_in;
            start_scale = self.fade * MAX_START_SCALE;
            // Rises faster while expanding
            self.position.y += self.velocity.y * 2.0 * elapsed;
        } else {
            self.fade = 1.0 - (self.age - fade_in) / (self.time_to_die - fade_in);
            start_scale = MAX_START_SCALE;
            self.position.y += self.velocity.y * elapsed;
        }
        self.position.x += (self.velocity.x + wind) * elapsed;

        self.alpha = self.fade * params.alpha;
        self.scale = BASE_SCALE + start_scale + self.age / GROWTH_MS;
        Ok(ParticleEvent::Aged)
    }

    /// Whether `render` would draw this particle
    pub fn is_visible(&self) -> bool {
        self.is_alive() && self.can_regen && !self.reborn
    }

    /// Pixel-snapped draw rectangle for a sprite of the given native size
    pub fn draw_rect(&self, sprite_width: u32, sprite_height: u32) -> Rect {
        let (x, y, width, height) = self.placement(sprite_width, sprite_height);
        Rect::from_xywh(x, y, width, height)
    }

    /// Snapped origin plus scaled size: `(x, y, width, height)`
    fn placement(&self, sprite_width: u32, sprite_height: u32) -> (f64, f64, f64, f64) {
        let width = sprite_width as f64 * self.scale;
        let height = sprite_height as f64 * self.scale;
        let x = round_half_up(self.position.x - width / 2.0);
        let y = round_half_up(self.position.y + height / 2.0);
        (x, y, width, height)
    }

    /// Draw onto `surface` and grow `dirty` to cover the drawn bounds.
    /// Returns the drawn rectangle, or `None` when nothing was drawn.
    pub fn render(
        &self,
        sprite: &Sprite,
        surface: &mut dyn DrawSurface,
        dirty: &mut Rect,
    ) -> Option<Rect> {
        if !self.is_visible() {
            return None;
        }
        let (x, y, width, height) = self.placement(sprite.width(), sprite.height());
        surface.set_global_alpha(self.alpha);
        surface.draw_image(sprite, x, y, width, height);
        let rect = Rect::from_xywh(x, y, width, height);
        dirty.include(&rect);
        Some(rect)
    }
}

/// Normalize `raw` and scale it to `speed`.
pub(crate) fn scaled_direction(raw: Vec2, speed: f64) -> Result<Vec2> {
    let dir = raw.try_normalized().ok_or_else(|| {
        HazeError::InvalidState(format!(
            "cannot normalize particle direction ({}, {})",
            raw.x, raw.y
        ))
    })?;
    Ok(dir * speed)
}

/// Nearest-integer rounding with halves going up, as canvas hosts round
fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use haze_core::CanvasSize;
    use haze_render::{RecordingSurface, SurfaceOp};

    fn params() -> EmitterParams {
        EmitterParams {
            position: Vec2::new(100.0, 200.0),
            speed: 0.02,
            alpha: 0.3,
            die_rate: 0.95,
        }
    }

    #[test]
    fn spawn_is_invisible_and_small() {
        let mut rng = SimRng::new(1);
        let p = Particle::spawn(&params(), 0.0, 0.01, &mut rng).unwrap();
        assert_eq!(p.alpha, 0.0);
        assert_eq!(p.scale, SPAWN_SCALE);
        assert!(p.can_regen);
        assert!(p.is_alive());
        assert!(p.time_to_die >= LIFETIME_MIN_MS);
        assert!(p.time_to_die < LIFETIME_MIN_MS + LIFETIME_SPREAD_MS);
        assert_eq!(p.time_to_die, p.time_to_die.floor());
        // Jitter keeps the spawn point within the 20px box
        assert!((p.position.x - 100.0).abs() <= SPAWN_JITTER_PX);
        assert!((p.position.y - 200.0).abs() <= SPAWN_JITTER_PX);
    }

    #[test]
    fn velocity_length_equals_speed() {
        let mut rng = SimRng::new(77);
        let params = params();
        for _ in 0..500 {
            let p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
            assert!((p.velocity.length() - params.speed).abs() < 1e-12);
            // Always rising
            assert!(p.velocity.y < 0.0);
        }
    }

    #[test]
    fn zero_direction_is_invalid_state() {
        let err = scaled_direction(Vec2::ZERO, 0.02).unwrap_err();
        assert!(matches!(err, HazeError::InvalidState(_)));
    }

    #[test]
    fn same_seed_same_trajectory() {
        let params = params();
        let mut a = SimRng::new(2024);
        let mut b = SimRng::new(2024);
        let mut pa = Particle::spawn(&params, 0.0, 0.01, &mut a).unwrap();
        let mut pb = Particle::spawn(&params, 0.0, 0.01, &mut b).unwrap();
        for _ in 0..50 {
            pa.start_rand(&params, 0.01, &mut a).unwrap();
            pb.start_rand(&params, 0.01, &mut b).unwrap();
            assert_eq!(pa.position, pb.position);
            assert_eq!(pa.velocity, pb.velocity);
            assert_eq!(pa.time_to_die, pb.time_to_die);
        }
    }

    #[test]
    fn pre_aged_spawn_applies_catch_up_in_one_step() {
        let params = params();
        let wind = 0.01;
        let age = 3000.0;
        let mut rng_fresh = SimRng::new(9);
        let mut rng_aged = SimRng::new(9);
        let fresh = Particle::spawn(&params, 0.0, wind, &mut rng_fresh).unwrap();
        let aged = Particle::spawn(&params, age, wind, &mut rng_aged).unwrap();

        assert_eq!(aged.age, age);
        let expected_x = fresh.position.x + (fresh.velocity.x + wind) * age;
        let expected_y = fresh.position.y + fresh.velocity.y * age;
        assert!((aged.position.x - expected_x).abs() < 1e-9);
        assert!((aged.position.y - expected_y).abs() < 1e-9);
    }

    #[test]
    fn lifespan_invariant_holds_while_updating() {
        let params = params();
        let mut rng = SimRng::new(3);
        let mut p = Particle::spawn(&params, 0.0, 0.01, &mut rng).unwrap();
        for _ in 0..20_000 {
            p.update(16.0, &params, 0.01, &mut rng).unwrap();
            assert_eq!(p.is_alive(), p.age < p.time_to_die);
        }
    }

    #[test]
    fn fade_stays_in_unit_interval() {
        let params = EmitterParams {
            die_rate: 1.0,
            ..params()
        };
        let mut rng = SimRng::new(11);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        for _ in 0..10_000 {
            if p.update(7.0, &params, 0.0, &mut rng).unwrap() == ParticleEvent::Aged {
                assert!((0.0..=1.0).contains(&p.fade), "fade {}", p.fade);
                assert!((p.alpha - p.fade * params.alpha).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn fade_in_then_fade_out() {
        let params = params();
        let mut rng = SimRng::new(4);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        let fade_in = p.time_to_die * FADE_IN_FRACTION;

        p.update(fade_in / 2.0, &params, 0.0, &mut rng).unwrap();
        assert!((p.fade - 0.5).abs() < 1e-9);
        let expected = BASE_SCALE + 0.5 * MAX_START_SCALE + p.age / GROWTH_MS;
        assert!((p.scale - expected).abs() < 1e-12);

        p.update(fade_in / 2.0, &params, 0.0, &mut rng).unwrap();
        assert!((p.fade - 1.0).abs() < 1e-9);

        let remaining = p.time_to_die - p.age;
        p.update(remaining / 2.0, &params, 0.0, &mut rng).unwrap();
        assert!((p.fade - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rises_twice_as_fast_during_fade_in() {
        let params = params();
        let mut rng = SimRng::new(8);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        let y0 = p.position.y;
        let x0 = p.position.x;
        p.update(10.0, &params, 0.005, &mut rng).unwrap();
        assert!((p.position.y - (y0 + p.velocity.y * 20.0)).abs() < 1e-12);
        assert!((p.position.x - (x0 + (p.velocity.x + 0.005) * 10.0)).abs() < 1e-12);
    }

    #[test]
    fn death_with_zero_die_rate_freezes_forever() {
        let params = EmitterParams {
            die_rate: 0.0,
            ..params()
        };
        let mut rng = SimRng::new(5);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        let event = p.update(p.time_to_die, &params, 0.0, &mut rng).unwrap();
        assert_eq!(event, ParticleEvent::Frozen);
        assert!(!p.can_regen);
        let age = p.age;
        for _ in 0..10 {
            assert_eq!(
                p.update(16.0, &params, 0.0, &mut rng).unwrap(),
                ParticleEvent::Dormant
            );
        }
        assert_eq!(p.age, age);
        assert!(!p.is_alive());
    }

    #[test]
    fn death_with_full_die_rate_regenerates() {
        let params = EmitterParams {
            die_rate: 1.0,
            ..params()
        };
        let mut rng = SimRng::new(6);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        let event = p.update(p.time_to_die + 1.0, &params, 0.0, &mut rng).unwrap();
        assert_eq!(event, ParticleEvent::Reborn);
        assert_eq!(p.age, 0.0);
        assert!(p.is_alive());
        assert_eq!(p.alpha, 0.0);
        // Not drawn on the frame of rebirth
        assert!(!p.is_visible());
        p.update(16.0, &params, 0.0, &mut rng).unwrap();
        assert!(p.is_visible());
    }

    #[test]
    fn render_draws_snapped_rect_and_grows_dirty() {
        let params = params();
        let mut rng = SimRng::new(12);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        p.update(2000.0, &params, 0.0, &mut rng).unwrap();

        let sprite = Sprite::solid(10, 10, [0, 0, 0, 255]);
        let mut surface = RecordingSurface::new(CanvasSize::default());
        let mut dirty = Rect::EMPTY;
        let rect = p.render(&sprite, &mut surface, &mut dirty).unwrap();

        assert_eq!(rect.left, rect.left.round());
        assert_eq!(rect.top, rect.top.round());
        assert!((rect.width() - 10.0 * p.scale).abs() < 1e-12);
        assert_eq!(dirty, rect);
        match surface.ops() {
            [SurfaceOp::Draw { alpha, .. }] => assert_eq!(*alpha, p.alpha),
            other => panic!("unexpected ops {other:?}"),
        }
    }

    #[test]
    fn dead_particle_renders_nothing() {
        let params = EmitterParams {
            die_rate: 0.0,
            ..params()
        };
        let mut rng = SimRng::new(13);
        let mut p = Particle::spawn(&params, 0.0, 0.0, &mut rng).unwrap();
        p.update(p.time_to_die, &params, 0.0, &mut rng).unwrap();

        let sprite = Sprite::solid(10, 10, [0, 0, 0, 255]);
        let mut surface = RecordingSurface::new(CanvasSize::default());
        let mut dirty = Rect::EMPTY;
        assert!(p.render(&sprite, &mut surface, &mut dirty).is_none());
        assert!(surface.ops().is_empty());
        assert!(dirty.is_empty());
    }

    #[test]
    fn round_half_up_matches_canvas_rounding() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }
}
