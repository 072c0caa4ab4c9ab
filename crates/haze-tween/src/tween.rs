//! Cubic-in tweens between two dot styles

use haze_core::{HazeError, Result};

/// Cubic ease-in: `p³`, with `p` clamped to [0, 1].
pub fn cubic_in(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    p * p * p
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Animated properties of one benchmark dot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DotStyle {
    /// Layout properties: position plus size in pixels
    Box {
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    },
    /// Translation from the dot's resting place plus a uniform scale
    Transform { x: f64, y: f64, scale: f64 },
}

impl DotStyle {
    pub fn square(left: f64, top: f64, size: f64) -> Self {
        DotStyle::Box {
            left,
            top,
            width: size,
            height: size,
        }
    }

    fn same_kind(&self, other: &DotStyle) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Interpolate towards `to`. Mismatched kinds snap to `to`.
    pub fn lerp(&self, to: &DotStyle, t: f64) -> DotStyle {
        match (*self, *to) {
            (
                DotStyle::Box {
                    left,
                    top,
                    width,
                    height,
                },
                DotStyle::Box {
                    left: l1,
                    top: t1,
                    width: w1,
                    height: h1,
                },
            ) => DotStyle::Box {
                left: lerp(left, l1, t),
                top: lerp(top, t1, t),
                width: lerp(width, w1, t),
                height: lerp(height, h1, t),
            },
            (
                DotStyle::Transform { x, y, scale },
                DotStyle::Transform {
                    x: x1,
                    y: y1,
                    scale: s1,
                },
            ) => DotStyle::Transform {
                x: lerp(x, x1, t),
                y: lerp(y, y1, t),
                scale: lerp(scale, s1, t),
            },
            _ => *to,
        }
    }
}

/// One in-flight tween. Time units are whatever the owning engine uses
/// (seconds or milliseconds); `advance` must be fed the same unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    from: DotStyle,
    to: DotStyle,
    delay: f64,
    duration: f64,
    elapsed: f64,
}

impl Tween {
    pub fn new(from: DotStyle, to: DotStyle, delay: f64, duration: f64) -> Result<Self> {
        if !from.same_kind(&to) {
            return Err(HazeError::InvalidState(
                "tween endpoints animate different properties".to_string(),
            ));
        }
        HazeError::check_range("duration", duration, f64::MIN_POSITIVE, f64::MAX)?;
        HazeError::check_range("delay", delay, 0.0, f64::MAX)?;
        Ok(Self {
            from,
            to,
            delay,
            duration,
            elapsed: 0.0,
        })
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed += dt;
    }

    /// Linear progress through the animated part, in [0, 1]
    pub fn progress(&self) -> f64 {
        ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    pub fn is_started(&self) -> bool {
        self.elapsed >= self.delay
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    /// Eased style at the current time
    pub fn sample(&self) -> DotStyle {
        if self.is_complete() {
            return self.to;
        }
        self.from.lerp(&self.to, cubic_in(self.progress()))
    }

    pub fn target(&self) -> &DotStyle {
        &self.to
    }

    pub fn delay(&self) -> f64 {
        self.delay
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_in_shape() {
        assert_eq!(cubic_in(0.0), 0.0);
        assert_eq!(cubic_in(1.0), 1.0);
        assert!((cubic_in(0.5) - 0.125).abs() < 1e-12);
        assert_eq!(cubic_in(2.0), 1.0);
        assert_eq!(cubic_in(-1.0), 0.0);
    }

    #[test]
    fn tween_holds_start_during_delay() {
        let from = DotStyle::square(100.0, 50.0, 1.0);
        let to = DotStyle::square(300.0, 250.0, 32.0);
        let mut tween = Tween::new(from, to, 200.0, 750.0).unwrap();
        tween.advance(150.0);
        assert!(!tween.is_started());
        assert_eq!(tween.sample(), from);
    }

    #[test]
    fn tween_eases_in() {
        let from = DotStyle::Transform {
            x: 0.0,
            y: 0.0,
            scale: 0.06,
        };
        let to = DotStyle::Transform {
            x: 100.0,
            y: -40.0,
            scale: 2.0,
        };
        let mut tween = Tween::new(from, to, 0.0, 0.75).unwrap();
        tween.advance(0.375);
        match tween.sample() {
            DotStyle::Transform { x, y, .. } => {
                // Halfway in time is an eighth of the way in space
                assert!((x - 12.5).abs() < 1e-9);
                assert!((y + 5.0).abs() < 1e-9);
            }
            other => panic!("unexpected style {other:?}"),
        }
        tween.advance(0.375);
        assert!(tween.is_complete());
        assert_eq!(tween.sample(), to);
    }

    #[test]
    fn mismatched_endpoints_are_rejected() {
        let from = DotStyle::square(0.0, 0.0, 1.0);
        let to = DotStyle::Transform {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
        };
        assert!(matches!(
            Tween::new(from, to, 0.0, 1.0),
            Err(HazeError::InvalidState(_))
        ));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let style = DotStyle::square(0.0, 0.0, 1.0);
        assert!(Tween::new(style, style, 0.0, 0.0).is_err());
        assert!(Tween::new(style, style, -1.0, 1.0).is_err());
    }
}
