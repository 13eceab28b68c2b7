use std::time::Duration;

use cgmath::{Vector3, VectorSpace};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    #[default]
    QuadraticInOut,
}

impl Easing {
    pub fn apply(self, k: f32) -> f32 {
        match self {
            Easing::Linear => k,
            Easing::QuadraticInOut => {
                if k < 0.5 {
                    2.0 * k * k
                } else {
                    1.0 - (-2.0 * k + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Moves a vector from `from` to `to` over `duration`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: Vector3<f32>,
    to: Vector3<f32>,
    duration: Duration,
    elapsed: Duration,
    easing: Easing,
}

impl Tween {
    pub fn new(from: Vector3<f32>, to: Vector3<f32>, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
            easing,
        }
    }

    /// Advances the tween and returns the current value.
    pub fn advance(&mut self, dt: Duration) -> Vector3<f32> {
        self.elapsed = (self.elapsed + dt).min(self.duration);
        self.value()
    }

    pub fn value(&self) -> Vector3<f32> {
        if self.duration.is_zero() {
            return self.to;
        }
        let k = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        self.from.lerp(self.to, self.easing.apply(k))
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}
