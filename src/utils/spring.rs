//! Damped spring integrator.
//!
//! A mass-spring-damper stepped in fixed one millisecond substeps, so the
//! motion is independent of the frame rate. Retargeting keeps the current
//! velocity, which makes hover-in/hover-out feel continuous.

const STEP: f32 = 0.001;
/// Longest frame the spring will integrate; longer gaps (window drag,
/// breakpoint) are truncated.
const MAX_FRAME: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    pub tension: f32,
    pub friction: f32,
    pub mass: f32,
    /// Settling threshold for both distance and velocity.
    pub precision: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            tension: 170.0,
            friction: 26.0,
            mass: 1.0,
            precision: 0.0001,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Spring {
    pub config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    #[must_use]
    pub fn new(value: f32) -> Self {
        Self {
            config: SpringConfig::default(),
            value,
            velocity: 0.0,
            target: value,
        }
    }

    #[inline]
    #[must_use]
    pub fn value(&self) -> f32 {
        self.value
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.value == self.target && self.velocity == 0.0
    }

    /// Advances the spring by `dt` seconds and returns the new value.
    pub fn update(&mut self, dt: f32) -> f32 {
        if self.is_settled() {
            return self.value;
        }

        let SpringConfig {
            tension,
            friction,
            mass,
            precision,
        } = self.config;

        let steps = (dt.clamp(0.0, MAX_FRAME) / STEP).ceil() as u32;
        for _ in 0..steps {
            let spring_force = -tension * (self.value - self.target);
            let damping_force = -friction * self.velocity;
            let acceleration = (spring_force + damping_force) / mass;
            self.velocity += acceleration * STEP;
            self.value += self.velocity * STEP;
        }

        if (self.value - self.target).abs() < precision && self.velocity.abs() < precision {
            self.value = self.target;
            self.velocity = 0.0;
        }

        self.value
    }
}
