//! Spring animation
//!
//! Damped harmonic oscillator used to move the tab indicator toward its
//! measured target. Integration is semi-implicit Euler; large frame deltas
//! are split into small steps so stiff springs stay stable.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum integration step in seconds
const MAX_STEP_SECS: f64 = 0.004;

/// Minimum stiffness, below this the spring never converges
const MIN_STIFFNESS: f64 = 0.1;

/// Minimum damping, an undamped spring oscillates forever
const MIN_DAMPING: f64 = 0.1;

/// Minimum rest distance, a zero threshold can never be met
const MIN_REST_THRESHOLD: f64 = 0.01;

/// Velocity under which a spring near its target counts as settled
const VELOCITY_THRESHOLD: f64 = 0.01;

/// Spring tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    /// Restoring force strength
    pub stiffness: f64,
    /// Velocity drag
    pub damping: f64,
    /// Distance from target (pixels) under which the spring may settle
    pub rest_threshold: f64,
}

impl SpringConfig {
    /// Return a copy with every field forced into a range that settles
    pub fn sanitized(self) -> Self {
        Self {
            stiffness: if self.stiffness.is_finite() {
                self.stiffness.max(MIN_STIFFNESS)
            } else {
                MIN_STIFFNESS
            },
            damping: if self.damping.is_finite() {
                self.damping.max(MIN_DAMPING)
            } else {
                MIN_DAMPING
            },
            rest_threshold: if self.rest_threshold.is_finite() {
                self.rest_threshold.abs().max(MIN_REST_THRESHOLD)
            } else {
                MIN_REST_THRESHOLD
            },
        }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 170.0,
            damping: 26.0,
            rest_threshold: 0.5,
        }
    }
}

/// Result of advancing a spring by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpringStatus {
    /// Still travelling toward the target
    Moving,
    /// Reached the target during this frame
    Settled,
    /// Was already at rest, nothing changed
    Idle,
}

/// A one-dimensional spring
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    config: SpringConfig,
    at_rest: bool,
}

impl Spring {
    /// Create a spring resting at `position`
    pub fn new(position: f64, config: SpringConfig) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: position,
            config: config.sanitized(),
            at_rest: true,
        }
    }

    /// Current (unclamped) position
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Configuration in use
    pub fn config(&self) -> SpringConfig {
        self.config
    }

    /// Whether the spring has settled on its target
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Jump to `value` with no motion
    pub fn snap_to(&mut self, value: f64) {
        self.position = value;
        self.target = value;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Change the target. Wakes the spring unless the target is unchanged.
    pub fn set_target(&mut self, target: f64) {
        if (self.target - target).abs() <= f64::EPSILON && self.at_rest {
            return;
        }
        self.target = target;
        self.at_rest = false;
    }

    fn step(&mut self, dt: f64) {
        let displacement = self.position - self.target;
        let acceleration =
            -self.config.stiffness * displacement - self.config.damping * self.velocity;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance by `dt`, subdividing for stability
    pub fn advance(&mut self, dt: Duration) -> SpringStatus {
        if self.at_rest {
            return SpringStatus::Idle;
        }

        let mut remaining = dt.as_secs_f64();
        while remaining > 0.0 {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        let near = (self.position - self.target).abs() < self.config.rest_threshold;
        if near && self.velocity.abs() < VELOCITY_THRESHOLD.max(self.config.rest_threshold) {
            self.snap_to(self.target);
            return SpringStatus::Settled;
        }

        SpringStatus::Moving
    }
}
