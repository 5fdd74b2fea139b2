//! ## lipowalk-core::walker
//! **A single particle inside the liposome**
//!
//! A walker moves by a fixed step length once per round:
//! - left with probability 1/2, unless that step would reach or cross `x = 0`,
//!   in which case it is refused and the walker moves right instead;
//! - right otherwise, escaping as soon as its position is strictly above 1.
//!
//! Escaped walkers are frozen. Further calls to [`Walker::step`] do nothing
//! and consume no randomness.

use crate::rng::{UniformSource, WalkerRng};

/// Position of a walker relative to the membrane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Inside,
    Escaped,
}

#[derive(Debug, Clone)]
pub struct Walker<R = WalkerRng> {
    position: f64,
    status: Status,
    step_length: f64,
    rng: R,
}

impl<R: UniformSource> Walker<R> {
    /// Places a walker at a uniform position drawn from its own stream.
    pub fn initialize(mut rng: R, step_length: f64) -> Self {
        let position = rng.next_uniform();
        Self::at_position(position, step_length, rng)
    }

    /// Places a walker at an explicit position.
    pub fn at_position(position: f64, step_length: f64, rng: R) -> Self {
        Self {
            position,
            status: Status::Inside,
            step_length,
            rng,
        }
    }

    /// Advances the walker by one step and returns its status afterwards.
    #[inline]
    pub fn step(&mut self) -> Status {
        if self.status == Status::Escaped {
            return self.status;
        }

        let r = self.rng.next_uniform();
        if r <= 0.5 && self.position - self.step_length > 0.0 {
            self.position -= self.step_length;
        } else {
            self.position += self.step_length;
            // Landing exactly on the membrane still counts as inside.
            if self.position > 1.0 {
                self.status = Status::Escaped;
            }
        }
        self.status
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn is_inside(&self) -> bool {
        self.status == Status::Inside
    }
}
