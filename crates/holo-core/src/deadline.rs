//! Cooperative deadline for long-running pure computation.
//!
//! Clustering and graph search check the deadline between iterations and
//! abort with [`DeadlineExpired`] instead of returning a partial result.

use std::fmt;
use std::time::{Duration, Instant};

/// A point in time after which pure computation must stop.
#[derive(Clone, Copy, Debug, Default)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// No deadline: computation runs to completion.
    pub fn none() -> Self {
        Self(None)
    }

    /// Deadline a fixed duration from now.
    pub fn after(d: Duration) -> Self {
        Self(Some(Instant::now() + d))
    }

    /// Deadline at an absolute instant.
    pub fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    pub fn expired(&self) -> bool {
        match self.0 {
            Some(t) => Instant::now() >= t,
            None => false,
        }
    }

    /// Err if expired, for use with `?` inside computation loops.
    pub fn check(&self) -> Result<(), DeadlineExpired> {
        if self.expired() {
            Err(DeadlineExpired)
        } else {
            Ok(())
        }
    }
}

/// The deadline fired mid-computation; no partial result exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeadlineExpired;

impl fmt::Display for DeadlineExpired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "deadline expired mid-computation")
    }
}

impl std::error::Error for DeadlineExpired {}
