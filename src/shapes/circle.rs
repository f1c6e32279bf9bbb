use serde::{Deserialize, Serialize};

use crate::error::{CollisionError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub radius: f64,
}

impl Circle {
    /// Creates a circle. The radius must be finite and non-negative.
    pub fn new(radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(CollisionError::InvalidRadius(radius));
        }
        Ok(Self { radius })
    }
}
