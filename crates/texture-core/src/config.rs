use serde::{Deserialize, Serialize};

use crate::composition::Composition;
use crate::error::TextureError;
use crate::geometry::{ScreenPoint, Triangle};

/// Diagram placement and drawing parameters.
/// Defaults fit a 500×420 drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    /// Triangle centroid in surface pixels.
    pub center: ScreenPoint,
    /// Side length in surface pixels.
    pub size: f64,
    /// Composition shown on start and after a reset.
    pub initial: Composition,
    /// Grid and tick spacing as a fraction, default 0.10.
    pub grid_step: f64,
    /// Tick length in composition units, default 0.03.
    pub tick_length: f64,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            center: ScreenPoint::new(250.0, 240.0),
            size: 400.0,
            initial: Composition::default(),
            grid_step: 0.10,
            tick_length: 0.03,
        }
    }
}

impl DiagramConfig {
    pub fn from_json(json: &str) -> Result<Self, TextureError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| TextureError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TextureError> {
        if !(self.center.x.is_finite() && self.center.y.is_finite()) {
            return Err(TextureError::InvalidConfig("center must be finite".into()));
        }
        if !(self.size.is_finite() && self.size > 0.0) {
            return Err(TextureError::InvalidConfig(format!("size must be positive, got {}", self.size)));
        }
        if !(self.grid_step > 0.0 && self.grid_step <= 0.5) {
            return Err(TextureError::InvalidConfig(format!(
                "grid_step must be in (0, 0.5], got {}",
                self.grid_step
            )));
        }
        if !(self.tick_length.is_finite() && self.tick_length >= 0.0) {
            return Err(TextureError::InvalidConfig(format!(
                "tick_length must be non-negative, got {}",
                self.tick_length
            )));
        }
        self.initial.validate()
    }

    pub fn triangle(&self) -> Triangle {
        Triangle::new(self.center, self.size)
    }

    /// Number of grid intervals per axis.
    pub fn grid_divisions(&self) -> usize {
        (1.0 / self.grid_step).round().max(1.0) as usize
    }
}
