//! Parameters for growing a surface net.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SnetError, SnetResult};

/// How growth is driven once a net is created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimateMode {
    /// Grown to completion before the net is returned; updates are no-ops.
    Instant,
    /// Step on every scene update and redraw in between.
    #[default]
    Redraw,
    /// Grow to completion up front with fixed steps; updates are no-ops.
    Animate,
}

/// Parameters for a surface net.
///
/// # Example
///
/// ```
/// use snet::{AnimateMode, SurfaceNetConfig};
///
/// let config = SurfaceNetConfig::default()
///     .grid_size(16)
///     .animate(AnimateMode::Animate);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.state_half(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceNetConfig {
    /// Cells per axis.
    pub grid_size: usize,

    /// Seconds a cell takes to swing across the full value range.
    pub grow_time: f64,

    pub animate: AnimateMode,

    /// Precompute the cell coordinate list instead of deriving coordinates
    /// from the index on every lookup.
    pub use_coords: bool,

    /// Translate extracted meshes so the grid centre is the origin.
    pub center_object: bool,

    /// Log timings of growth and extraction.
    pub debug: bool,

    /// Increments a cell needs to cross the full value range.
    pub state_length: u32,

    /// Field value meaning "fully outside".
    pub limit_max: f32,

    /// Field value meaning "fully inside".
    pub limit_min: f32,
}

impl Default for SurfaceNetConfig {
    fn default() -> Self {
        Self {
            grid_size: 10,
            grow_time: 1.0,
            animate: AnimateMode::Redraw,
            use_coords: true,
            center_object: true,
            debug: true,
            state_length: 100,
            limit_max: 1.0,
            limit_min: -1.0,
        }
    }
}

impl SurfaceNetConfig {
    /// Smallest grid whose seeded ball encloses a cell, so meshing yields a surface.
    pub const MIN_GRID_SIZE: usize = 3;
    pub const MAX_GRID_SIZE: usize = 100;
    pub const MIN_GROW_TIME: f64 = 0.1;
    pub const MAX_GROW_TIME: f64 = 100.0;

    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> SnetResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> SnetResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SnetResult<()> {
        if !(Self::MIN_GRID_SIZE..=Self::MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(SnetError::invalid_config(format!(
                "grid_size {} outside {}..={}",
                self.grid_size,
                Self::MIN_GRID_SIZE,
                Self::MAX_GRID_SIZE
            )));
        }
        if !(Self::MIN_GROW_TIME..=Self::MAX_GROW_TIME).contains(&self.grow_time) {
            return Err(SnetError::invalid_config(format!(
                "grow_time {} outside {}..={}",
                self.grow_time,
                Self::MIN_GROW_TIME,
                Self::MAX_GROW_TIME
            )));
        }
        if self.state_length < 2 {
            return Err(SnetError::invalid_config("state_length must be at least 2"));
        }
        if !(self.limit_min < self.limit_max) {
            return Err(SnetError::invalid_config(format!(
                "limit_min {} must be below limit_max {}",
                self.limit_min, self.limit_max
            )));
        }
        Ok(())
    }

    /// Increment at which a growing cell wakes its neighbours.
    #[must_use]
    pub fn state_half(&self) -> u32 {
        (f64::from(self.state_length) * 0.5).round() as u32
    }

    /// Field change applied per increment.
    #[must_use]
    pub fn step_size(&self) -> f32 {
        (self.limit_max - self.limit_min) / self.state_length as f32
    }

    #[must_use]
    pub const fn grid_size(mut self, size: usize) -> Self {
        self.grid_size = size;
        self
    }

    #[must_use]
    pub const fn grow_time(mut self, seconds: f64) -> Self {
        self.grow_time = seconds;
        self
    }

    #[must_use]
    pub const fn animate(mut self, mode: AnimateMode) -> Self {
        self.animate = mode;
        self
    }

    #[must_use]
    pub const fn use_coords(mut self, enabled: bool) -> Self {
        self.use_coords = enabled;
        self
    }

    #[must_use]
    pub const fn center_object(mut self, enabled: bool) -> Self {
        self.center_object = enabled;
        self
    }

    #[must_use]
    pub const fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    #[must_use]
    pub const fn state_length(mut self, length: u32) -> Self {
        self.state_length = length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let config = SurfaceNetConfig::default();
        assert_eq!(config.grid_size, 10);
        assert!((config.grow_time - 1.0).abs() < 1e-12);
        assert_eq!(config.animate, AnimateMode::Redraw);
        assert_eq!(config.state_half(), 50);
        assert!((config.step_size() - 0.02).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = SurfaceNetConfig::default()
            .grid_size(32)
            .grow_time(0.5)
            .use_coords(false)
            .center_object(false)
            .debug(false)
            .state_length(7);
        assert_eq!(config.grid_size, 32);
        assert!(!config.use_coords);
        assert_eq!(config.state_half(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(SurfaceNetConfig::default().grid_size(2).validate().is_err());
        assert!(SurfaceNetConfig::default().grid_size(3).validate().is_ok());
        assert!(SurfaceNetConfig::default().grid_size(101).validate().is_err());
        assert!(SurfaceNetConfig::default().grow_time(0.0).validate().is_err());
        assert!(SurfaceNetConfig::default().state_length(1).validate().is_err());

        let mut flipped = SurfaceNetConfig::default();
        flipped.limit_min = 1.0;
        flipped.limit_max = -1.0;
        assert!(flipped.validate().is_err());
    }

    #[test]
    fn test_json_fills_defaults() {
        let config = SurfaceNetConfig::from_json_str(r#"{"grid_size": 20, "animate": "animate"}"#).unwrap();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.animate, AnimateMode::Animate);
        assert_eq!(config.state_length, 100);

        assert!(SurfaceNetConfig::from_json_str(r#"{"grid_size": 0}"#).is_err());
        assert!(SurfaceNetConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("net.json");
        std::fs::write(&path, r#"{"grid_size": 24, "grow_time": 2.5, "animate": "instant"}"#).unwrap();
        let config = SurfaceNetConfig::from_json_file(&path).unwrap();
        assert_eq!(config.grid_size, 24);
        assert!((config.grow_time - 2.5).abs() < 1e-12);
        assert_eq!(config.animate, AnimateMode::Instant);
        assert!(config.center_object);

        std::fs::write(&path, r#"{"grid_size": 500}"#).unwrap();
        assert!(matches!(SurfaceNetConfig::from_json_file(&path), Err(SnetError::InvalidConfig(_))));

        let missing = dir.path().join("missing.json");
        assert!(matches!(SurfaceNetConfig::from_json_file(&missing), Err(SnetError::Io(_))));
    }
}
