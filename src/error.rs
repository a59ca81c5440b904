//! Error types for surface-net and mesh operations.

use thiserror::Error;

/// Result type alias for this crate.
pub type SnetResult<T> = Result<T, SnetError>;

/// Errors raised while building meshes, configuring a surface net or moving
/// geometry in and out of files.
///
/// Selection queries never produce these; they return sentinels instead.
#[derive(Debug, Error)]
pub enum SnetError {
    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Mesh topology is malformed.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// OBJ parsing or writing failed.
    #[error("obj: {0}")]
    Obj(#[from] obj::ObjError),

    /// Filesystem error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Config file could not be decoded.
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SnetError {
    /// Create an invalid config error.
    #[must_use]
    pub fn invalid_config(details: impl Into<String>) -> Self {
        Self::InvalidConfig(details.into())
    }

    /// Create an invalid mesh error.
    #[must_use]
    pub fn invalid_mesh(details: impl Into<String>) -> Self {
        Self::InvalidMesh(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SnetError::invalid_config("grid_size must be at least 2");
        assert!(format!("{err}").contains("grid_size"));

        let err = SnetError::invalid_mesh("polygon 3 has 2 corners");
        assert!(format!("{err}").starts_with("invalid mesh"));
    }
}
