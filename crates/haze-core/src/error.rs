//! Error types for haze

use thiserror::Error;

/// The main error type for haze operations
#[derive(Debug, Error)]
pub enum HazeError {
    #[error("Asset load failed for {path}: {reason}")]
    AssetLoad { path: String, reason: String },

    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),

    #[error("Unknown tween strategy: {0}")]
    UnknownStrategy(String),

    #[error("Render error: {0}")]
    RenderError(String),
}

impl HazeError {
    /// Range check helper used by config validation.
    ///
    /// NaN never satisfies the check.
    pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<()> {
        if value >= min && value <= max {
            Ok(())
        } else {
            Err(HazeError::ValueOutOfRange {
                field: field.to_string(),
                min,
                max,
                value,
            })
        }
    }
}

/// Result type alias for haze operations
pub type Result<T> = std::result::Result<T, HazeError>;

impl From<toml::de::Error> for HazeError {
    fn from(err: toml::de::Error) -> Self {
        HazeError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for HazeError {
    fn from(err: toml::ser::Error) -> Self {
        HazeError::TomlSerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_range_accepts_bounds() {
        assert!(HazeError::check_range("alpha", 0.0, 0.0, 1.0).is_ok());
        assert!(HazeError::check_range("alpha", 1.0, 0.0, 1.0).is_ok());
    }

    #[test]
    fn check_range_rejects_outside_and_nan() {
        let err = HazeError::check_range("alpha", 1.5, 0.0, 1.0).unwrap_err();
        assert!(err.to_string().contains("alpha"));
        assert!(HazeError::check_range("alpha", f64::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn toml_errors_convert() {
        let parsed: std::result::Result<toml::Value, _> = toml::from_str("= broken");
        let err: HazeError = parsed.unwrap_err().into();
        assert!(matches!(err, HazeError::TomlParseError(_)));
    }
}
