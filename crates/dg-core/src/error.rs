//! Error types for dungeon builds and configuration loading
//!
//! Only configuration problems are errors. Placement failures inside a build
//! (a front that cannot fit a room, a corridor with no route) are handled
//! locally and never surface here.

use thiserror::Error;

/// Reasons a build is aborted before anything is committed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenError {
    #[error("no biome profile configured")]
    MissingProfile,

    #[error("no seed footprint available")]
    MissingFootprint,

    #[error("invalid generation config: {reason}")]
    InvalidConfig { reason: String },

    #[error(
        "seed footprint {footprint_width}x{footprint_height} does not fit a {map_width}x{map_height} map"
    )]
    FootprintTooLarge {
        footprint_width: i32,
        footprint_height: i32,
        map_width: i32,
        map_height: i32,
    },
}

impl GenError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        GenError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Errors while loading configuration from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] GenError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(GenError::MissingProfile.to_string(), "no biome profile configured");
        assert_eq!(
            GenError::invalid("room_extent.min > room_extent.max").to_string(),
            "invalid generation config: room_extent.min > room_extent.max"
        );
        let too_large = GenError::FootprintTooLarge {
            footprint_width: 30,
            footprint_height: 20,
            map_width: 16,
            map_height: 16,
        };
        assert!(too_large.to_string().contains("30x20"));
    }

    #[test]
    fn test_config_error_wraps_gen_error() {
        let err: ConfigError = GenError::MissingFootprint.into();
        assert_eq!(err.to_string(), "no seed footprint available");
    }
}
