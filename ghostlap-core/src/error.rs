//! Error types shared by the builder, the synthesizer and the player

use thiserror::Error;

/// Failures producing derived track artifacts
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// Fewer waypoints than a closed loop needs
    #[error("track has {found} waypoints, at least {required} are required")]
    InsufficientPoints { found: usize, required: usize },

    /// Mesh was produced but some cross-sections have zero area
    #[error("surface has {sections} zero-area cross-sections")]
    DegenerateGeometry { sections: usize },

    /// No track was supplied to the pipeline
    #[error("no track loaded")]
    MissingTrack,

    /// A waypoint coordinate was NaN or infinite
    #[error("waypoint {index} has a non-finite coordinate")]
    NonFiniteWaypoint { index: usize },
}

/// Failures loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
