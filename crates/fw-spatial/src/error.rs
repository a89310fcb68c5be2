//! Spatial-subsystem error type.

use thiserror::Error;

use fw_core::{NodeId, TravelMode};

/// Errors produced by `fw-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    /// The search exhausted its frontier (or its step bound) before reaching
    /// the goal.  A normal outcome, not a fault.
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    /// Two consecutive path nodes share no edge.
    #[error("path step {from} -> {to} has no edge")]
    MissingEdge { from: NodeId, to: NodeId },

    #[error("invalid speed {kmh} km/h for {mode} on `{class}`")]
    InvalidSpeed { mode: TravelMode, class: String, kmh: f64 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpatialError {
    /// `true` for the "no route available" outcome.
    pub fn is_no_route(&self) -> bool {
        matches!(self, SpatialError::NoRoute { .. })
    }
}

pub type SpatialResult<T> = Result<T, SpatialError>;
