use fw_core::{CoreError, GeoPoint, WayId};
use fw_spatial::SpatialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown road {0}")]
    UnknownRoad(WayId),

    #[error("coordinate {0} is not finite")]
    NonFiniteCoordinate(GeoPoint),

    #[error("coordinate {0} is outside the service area")]
    OutsideArea(GeoPoint),

    #[error("road graph has no nodes")]
    EmptyGraph,

    #[error("flood status unavailable: {0}")]
    FloodStatus(String),

    #[error("routing failed: {0}")]
    Spatial(#[from] SpatialError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl EngineError {
    /// `true` when the search finished without a path: the "no route
    /// available" outcome, as opposed to a fault.
    pub fn is_no_route(&self) -> bool {
        matches!(self, EngineError::Spatial(e) if e.is_no_route())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
