mod geodetic;
mod grid_code;
mod utm;

pub use geodetic::Geodetic;
pub use grid_code::GridCode;
pub use utm::Utm;

use crate::cell::GridCodeCell;
use crate::coord::{Hemisphere, ProjEngine, ProjectionEngine, ProjectionGateway};
use crate::error::CodeGridError;
use crate::registry::CellRegistry;
use rayon::prelude::*;

/// A conversion session: one cell registry plus the projection engine it was
/// set up with.
///
/// Coordinates are created through the session and borrow it, so each can be
/// converted into the other two representations without any global state.
/// Several sessions with different cell sets can live side by side, and a
/// session can be shared across threads by reference.
///
/// # Example
///
/// ```
/// use codegrid_rs::{CodeGrid, GridCodeCell, Hemisphere};
///
/// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
/// let grid = CodeGrid::new(vec![GridCodeCell::new(
///     770000.0, 3520000.0, 780000.0, 3530000.0, 36, Hemisphere::North, "ABC",
/// )])?;
///
/// let code = grid.geodetic(35.9, 31.8)?.to_grid_code()?;
/// assert_eq!(code.to_string(), "ABC 415963");
///
/// let corner = grid.grid_code("ABC", ["41", "59", "63"])?.to_utm()?;
/// assert_eq!((corner.easting(), corner.northing()), (774560.0, 3521930.0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CodeGrid {
    registry: CellRegistry,
    projection: ProjectionGateway,
}

impl CodeGrid {
    /// Registers `cells` and sets up the PROJ-backed projection engine.
    pub fn new(cells: Vec<GridCodeCell>) -> Result<Self, CodeGridError> {
        Ok(Self::from_registry(CellRegistry::new(cells)?))
    }

    /// Builds a session from a JSON array of cell definitions.
    pub fn from_json(json: &str) -> Result<Self, CodeGridError> {
        Ok(Self::from_registry(CellRegistry::from_json(json)?))
    }

    pub fn from_registry(registry: CellRegistry) -> Self {
        Self::with_engine(registry, ProjEngine::new())
    }

    /// Builds a session around a caller-supplied projection engine. The UTM
    /// definitions are registered with the engine here.
    pub fn with_engine(registry: CellRegistry, engine: impl ProjectionEngine + 'static) -> Self {
        let projection = ProjectionGateway::new(engine);
        tracing::debug!(cells = registry.len(), "code grid session ready");
        Self {
            registry,
            projection,
        }
    }

    pub fn registry(&self) -> &CellRegistry {
        &self.registry
    }

    pub(crate) fn projection(&self) -> &ProjectionGateway {
        &self.projection
    }

    /// Creates a geodetic coordinate (degrees, WGS84).
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Validation`] - Longitude outside `[-180, 180)` or latitude
    ///   outside `[-90, 90)`
    pub fn geodetic(&self, longitude: f64, latitude: f64) -> Result<Geodetic<'_>, CodeGridError> {
        Geodetic::new(self, longitude, latitude)
    }

    /// Creates a UTM coordinate.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Validation`] - Zone outside `1..=60`
    /// - [`CodeGridError::Range`] - The position maps outside `[-80, 84]` latitude or
    ///   outside its zone's longitude span
    pub fn utm(
        &self,
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Result<Utm<'_>, CodeGridError> {
        Utm::new(self, zone, hemisphere, easting, northing)
    }

    /// Creates a grid code from a designator and three two-digit tokens.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Validation`] - Malformed designator or token
    /// - [`CodeGridError::NotFound`] - No registered cell owns the designator
    pub fn grid_code(
        &self,
        designator: &str,
        sub_levels: [&str; 3],
    ) -> Result<GridCode<'_>, CodeGridError> {
        GridCode::new(self, designator, sub_levels)
    }

    /// Parses the textual form produced by [`GridCode`]'s `Display`,
    /// e.g. `"ABC 415963"`.
    pub fn parse_grid_code(&self, text: &str) -> Result<GridCode<'_>, CodeGridError> {
        GridCode::parse(self, text)
    }

    /// Encodes many longitude/latitude pairs in parallel. Results keep the input order.
    pub fn encode_geodetic_batch(
        &self,
        points: &[(f64, f64)],
    ) -> Vec<Result<GridCode<'_>, CodeGridError>> {
        points
            .par_iter()
            .map(|&(longitude, latitude)| self.geodetic(longitude, latitude)?.to_grid_code())
            .collect()
    }
}
