use crate::error::CodeGridError;
use crate::grid::{CodeGrid, GridCode, Utm};
use crate::validate::validate_geodetic;
use geo_types::Point;
use std::fmt;

/// A WGS84 longitude/latitude position bound to a [`CodeGrid`] session.
///
/// Longitude is in `[-180, 180)` and latitude in `[-90, 90)`; both are checked
/// when the value is created, so an existing `Geodetic` is always in range.
#[derive(Clone, Copy)]
pub struct Geodetic<'g> {
    grid: &'g CodeGrid,
    longitude: f64,
    latitude: f64,
}

impl<'g> Geodetic<'g> {
    pub(crate) fn new(
        grid: &'g CodeGrid,
        longitude: f64,
        latitude: f64,
    ) -> Result<Self, CodeGridError> {
        let (longitude, latitude) = validate_geodetic(longitude, latitude)?;
        Ok(Self {
            grid,
            longitude,
            latitude,
        })
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the position as a `(longitude, latitude)` point.
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.longitude, self.latitude)
    }

    pub fn to_geodetic(&self) -> Geodetic<'g> {
        *self
    }

    /// Projects onto the UTM zone containing this longitude.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Range`] - Latitude outside `[-80, 84]`, or the projected
    ///   point fails the UTM consistency checks
    /// - [`CodeGridError::ProjectionError`] - The projection engine failed
    pub fn to_utm(&self) -> Result<Utm<'g>, CodeGridError> {
        let (zone, hemisphere, projected) = self
            .grid
            .projection()
            .geodetic_to_utm(&(self.longitude, self.latitude))?;
        Utm::new(self.grid, zone, hemisphere, projected.x(), projected.y())
    }

    /// Encodes this position as a grid code, via its UTM projection.
    ///
    /// # Errors
    ///
    /// As [`Geodetic::to_utm`], plus [`CodeGridError::NotFound`] when no registered
    /// cell contains the projected point.
    pub fn to_grid_code(&self) -> Result<GridCode<'g>, CodeGridError> {
        self.to_utm()?.to_grid_code()
    }
}

impl fmt::Debug for Geodetic<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Geodetic")
            .field("longitude", &self.longitude)
            .field("latitude", &self.latitude)
            .finish()
    }
}

/// Compares the coordinate values only.
impl PartialEq for Geodetic<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.longitude == other.longitude && self.latitude == other.latitude
    }
}
