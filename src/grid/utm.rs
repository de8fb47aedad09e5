use crate::coord::{Hemisphere, zone_longitude_span};
use crate::error::CodeGridError;
use crate::grid::{CodeGrid, Geodetic, GridCode};
use crate::index::encode;
use crate::validate::{validate_utm_latitude, validate_utm_zone};
use geo_types::Point;
use std::fmt;

/// Slack, in degrees, allowed on the zone's longitude span when checking an
/// inverse projection. Points on a zone edge can come back a few ulps outside it.
const ZONE_EDGE_TOLERANCE: f64 = 1e-9;

/// A UTM position bound to a [`CodeGrid`] session.
///
/// On creation the position is inverse-projected: the resulting latitude must be
/// in `[-80, 84]` and the longitude inside the zone's own 6° span.
#[derive(Clone, Copy)]
pub struct Utm<'g> {
    grid: &'g CodeGrid,
    zone: u8,
    hemisphere: Hemisphere,
    easting: f64,
    northing: f64,
}

impl<'g> Utm<'g> {
    pub(crate) fn new(
        grid: &'g CodeGrid,
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Result<Self, CodeGridError> {
        let zone = validate_utm_zone(zone)?;
        let geodetic = grid
            .projection()
            .utm_to_geodetic(zone, hemisphere, easting, northing)?;

        validate_utm_latitude(geodetic.y())?;
        let (west, east) = zone_longitude_span(zone)?;
        let longitude = geodetic.x();
        if longitude < west - ZONE_EDGE_TOLERANCE || longitude >= east + ZONE_EDGE_TOLERANCE {
            return Err(CodeGridError::range(
                "longitude",
                format!("should be between [{west}, {east}), got {longitude}"),
            ));
        }

        Ok(Self {
            grid,
            zone,
            hemisphere,
            easting,
            northing,
        })
    }

    /// UTM zone (1-60).
    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn hemisphere(&self) -> Hemisphere {
        self.hemisphere
    }

    /// Easting in meters.
    pub fn easting(&self) -> f64 {
        self.easting
    }

    /// Northing in meters.
    pub fn northing(&self) -> f64 {
        self.northing
    }

    /// Returns the position as an `(easting, northing)` point.
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.easting, self.northing)
    }

    pub fn to_utm(&self) -> Utm<'g> {
        *self
    }

    /// Inverse-projects back to longitude/latitude.
    ///
    /// The longitude is clamped into the zone's span, so a point on a zone edge
    /// (including the antimeridian) stays a valid geodetic value.
    pub fn to_geodetic(&self) -> Result<Geodetic<'g>, CodeGridError> {
        let point = self.grid.projection().utm_to_geodetic(
            self.zone,
            self.hemisphere,
            self.easting,
            self.northing,
        )?;
        let (west, east) = zone_longitude_span(self.zone)?;
        let longitude = point.x().clamp(west, east - ZONE_EDGE_TOLERANCE);
        Geodetic::new(self.grid, longitude, point.y())
    }

    /// Encodes the position against the registered cell containing it.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::NotFound`] - No cell of this zone and hemisphere contains
    ///   the position
    pub fn to_grid_code(&self) -> Result<GridCode<'g>, CodeGridError> {
        let cell = self.grid.registry().find_by_point(
            self.zone,
            self.hemisphere,
            self.easting,
            self.northing,
        )?;
        let sub_levels = encode(cell, self.easting, self.northing)?;
        Ok(GridCode::from_parts(self.grid, cell, sub_levels))
    }
}

impl fmt::Debug for Utm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Utm")
            .field("zone", &self.zone)
            .field("hemisphere", &self.hemisphere)
            .field("easting", &self.easting)
            .field("northing", &self.northing)
            .finish()
    }
}

impl fmt::Display for Utm<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{} {} {}",
            self.zone, self.hemisphere, self.easting, self.northing
        )
    }
}

/// Compares the coordinate values only.
impl PartialEq for Utm<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.zone == other.zone
            && self.hemisphere == other.hemisphere
            && self.easting == other.easting
            && self.northing == other.northing
    }
}
