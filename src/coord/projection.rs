use crate::coord::{Coordinate, Hemisphere};
use crate::error::CodeGridError;
use crate::validate::{
    MAX_UTM_ZONE, MIN_LONGITUDE, MIN_UTM_ZONE, validate_longitude, validate_utm_latitude,
    validate_utm_zone,
};
use geo_types::Point;
use lazy_static::lazy_static;
use proj::Proj;
use std::collections::HashMap;
use std::fmt;

/// Identifier of the WGS84 longitude/latitude CRS
pub const GEODETIC_CRS: &str = "EPSG:4326";

/// Width of a UTM zone in degrees of longitude
pub const UTM_ZONE_WIDTH: f64 = 6.0;

lazy_static! {
    /// WGS84 plus every UTM zone/hemisphere pair, as `(id, PROJ definition)`.
    static ref CRS_DEFINITIONS: Vec<(String, String)> = {
        let mut definitions = Vec::with_capacity(1 + 2 * MAX_UTM_ZONE as usize);
        definitions.push((
            GEODETIC_CRS.to_string(),
            "+proj=longlat +datum=WGS84 +no_defs +type=crs".to_string(),
        ));
        for zone in MIN_UTM_ZONE..=MAX_UTM_ZONE {
            definitions.push((
                utm_crs_id(zone, Hemisphere::North),
                format!("+proj=utm +zone={zone} +datum=WGS84 +units=m +no_defs +type=crs"),
            ));
            definitions.push((
                utm_crs_id(zone, Hemisphere::South),
                format!("+proj=utm +zone={zone} +south +datum=WGS84 +units=m +no_defs +type=crs"),
            ));
        }
        definitions
    };
}

/// The projection capability the grid relies on.
///
/// Implementations own a table of CRS definitions keyed by identifier and
/// transform points between any two defined entries. Points are `(x, y)`, i.e.
/// `(longitude, latitude)` for geodetic systems and `(easting, northing)` for
/// projected ones.
pub trait ProjectionEngine: Send + Sync {
    /// Registers (or re-registers) a CRS definition under `id`.
    fn define_crs(&mut self, id: &str, definition: &str);

    /// Transforms `point` from the `source` CRS to the `target` CRS.
    fn transform(
        &self,
        source: &str,
        target: &str,
        point: Point<f64>,
    ) -> Result<Point<f64>, CodeGridError>;
}

/// [`ProjectionEngine`] backed by the PROJ library.
#[derive(Debug, Clone, Default)]
pub struct ProjEngine {
    definitions: HashMap<String, String>,
}

impl ProjEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the PROJ definition registered under `id`.
    pub fn definition(&self, id: &str) -> Option<&str> {
        self.definitions.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    fn lookup(&self, id: &str) -> Result<&str, CodeGridError> {
        self.definition(id)
            .ok_or_else(|| CodeGridError::ProjectionError(format!("CRS '{id}' is not defined")))
    }
}

impl ProjectionEngine for ProjEngine {
    fn define_crs(&mut self, id: &str, definition: &str) {
        self.definitions
            .insert(id.to_string(), definition.to_string());
    }

    fn transform(
        &self,
        source: &str,
        target: &str,
        point: Point<f64>,
    ) -> Result<Point<f64>, CodeGridError> {
        let proj = Proj::new_known_crs(self.lookup(source)?, self.lookup(target)?, None)
            .map_err(|e| CodeGridError::ProjectionError(e.to_string()))?;

        let (x, y) = proj
            .convert((point.x(), point.y()))
            .map_err(|e| CodeGridError::ProjectionError(e.to_string()))?;

        if !x.is_finite() || !y.is_finite() {
            return Err(CodeGridError::ProjectionError(format!(
                "{source} -> {target} produced a non-finite point for ({}, {})",
                point.x(),
                point.y()
            )));
        }
        Ok(Point::new(x, y))
    }
}

/// Identifier of the WGS84 UTM CRS for a zone and hemisphere
/// (`EPSG:326ZZ` north, `EPSG:327ZZ` south).
///
/// # Example
/// ```
/// use codegrid_rs::{Hemisphere, utm_crs_id};
///
/// assert_eq!(utm_crs_id(36, Hemisphere::North), "EPSG:32636");
/// assert_eq!(utm_crs_id(7, Hemisphere::South), "EPSG:32707");
/// ```
pub fn utm_crs_id(zone: u8, hemisphere: Hemisphere) -> String {
    let prefix = match hemisphere {
        Hemisphere::North => 6,
        Hemisphere::South => 7,
    };
    format!("EPSG:32{prefix}{zone:02}")
}

/// UTM zone number for a longitude in `[-180, 180)`.
pub fn utm_zone_for(longitude: f64) -> Result<u8, CodeGridError> {
    let longitude = validate_longitude(longitude)?;
    Ok(((longitude - MIN_LONGITUDE) / UTM_ZONE_WIDTH).floor() as u8 + 1)
}

/// Longitude span `[west, east)` covered by a UTM zone.
pub fn zone_longitude_span(zone: u8) -> Result<(f64, f64), CodeGridError> {
    let zone = validate_utm_zone(zone)?;
    let west = f64::from(zone - 1) * UTM_ZONE_WIDTH + MIN_LONGITUDE;
    Ok((west, west + UTM_ZONE_WIDTH))
}

/// Registers the WGS84 geodetic CRS and all 120 UTM zone/hemisphere CRSs with
/// `engine`. Safe to call any number of times.
pub fn define_utm_projections(engine: &mut dyn ProjectionEngine) {
    for (id, definition) in CRS_DEFINITIONS.iter() {
        engine.define_crs(id, definition);
    }
    tracing::debug!(count = CRS_DEFINITIONS.len(), "registered UTM projections");
}

/// Bridges geodetic and UTM coordinates through a [`ProjectionEngine`].
///
/// The engine's UTM definitions are registered once, when the gateway is built.
pub struct ProjectionGateway {
    engine: Box<dyn ProjectionEngine>,
}

impl ProjectionGateway {
    pub fn new(mut engine: impl ProjectionEngine + 'static) -> Self {
        define_utm_projections(&mut engine);
        Self {
            engine: Box::new(engine),
        }
    }

    /// Projects a longitude/latitude pair onto its own UTM zone.
    ///
    /// The zone is `floor((lon + 180) / 6) + 1` and the hemisphere follows the sign
    /// of the latitude.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Validation`] - Longitude outside `[-180, 180)`
    /// - [`CodeGridError::Range`] - Latitude outside `[-80, 84]`, checked before the
    ///   engine is consulted
    /// - [`CodeGridError::ProjectionError`] - The engine failed
    pub fn geodetic_to_utm<C: Coordinate>(
        &self,
        coord: &C,
    ) -> Result<(u8, Hemisphere, Point<f64>), CodeGridError> {
        let zone = utm_zone_for(coord.x())?;
        let latitude = validate_utm_latitude(coord.y())?;
        let hemisphere = Hemisphere::for_latitude(latitude);

        let projected = self.engine.transform(
            GEODETIC_CRS,
            &utm_crs_id(zone, hemisphere),
            Point::new(coord.x(), latitude),
        )?;
        Ok((zone, hemisphere, projected))
    }

    /// Inverse-projects a UTM position from its own zone back to longitude/latitude.
    pub fn utm_to_geodetic(
        &self,
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Result<Point<f64>, CodeGridError> {
        let zone = validate_utm_zone(zone)?;
        self.engine.transform(
            &utm_crs_id(zone, hemisphere),
            GEODETIC_CRS,
            Point::new(easting, northing),
        )
    }
}

impl fmt::Debug for ProjectionGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectionGateway").finish_non_exhaustive()
    }
}
