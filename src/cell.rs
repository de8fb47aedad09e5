use crate::coord::Hemisphere;
use crate::error::CodeGridError;
use crate::index::MAX_CELL_SPAN;
use crate::validate::{validate_designator, validate_utm_zone};
use geo_types::{Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

/// A registered rectangular region of one UTM zone/hemisphere, tagged with a
/// three-character designator.
///
/// Bounds are UTM meters. A cell owns the half-open box
/// `[left, right) x [bottom, top)`, and grid codes address 10 m sub-cells inside it.
///
/// # Example
///
/// ```
/// use codegrid_rs::{GridCodeCell, Hemisphere};
///
/// let cell = GridCodeCell::new(770000.0, 3520000.0, 780000.0, 3530000.0, 36, Hemisphere::North, "ABC");
/// assert!(cell.contains(36, Hemisphere::North, 774565.0, 3521931.0));
/// assert!(!cell.contains(36, Hemisphere::North, 780000.0, 3521931.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridCodeCell {
    /// Western edge (inclusive) easting
    pub left: f64,
    /// Southern edge (inclusive) northing
    pub bottom: f64,
    /// Eastern edge (exclusive) easting
    pub right: f64,
    /// Northern edge (exclusive) northing
    pub top: f64,
    /// UTM zone (1-60)
    pub zone: u8,
    pub hemisphere: Hemisphere,
    /// Three-character zone designator, any script
    #[serde(alias = "gridCodeZone")]
    pub designator: String,
}

impl GridCodeCell {
    /// Builds a cell without checking it. Cells are checked when they are
    /// registered, see [`GridCodeCell::validate`].
    pub fn new(
        left: f64,
        bottom: f64,
        right: f64,
        top: f64,
        zone: u8,
        hemisphere: Hemisphere,
        designator: impl Into<String>,
    ) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
            zone,
            hemisphere,
            designator: designator.into(),
        }
    }

    /// Checks the zone, the designator shape and the extents.
    ///
    /// Each side must be finite, positive, and no longer than the 10 km a grid
    /// code can address.
    pub fn validate(&self) -> Result<(), CodeGridError> {
        validate_utm_zone(self.zone)?;
        validate_designator(&self.designator)?;
        check_extent("cell width", self.left, self.right)?;
        check_extent("cell height", self.bottom, self.top)?;
        Ok(())
    }

    /// Half-open containment test, requiring the same zone and hemisphere.
    pub fn contains(&self, zone: u8, hemisphere: Hemisphere, easting: f64, northing: f64) -> bool {
        self.zone == zone
            && self.hemisphere == hemisphere
            && self.left <= easting
            && easting < self.right
            && self.bottom <= northing
            && northing < self.top
    }

    /// Whether the two cells share any area in the same zone and hemisphere.
    pub fn overlaps(&self, other: &GridCodeCell) -> bool {
        self.zone == other.zone
            && self.hemisphere == other.hemisphere
            && self.left < other.right
            && other.left < self.right
            && self.bottom < other.top
            && other.bottom < self.top
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Bounding box in UTM meters of the cell's own zone.
    pub fn bounds(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.left, y: self.bottom },
            coord! { x: self.right, y: self.top },
        )
    }

    /// Converts this cell to a rectangular polygon in UTM meters.
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.bounds().to_polygon()
    }
}

fn check_extent(field: &'static str, low: f64, high: f64) -> Result<(), CodeGridError> {
    let span = high - low;
    if !low.is_finite() || !high.is_finite() || span <= 0.0 {
        return Err(CodeGridError::validation(
            field,
            format!("edges should be finite and increasing, got [{low}, {high})"),
        ));
    }
    if span > MAX_CELL_SPAN {
        return Err(CodeGridError::validation(
            field,
            format!("should be at most {MAX_CELL_SPAN} m, got {span}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> GridCodeCell {
        GridCodeCell::new(
            770000.0,
            3520000.0,
            780000.0,
            3530000.0,
            36,
            Hemisphere::North,
            "ABC",
        )
    }

    #[test]
    fn test_contains_is_half_open() {
        let cell = cell();
        assert!(cell.contains(36, Hemisphere::North, 770000.0, 3520000.0));
        assert!(cell.contains(36, Hemisphere::North, 779999.99, 3529999.99));
        assert!(!cell.contains(36, Hemisphere::North, 780000.0, 3525000.0));
        assert!(!cell.contains(36, Hemisphere::North, 775000.0, 3530000.0));
    }

    #[test]
    fn test_contains_requires_same_zone_and_hemisphere() {
        let cell = cell();
        assert!(!cell.contains(37, Hemisphere::North, 775000.0, 3525000.0));
        assert!(!cell.contains(36, Hemisphere::South, 775000.0, 3525000.0));
    }

    #[test]
    fn test_overlaps() {
        let cell = cell();
        let mut neighbour = cell.clone();
        neighbour.left = 780000.0;
        neighbour.right = 790000.0;
        assert!(!cell.overlaps(&neighbour));

        neighbour.left = 779000.0;
        assert!(cell.overlaps(&neighbour));

        neighbour.hemisphere = Hemisphere::South;
        assert!(!cell.overlaps(&neighbour));
    }

    #[test]
    fn test_validate() {
        assert!(cell().validate().is_ok());

        let mut bad = cell();
        bad.designator = "ABCD".to_string();
        assert!(matches!(
            bad.validate(),
            Err(CodeGridError::Validation { field: "designator", .. })
        ));

        let mut bad = cell();
        bad.zone = 0;
        assert!(matches!(
            bad.validate(),
            Err(CodeGridError::Validation { field: "zone", .. })
        ));

        let mut bad = cell();
        bad.right = bad.left;
        assert!(matches!(
            bad.validate(),
            Err(CodeGridError::Validation { field: "cell width", .. })
        ));

        let mut bad = cell();
        bad.top = bad.bottom + 10000.5;
        assert!(matches!(
            bad.validate(),
            Err(CodeGridError::Validation { field: "cell height", .. })
        ));
    }

    #[test]
    fn test_polygon() {
        let polygon = cell().to_polygon();
        assert_eq!(polygon.exterior().coords().count(), 5);
        assert_eq!(cell().width(), 10000.0);
        assert_eq!(cell().height(), 10000.0);
    }

    #[test]
    fn test_deserialize_grid_code_zone_alias() -> Result<(), serde_json::Error> {
        let json = r#"{"left":770000,"bottom":3520000,"right":780000,"top":3530000,"zone":36,"hemisphere":"N","gridCodeZone":"אבג"}"#;
        let cell: GridCodeCell = serde_json::from_str(json)?;

        assert_eq!(cell.designator, "אבג");
        assert_eq!(cell.hemisphere, Hemisphere::North);
        assert_eq!(cell.left, 770000.0);
        Ok(())
    }
}
