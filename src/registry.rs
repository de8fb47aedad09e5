use crate::cell::GridCodeCell;
use crate::coord::Hemisphere;
use crate::error::CodeGridError;
use std::collections::HashMap;

/// The set of cells a grid session resolves points and designators against.
///
/// Built once from a non-empty list of cells and read-only afterwards. Every cell
/// is validated on registration, designators must be unique, and no two cells
/// of the same zone and hemisphere may overlap.
///
/// # Example
///
/// ```
/// use codegrid_rs::{CellRegistry, GridCodeCell, Hemisphere};
///
/// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
/// let registry = CellRegistry::builder()
///     .cell(GridCodeCell::new(770000.0, 3520000.0, 780000.0, 3530000.0, 36, Hemisphere::North, "ABC"))
///     .build()?;
///
/// let cell = registry.find_by_point(36, Hemisphere::North, 774565.0, 3521931.0)?;
/// assert_eq!(cell.designator, "ABC");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CellRegistry {
    cells: Vec<GridCodeCell>,
    by_designator: HashMap<String, usize>,
}

impl CellRegistry {
    pub fn builder() -> CellRegistryBuilder {
        CellRegistryBuilder::new()
    }

    /// Registers `cells` in the given order.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Validation`] - The list is empty, a cell is malformed, a
    ///   designator repeats, or two cells overlap
    pub fn new(cells: Vec<GridCodeCell>) -> Result<Self, CodeGridError> {
        if cells.is_empty() {
            return Err(CodeGridError::validation(
                "cells",
                "should contain at least one cell",
            ));
        }

        let mut by_designator = HashMap::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            cell.validate()?;

            if by_designator.insert(cell.designator.clone(), index).is_some() {
                return Err(CodeGridError::validation(
                    "designator",
                    format!("'{}' is registered more than once", cell.designator),
                ));
            }

            if let Some(other) = cells[..index].iter().find(|other| other.overlaps(cell)) {
                return Err(CodeGridError::validation(
                    "cells",
                    format!(
                        "cell '{}' overlaps cell '{}' in zone {}{}",
                        cell.designator, other.designator, cell.zone, cell.hemisphere
                    ),
                ));
            }
        }

        tracing::debug!(cells = cells.len(), "registered grid code cells");
        Ok(Self {
            cells,
            by_designator,
        })
    }

    /// Parses a JSON array of cell definitions and registers them.
    ///
    /// Accepts `designator` or `gridCodeZone` for the designator field.
    ///
    /// # Example
    /// ```
    /// use codegrid_rs::CellRegistry;
    ///
    /// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
    /// let registry = CellRegistry::from_json(r#"[
    ///     {"left": 770000, "bottom": 3520000, "right": 780000, "top": 3530000,
    ///      "zone": 36, "hemisphere": "N", "gridCodeZone": "ABC"}
    /// ]"#)?;
    /// assert_eq!(registry.len(), 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, CodeGridError> {
        let cells: Vec<GridCodeCell> = serde_json::from_str(json)
            .map_err(|e| CodeGridError::CellParseError(e.to_string()))?;
        Self::new(cells)
    }

    /// Looks up the cell registered under `designator`.
    pub fn find_by_designator(&self, designator: &str) -> Result<&GridCodeCell, CodeGridError> {
        self.by_designator
            .get(designator)
            .map(|&index| &self.cells[index])
            .ok_or_else(|| {
                CodeGridError::NotFound(format!(
                    "Could not find a grid cell for designator '{designator}'"
                ))
            })
    }

    /// Finds the cell containing a UTM position.
    ///
    /// Containment is half-open on both axes; cells are scanned in registration
    /// order and the first match wins.
    pub fn find_by_point(
        &self,
        zone: u8,
        hemisphere: Hemisphere,
        easting: f64,
        northing: f64,
    ) -> Result<&GridCodeCell, CodeGridError> {
        self.cells
            .iter()
            .find(|cell| cell.contains(zone, hemisphere, easting, northing))
            .ok_or_else(|| {
                CodeGridError::NotFound(format!(
                    "Could not find a containing grid cell for {zone}{hemisphere} ({easting}, {northing})"
                ))
            })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCodeCell] {
        &self.cells
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCodeCell> {
        self.cells.iter()
    }
}

#[derive(Debug, Default)]
pub struct CellRegistryBuilder {
    cells: Vec<GridCodeCell>,
}

impl CellRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cell(mut self, cell: GridCodeCell) -> Self {
        self.cells.push(cell);
        self
    }

    pub fn cells(mut self, cells: impl IntoIterator<Item = GridCodeCell>) -> Self {
        self.cells.extend(cells);
        self
    }

    pub fn build(self) -> Result<CellRegistry, CodeGridError> {
        CellRegistry::new(self.cells)
    }
}
