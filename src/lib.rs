//! # codegrid-rs
//!
//! Hierarchical grid codes over registered UTM cells. A grid code is a
//! three-character cell designator plus three two-digit tokens that address a
//! 10 m sub-cell, e.g. `"ABC 415963"`.
//!
//! There are currently three main entry points.
//!
//! ### 1. `CodeGrid` - Conversion Sessions
//!
//! A session owns the registered cells and the projection engine. Every
//! coordinate is created through it and converts to the other two forms.
//!
//! ```
//! use codegrid_rs::{CodeGrid, GridCodeCell, Hemisphere};
//!
//! # fn main() -> Result<(), codegrid_rs::CodeGridError> {
//! let grid = CodeGrid::new(vec![GridCodeCell::new(
//!     770000.0, 3520000.0, 780000.0, 3530000.0, 36, Hemisphere::North, "ABC",
//! )])?;
//!
//! let utm = grid.geodetic(35.9, 31.8)?.to_utm()?;
//! println!("{}", utm);
//!
//! let code = utm.to_grid_code()?;
//! assert_eq!(code.to_string(), "ABC 415963");
//!
//! let corner = code.to_geodetic()?;
//! println!("({}, {})", corner.longitude(), corner.latitude());
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `CellRegistry` - Cell Definitions
//!
//! Cells can be built in code or loaded from JSON:
//!
//! ```
//! use codegrid_rs::{CellRegistry, CodeGrid};
//!
//! # fn main() -> Result<(), codegrid_rs::CodeGridError> {
//! let registry = CellRegistry::from_json(r#"[
//!     {"left": 770000, "bottom": 3520000, "right": 780000, "top": 3530000,
//!      "zone": 36, "hemisphere": "N", "designator": "ABC"}
//! ]"#)?;
//! let grid = CodeGrid::from_registry(registry);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `CsvToGridCode` - CSV File Conversion
//!
//! ```no_run
//! use codegrid_rs::{CodeGrid, CsvGridCodeConfig, CsvToGridCode};
//!
//! # fn main() -> Result<(), codegrid_rs::CodeGridError> {
//! # let grid = CodeGrid::from_json("[]")?;
//! let config = CsvGridCodeConfig::from_utm("Zone", "Hemisphere", "Easting", "Northing")
//!     .exclude(vec!["Notes".into()]);
//!
//! "input.csv".to_grid_code_csv("output.csv", &grid, &config)?;
//! # Ok(())
//! # }
//! ```

pub mod cell;
pub mod coord;
pub mod error;
pub mod grid;
pub mod index;
pub mod io;
pub mod registry;
pub mod validate;

pub use cell::GridCodeCell;
pub use coord::{
    Coordinate, GEODETIC_CRS, Hemisphere, ProjEngine, ProjectionEngine, UTM_ZONE_WIDTH,
    utm_crs_id, utm_zone_for, zone_longitude_span,
};
pub use error::CodeGridError;
pub use grid::{CodeGrid, Geodetic, GridCode, Utm};
pub use index::{
    DESIGNATOR_LENGTH, LEVEL_WEIGHTS, MAX_CELL_SPAN, NUMBER_OF_SUB_LEVELS, RESOLUTION,
    SUB_LEVEL_LENGTH, SubLevel, SubLevels, decode_offset, encode_offset,
};
pub use io::{CoordinateSource, CsvGridCodeConfig, CsvToGridCode, csv_to_grid_code_csv};
pub use registry::{CellRegistry, CellRegistryBuilder};

pub use geo_types;
