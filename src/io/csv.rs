use crate::coord::Hemisphere;
use crate::error::CodeGridError;
use crate::grid::{CodeGrid, GridCode};
use csv::StringRecord;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

enum SourceIndices {
    Geodetic {
        lon_idx: usize,
        lat_idx: usize,
    },
    Utm {
        zone_idx: usize,
        hemisphere_idx: usize,
        easting_idx: usize,
        northing_idx: usize,
    },
}

#[derive(Debug, Clone)]
pub enum CoordinateSource {
    /// Longitude and latitude columns in degrees
    Geodetic {
        lon_column: String,
        lat_column: String,
    },
    /// Zone, hemisphere (`N`/`S`), easting and northing columns
    Utm {
        zone_column: String,
        hemisphere_column: String,
        easting_column: String,
        northing_column: String,
    },
}

#[derive(Debug, Clone)]
pub struct CsvGridCodeConfig {
    pub source: CoordinateSource,
    pub exclude_columns: Vec<String>,
    pub skip_unmatched: bool,
}

impl CsvGridCodeConfig {
    /// Create config for a CSV with longitude/latitude columns.
    ///
    /// # Example
    /// ```
    /// use codegrid_rs::CsvGridCodeConfig;
    ///
    /// let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude");
    /// ```
    pub fn from_geodetic(lon_column: impl Into<String>, lat_column: impl Into<String>) -> Self {
        Self {
            source: CoordinateSource::Geodetic {
                lon_column: lon_column.into(),
                lat_column: lat_column.into(),
            },
            exclude_columns: Vec::new(),
            skip_unmatched: false,
        }
    }

    /// Create config for a CSV with UTM columns.
    ///
    /// # Example
    /// ```
    /// use codegrid_rs::CsvGridCodeConfig;
    ///
    /// let config = CsvGridCodeConfig::from_utm("Zone", "Hemisphere", "Easting", "Northing")
    ///     .exclude(vec!["Notes".into()]);
    /// ```
    pub fn from_utm(
        zone_column: impl Into<String>,
        hemisphere_column: impl Into<String>,
        easting_column: impl Into<String>,
        northing_column: impl Into<String>,
    ) -> Self {
        Self {
            source: CoordinateSource::Utm {
                zone_column: zone_column.into(),
                hemisphere_column: hemisphere_column.into(),
                easting_column: easting_column.into(),
                northing_column: northing_column.into(),
            },
            exclude_columns: Vec::new(),
            skip_unmatched: false,
        }
    }

    pub fn exclude(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    /// Write an empty `grid_code` for rows outside every registered cell
    /// instead of failing the whole file.
    pub fn skip_unmatched(mut self) -> Self {
        self.skip_unmatched = true;
        self
    }
}

pub trait CsvToGridCode {
    fn to_grid_code_csv(
        &self,
        output_path: impl AsRef<Path>,
        grid: &CodeGrid,
        config: &CsvGridCodeConfig,
    ) -> Result<(), CodeGridError>;
}

impl<P: AsRef<Path>> CsvToGridCode for P {
    fn to_grid_code_csv(
        &self,
        output_path: impl AsRef<Path>,
        grid: &CodeGrid,
        config: &CsvGridCodeConfig,
    ) -> Result<(), CodeGridError> {
        csv_to_grid_code_csv(self, output_path, grid, config)
    }
}

fn column_index(headers: &StringRecord, name: &str) -> Result<usize, CodeGridError> {
    if name.is_empty() {
        return Err(CodeGridError::CsvError(
            "Column name cannot be empty".to_string(),
        ));
    }
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| CodeGridError::CsvError(format!("Column '{}' not found", name)))
}

fn field<'r>(record: &'r StringRecord, idx: usize, row: usize) -> Result<&'r str, CodeGridError> {
    record
        .get(idx)
        .map(str::trim)
        .ok_or_else(|| CodeGridError::CsvError(format!("Row {}: missing column at index {}", row, idx)))
}

fn parse_field<T: std::str::FromStr>(
    record: &StringRecord,
    idx: usize,
    row: usize,
    what: &str,
) -> Result<T, CodeGridError> {
    let value = field(record, idx, row)?;
    value
        .parse()
        .map_err(|_| CodeGridError::CsvError(format!("Row {}: invalid {}: '{}'", row, what, value)))
}

/// Prefixes the row number to a conversion error, keeping its variant.
fn at_row(error: CodeGridError, row: usize) -> CodeGridError {
    match error {
        CodeGridError::Validation { field, message } => CodeGridError::Validation {
            field,
            message: format!("Row {}: {}", row, message),
        },
        CodeGridError::Range { field, message } => CodeGridError::Range {
            field,
            message: format!("Row {}: {}", row, message),
        },
        CodeGridError::NotFound(message) => {
            CodeGridError::NotFound(format!("Row {}: {}", row, message))
        }
        CodeGridError::ProjectionError(message) => {
            CodeGridError::ProjectionError(format!("Row {}: {}", row, message))
        }
        // CSV errors already carry their row.
        other => other,
    }
}

fn encode_record<'g>(
    grid: &'g CodeGrid,
    source: &SourceIndices,
    record: &StringRecord,
    row: usize,
) -> Result<GridCode<'g>, CodeGridError> {
    match *source {
        SourceIndices::Geodetic { lon_idx, lat_idx } => {
            let lon: f64 = parse_field(record, lon_idx, row, "longitude")?;
            let lat: f64 = parse_field(record, lat_idx, row, "latitude")?;
            grid.geodetic(lon, lat)?.to_grid_code()
        }
        SourceIndices::Utm {
            zone_idx,
            hemisphere_idx,
            easting_idx,
            northing_idx,
        } => {
            let zone: u8 = parse_field(record, zone_idx, row, "zone")?;
            let hemisphere: Hemisphere = field(record, hemisphere_idx, row)?.parse()?;
            let easting: f64 = parse_field(record, easting_idx, row, "easting")?;
            let northing: f64 = parse_field(record, northing_idx, row, "northing")?;
            grid.utm(zone, hemisphere, easting, northing)?.to_grid_code()
        }
    }
}

/// Converts a CSV file with coordinate columns to a CSV file with grid codes.
///
/// The output starts with a `grid_code` column holding the textual code
/// (`"<designator> <six digits>"`), followed by every input column except the
/// coordinate columns and any listed in `exclude_columns`. Rows are streamed,
/// so large files are never held in memory.
///
/// # Example
///
/// ```no_run
/// use codegrid_rs::{CodeGrid, CsvGridCodeConfig, csv_to_grid_code_csv};
///
/// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
/// let grid = CodeGrid::from_json(&std::fs::read_to_string("cells.json").unwrap())?;
/// let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude");
///
/// csv_to_grid_code_csv("sites.csv", "sites_coded.csv", &grid, &config)?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Fails on the first row that cannot be converted, naming the row (1-based,
/// excluding the header). Rows outside every cell are an error unless
/// [`CsvGridCodeConfig::skip_unmatched`] is set.
pub fn csv_to_grid_code_csv(
    csv_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    grid: &CodeGrid,
    config: &CsvGridCodeConfig,
) -> Result<(), CodeGridError> {
    let file = File::open(csv_path).map_err(|e| CodeGridError::IoError(e.to_string()))?;
    let mut reader = csv::Reader::from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| CodeGridError::CsvError(e.to_string()))?
        .clone();

    let source = match &config.source {
        CoordinateSource::Geodetic {
            lon_column,
            lat_column,
        } => SourceIndices::Geodetic {
            lon_idx: column_index(&headers, lon_column)?,
            lat_idx: column_index(&headers, lat_column)?,
        },
        CoordinateSource::Utm {
            zone_column,
            hemisphere_column,
            easting_column,
            northing_column,
        } => SourceIndices::Utm {
            zone_idx: column_index(&headers, zone_column)?,
            hemisphere_idx: column_index(&headers, hemisphere_column)?,
            easting_idx: column_index(&headers, easting_column)?,
            northing_idx: column_index(&headers, northing_column)?,
        },
    };

    let mut exclude_indices: HashSet<usize> = match source {
        SourceIndices::Geodetic { lon_idx, lat_idx } => [lon_idx, lat_idx].into(),
        SourceIndices::Utm {
            zone_idx,
            hemisphere_idx,
            easting_idx,
            northing_idx,
        } => [zone_idx, hemisphere_idx, easting_idx, northing_idx].into(),
    };
    for col_name in &config.exclude_columns {
        if let Some(idx) = headers.iter().position(|h| h == col_name) {
            exclude_indices.insert(idx);
        }
    }

    let out_file =
        File::create(output_path).map_err(|e| CodeGridError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row: Vec<&str> = vec!["grid_code"];
    for (i, h) in headers.iter().enumerate() {
        if !exclude_indices.contains(&i) {
            header_row.push(h);
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| CodeGridError::CsvError(e.to_string()))?;

    let mut rows = 0usize;
    let mut unmatched = 0usize;
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| CodeGridError::CsvError(e.to_string()))?;

        let code = match encode_record(grid, &source, &record, row) {
            Ok(code) => code.to_string(),
            Err(CodeGridError::NotFound(message)) if config.skip_unmatched => {
                tracing::warn!(row, %message, "row is outside every grid cell");
                unmatched += 1;
                String::new()
            }
            Err(e) => return Err(at_row(e, row)),
        };

        let mut out: Vec<&str> = vec![code.as_str()];
        for (col, value) in record.iter().enumerate() {
            if !exclude_indices.contains(&col) {
                out.push(value);
            }
        }
        writer
            .write_record(&out)
            .map_err(|e| CodeGridError::CsvError(e.to_string()))?;
        rows += 1;
    }

    writer
        .flush()
        .map_err(|e| CodeGridError::IoError(e.to_string()))?;

    tracing::info!(rows, unmatched, "wrote grid code csv");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::tests::test_grid;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_input(path: &Path, lines: &[&str]) -> Result<(), CodeGridError> {
        let mut file = File::create(path).map_err(|e| CodeGridError::IoError(e.to_string()))?;
        for line in lines {
            writeln!(file, "{}", line).map_err(|e| CodeGridError::IoError(e.to_string()))?;
        }
        Ok(())
    }

    fn read_output(path: &Path) -> Result<Vec<String>, CodeGridError> {
        let output =
            std::fs::read_to_string(path).map_err(|e| CodeGridError::IoError(e.to_string()))?;
        Ok(output.lines().map(str::to_string).collect())
    }

    #[test]
    fn test_csv_from_geodetic() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(
            &csv_path,
            &[
                "SiteId,Longitude,Latitude,Name",
                "S1,35.9,31.8,North site",
                "S2,35.9,-1.0,South site",
            ],
        )?;

        let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude");
        csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config)?;

        let lines = read_output(&output_path)?;
        assert_eq!(lines[0], "grid_code,SiteId,Name");
        assert_eq!(lines[1], "אבג 415963,S1,North site");
        assert_eq!(lines[2], "שום 297382,S2,South site");
        Ok(())
    }

    #[test]
    fn test_csv_from_utm_with_exclude() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(
            &csv_path,
            &[
                "Id,Zone,Hemisphere,Easting,Northing,Notes",
                "1,36,N,775000,3525000,centre",
                "2,37,S,175000,9885000,east",
            ],
        )?;

        let config = CsvGridCodeConfig::from_utm("Zone", "Hemisphere", "Easting", "Northing")
            .exclude(vec!["Notes".into()]);
        csv_path.to_grid_code_csv(&output_path, &grid, &config)?;

        let lines = read_output(&output_path)?;
        assert_eq!(lines, ["grid_code,Id", "אבג 550000,1", "אבי 550000,2"]);
        Ok(())
    }

    #[test]
    fn test_csv_unmatched_row_fails_with_row_number() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["Longitude,Latitude", "35.9,31.8", "80,80"])?;

        let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude");
        let err = csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).unwrap_err();

        assert!(matches!(err, CodeGridError::NotFound(_)));
        assert!(err.to_string().contains("Row 2"));
        Ok(())
    }

    #[test]
    fn test_csv_skip_unmatched() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["Id,Longitude,Latitude", "a,80,80", "b,35.9,31.8"])?;

        let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude").skip_unmatched();
        csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config)?;

        let lines = read_output(&output_path)?;
        assert_eq!(lines, ["grid_code,Id", ",a", "אבג 415963,b"]);
        Ok(())
    }

    #[test]
    fn test_csv_bad_values() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["Zone,Hemisphere,Easting,Northing", "36,X,775000,3525000"])?;
        let config = CsvGridCodeConfig::from_utm("Zone", "Hemisphere", "Easting", "Northing");
        let err = csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).unwrap_err();
        assert!(matches!(err, CodeGridError::Validation { field: "hemisphere", .. }));
        assert!(err.to_string().contains("Row 1"));

        write_input(
            &csv_path,
            &["Zone,Hemisphere,Easting,Northing", "36,N,775000,3525000", "36,N,795000,3525000"],
        )?;
        let err = csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).unwrap_err();
        assert!(matches!(err, CodeGridError::Range { field: "longitude", .. }));
        assert!(err.to_string().contains("Row 2"));

        write_input(&csv_path, &["Longitude,Latitude", "east,31.8"])?;
        let config = CsvGridCodeConfig::from_geodetic("Longitude", "Latitude");
        let err = csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).unwrap_err();
        assert!(err.to_string().contains("invalid longitude"));
        Ok(())
    }

    #[test]
    fn test_csv_missing_column() -> Result<(), CodeGridError> {
        let grid = test_grid()?;
        let dir = tempdir().map_err(|e| CodeGridError::IoError(e.to_string()))?;
        let csv_path = dir.path().join("sites.csv");
        let output_path = dir.path().join("output.csv");

        write_input(&csv_path, &["Lon,Lat", "35.9,31.8"])?;

        let config = CsvGridCodeConfig::from_geodetic("Longitude", "Lat");
        let err = csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).unwrap_err();
        assert!(err.to_string().contains("Column 'Longitude' not found"));

        let config = CsvGridCodeConfig::from_geodetic("", "Lat");
        assert!(csv_to_grid_code_csv(&csv_path, &output_path, &grid, &config).is_err());
        Ok(())
    }
}
