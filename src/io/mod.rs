pub mod csv;

pub use csv::{CoordinateSource, CsvGridCodeConfig, CsvToGridCode, csv_to_grid_code_csv};
