use codegrid_rs::{CodeGrid, CodeGridError, GridCodeCell, Hemisphere};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<(), CodeGridError> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let grid = CodeGrid::new(vec![GridCodeCell::new(
        770000.0,
        3520000.0,
        780000.0,
        3530000.0,
        36,
        Hemisphere::North,
        "ABC",
    )])?;

    let lon = 35.9;
    let lat = 31.8;

    let utm = grid.geodetic(lon, lat)?.to_utm()?;
    println!("UTM: {}", utm);

    let code = utm.to_grid_code()?;
    println!("Grid code: {}", code);
    println!("Tokens: {:?}", code.tokens());

    let corner = code.to_utm()?;
    println!("Sub-cell corner: ({}, {})", corner.easting(), corner.northing());

    let corner = corner.to_geodetic()?;
    println!("Sub-cell corner (WGS84): ({}, {})", corner.longitude(), corner.latitude());

    let polygon = code.cell().to_polygon();
    println!("Cell polygon: {:?}", polygon);

    Ok(())
}
