use crate::cell::GridCodeCell;
use crate::error::CodeGridError;
use crate::index::constants::{LEVEL_WEIGHTS, MAX_CELL_SPAN, NUMBER_OF_SUB_LEVELS, RESOLUTION};
use std::fmt;

/// How close, in 10 m steps, an offset must be to a step boundary to count as
/// lying on it. Absorbs rounding in `corner + offset - corner` for fractional
/// cell origins.
const SNAP_TOLERANCE: f64 = 1e-6;

/// One level of a grid code: an easting digit and a northing digit, each 0-9.
///
/// Rendered as the two-character token used in grid code strings, easting first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubLevel {
    easting: u8,
    northing: u8,
}

impl SubLevel {
    pub(crate) fn new(easting: u8, northing: u8) -> Self {
        Self { easting, northing }
    }

    pub fn easting_digit(&self) -> u8 {
        self.easting
    }

    pub fn northing_digit(&self) -> u8 {
        self.northing
    }
}

impl fmt::Display for SubLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.easting, self.northing)
    }
}

/// The three sub-levels of a grid code, coarsest first.
pub type SubLevels = [SubLevel; NUMBER_OF_SUB_LEVELS];

/// Encodes a planar offset from a cell's south-west corner into sub-level digits.
///
/// # Process
///
/// 1. Quantizes each offset down to the 10 m grid (`q = floor(offset / 10)`).
///    An offset within 10 µm below a 10 m step counts as on it, so
///    corners decoded from cells with fractional edges re-encode exactly
/// 2. Extracts one decimal digit per level as `(q * 10 / weight) mod 10`,
///    for weights 1000, 100 and 10 meters
/// 3. Pairs the easting and northing digit of each level
///
/// The meter digit is dropped, so decoding the result lands on the south-west
/// corner of the 10 m sub-cell containing the offset.
///
/// # Example
/// ```
/// use codegrid_rs::encode_offset;
///
/// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
/// let levels = encode_offset(4565.9, 1931.0)?;
/// let tokens: Vec<String> = levels.iter().map(|l| l.to_string()).collect();
/// assert_eq!(tokens, ["41", "59", "63"]);
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// - [`CodeGridError::Range`] - An offset is negative or not finite (the point is
///   not inside the cell), or reaches 10 000 m and would need a fourth digit
pub fn encode_offset(dx: f64, dy: f64) -> Result<SubLevels, CodeGridError> {
    let east = quantize("easting offset", dx)?;
    let north = quantize("northing offset", dy)?;

    Ok(std::array::from_fn(|level| {
        SubLevel::new(place_digit(east, level), place_digit(north, level))
    }))
}

/// Sums the weighted sub-level digits back into an offset from the cell's
/// south-west corner. Exact for every digit combination.
pub fn decode_offset(sub_levels: &SubLevels) -> (f64, f64) {
    sub_levels
        .iter()
        .zip(LEVEL_WEIGHTS)
        .fold((0.0, 0.0), |(dx, dy), (level, weight)| {
            let weight = f64::from(weight);
            (
                dx + f64::from(level.easting) * weight,
                dy + f64::from(level.northing) * weight,
            )
        })
}

/// Encodes a UTM position inside `cell`.
pub fn encode(cell: &GridCodeCell, easting: f64, northing: f64) -> Result<SubLevels, CodeGridError> {
    let sub_levels = encode_offset(easting - cell.left, northing - cell.bottom)?;
    tracing::trace!(
        designator = %cell.designator,
        easting,
        northing,
        "encoded grid code"
    );
    Ok(sub_levels)
}

/// Decodes sub-levels against `cell`, returning the `(easting, northing)` of the
/// sub-cell's south-west corner.
///
/// # Errors
///
/// - [`CodeGridError::Range`] - The digits address a point beyond the cell's
///   right or top edge (only possible for cells narrower than 10 km)
pub fn decode(cell: &GridCodeCell, sub_levels: &SubLevels) -> Result<(f64, f64), CodeGridError> {
    let (dx, dy) = decode_offset(sub_levels);
    let easting = cell.left + dx;
    let northing = cell.bottom + dy;

    if easting >= cell.right || northing >= cell.top {
        return Err(CodeGridError::range(
            "grid code",
            format!(
                "decoded point ({easting}, {northing}) lies outside cell '{}' [{}, {}) x [{}, {})",
                cell.designator, cell.left, cell.right, cell.bottom, cell.top
            ),
        ));
    }

    Ok((easting, northing))
}

fn quantize(field: &'static str, offset: f64) -> Result<u32, CodeGridError> {
    if !offset.is_finite() || offset < 0.0 {
        return Err(CodeGridError::range(
            field,
            format!("should be non-negative, got {offset} (point is not inside its cell)"),
        ));
    }
    // A quantized value of 1000 or more needs a fourth digit.
    if offset >= MAX_CELL_SPAN {
        return Err(CodeGridError::range(
            field,
            format!("should be below {MAX_CELL_SPAN} m, got {offset}"),
        ));
    }

    let steps = offset / f64::from(RESOLUTION);
    let nearest = steps.round();
    let max_steps = MAX_CELL_SPAN / f64::from(RESOLUTION);
    if (steps - nearest).abs() < SNAP_TOLERANCE && nearest < max_steps {
        Ok(nearest as u32)
    } else {
        Ok(steps.floor() as u32)
    }
}

fn place_digit(quantized: u32, level: usize) -> u8 {
    ((quantized * RESOLUTION / LEVEL_WEIGHTS[level]) % 10) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Hemisphere;
    use proptest::prelude::*;

    fn abc_cell() -> GridCodeCell {
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

    fn levels_for(east: u32, north: u32) -> SubLevels {
        std::array::from_fn(|level| {
            SubLevel::new(place_digit(east, level), place_digit(north, level))
        })
    }

    fn tokens(levels: &SubLevels) -> Vec<String> {
        levels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_encode_reference_point() -> Result<(), CodeGridError> {
        let levels = encode(&abc_cell(), 774565.0, 3521931.0)?;
        assert_eq!(tokens(&levels), ["41", "59", "63"]);
        Ok(())
    }

    #[test]
    fn test_decode_reference_code() -> Result<(), CodeGridError> {
        let levels = [SubLevel::new(4, 1), SubLevel::new(5, 9), SubLevel::new(6, 3)];
        let (easting, northing) = decode(&abc_cell(), &levels)?;

        assert_eq!(easting, 774560.0);
        assert_eq!(northing, 3521930.0);
        Ok(())
    }

    #[test]
    fn test_encode_drops_meter_digit() -> Result<(), CodeGridError> {
        assert_eq!(tokens(&encode_offset(9.99, 0.0)?), ["00", "00", "00"]);
        assert_eq!(tokens(&encode_offset(10.0, 0.0)?), ["00", "00", "10"]);
        assert_eq!(tokens(&encode_offset(5000.0, 5000.0)?), ["55", "00", "00"]);
        assert_eq!(tokens(&encode_offset(9999.9, 9999.9)?), ["99", "99", "99"]);
        Ok(())
    }

    #[test]
    fn test_encode_rejects_negative_offset() {
        let result = encode(&abc_cell(), 769999.0, 3521931.0);
        assert!(matches!(
            result,
            Err(CodeGridError::Range { field: "easting offset", .. })
        ));
    }

    #[test]
    fn test_encode_rejects_overflow() {
        let result = encode_offset(0.0, 10000.0);
        assert!(matches!(
            result,
            Err(CodeGridError::Range { field: "northing offset", .. })
        ));
    }

    #[test]
    fn test_decode_then_encode_with_fractional_origin() -> Result<(), CodeGridError> {
        let cell = GridCodeCell::new(
            123456.789,
            9876543.21,
            133456.789,
            9886543.21,
            37,
            Hemisphere::South,
            "FRC",
        );

        for east in 0..1000 {
            let levels = levels_for(east, 999 - east);
            let (easting, northing) = decode(&cell, &levels)?;
            assert_eq!(encode(&cell, easting, northing)?, levels, "step {east}");
        }
        Ok(())
    }

    #[test]
    fn test_encode_snaps_only_near_step_boundaries() -> Result<(), CodeGridError> {
        assert_eq!(tokens(&encode_offset(7619.999999999985, 0.0)?), ["70", "60", "20"]);
        assert_eq!(tokens(&encode_offset(7619.99, 0.0)?), ["70", "60", "10"]);
        assert_eq!(tokens(&encode_offset(9999.99999999999, 0.0)?), ["90", "90", "90"]);
        Ok(())
    }

    #[test]
    fn test_encode_rejects_nan() {
        assert!(encode_offset(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_decode_outside_narrow_cell() {
        let narrow = GridCodeCell::new(0.0, 0.0, 5000.0, 5000.0, 31, Hemisphere::North, "NAR");
        let levels = [SubLevel::new(7, 0), SubLevel::new(0, 0), SubLevel::new(0, 0)];

        assert!(matches!(
            decode(&narrow, &levels),
            Err(CodeGridError::Range { field: "grid code", .. })
        ));
    }

    fn digit() -> impl Strategy<Value = u8> {
        0u8..10
    }

    fn sub_levels() -> impl Strategy<Value = SubLevels> {
        prop::array::uniform3((digit(), digit()).prop_map(|(e, n)| SubLevel::new(e, n)))
    }

    fn fractional_cell() -> impl Strategy<Value = GridCodeCell> {
        (100000.0f64..890000.0, 0.0f64..9990000.0).prop_map(|(left, bottom)| {
            GridCodeCell::new(
                left,
                bottom,
                left + MAX_CELL_SPAN,
                bottom + MAX_CELL_SPAN,
                33,
                Hemisphere::South,
                "FRC",
            )
        })
    }

    proptest! {
        #[test]
        fn prop_decode_then_encode_is_exact(levels in sub_levels()) {
            let cell = abc_cell();
            let (easting, northing) = decode(&cell, &levels).unwrap();
            prop_assert_eq!(encode(&cell, easting, northing).unwrap(), levels);
        }

        #[test]
        fn prop_decode_then_encode_is_exact_for_any_origin(
            cell in fractional_cell(),
            levels in sub_levels(),
        ) {
            let (easting, northing) = decode(&cell, &levels).unwrap();
            prop_assert_eq!(encode(&cell, easting, northing).unwrap(), levels);
        }

        #[test]
        fn prop_encode_then_decode_within_resolution(
            dx in 0.0f64..9999.0,
            dy in 0.0f64..9999.0,
        ) {
            let cell = abc_cell();
            let (easting, northing) = (cell.left + dx, cell.bottom + dy);

            let levels = encode(&cell, easting, northing).unwrap();
            let (decoded_e, decoded_n) = decode(&cell, &levels).unwrap();

            prop_assert!(decoded_e - easting < 1e-4 && easting - decoded_e < 10.0);
            prop_assert!(decoded_n - northing < 1e-4 && northing - decoded_n < 10.0);
            prop_assert!(cell.contains(36, Hemisphere::North, decoded_e, decoded_n));
        }
    }
}
