use crate::cell::GridCodeCell;
use crate::error::CodeGridError;
use crate::grid::{CodeGrid, Geodetic, Utm};
use crate::index::{NUMBER_OF_SUB_LEVELS, SUB_LEVEL_LENGTH, SubLevels, decode};
use crate::validate::{validate_designator, validate_sub_level_digits};
use std::fmt;

/// A grid code: a registered cell designator plus three sub-level tokens.
///
/// Each token holds one easting and one northing digit. Together they address
/// the south-west corner of a 10 m sub-cell inside the designated cell.
///
/// # Example
///
/// ```
/// use codegrid_rs::{CodeGrid, GridCodeCell, Hemisphere};
///
/// # fn main() -> Result<(), codegrid_rs::CodeGridError> {
/// let grid = CodeGrid::new(vec![GridCodeCell::new(
///     770000.0, 3520000.0, 780000.0, 3530000.0, 36, Hemisphere::North, "ABC",
/// )])?;
///
/// let code = grid.parse_grid_code("ABC 415963")?;
/// assert_eq!(code.designator(), "ABC");
/// assert_eq!(code.tokens(), ["41", "59", "63"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct GridCode<'g> {
    grid: &'g CodeGrid,
    cell: &'g GridCodeCell,
    sub_levels: SubLevels,
}

impl<'g> GridCode<'g> {
    pub(crate) fn new(
        grid: &'g CodeGrid,
        designator: &str,
        sub_levels: [&str; NUMBER_OF_SUB_LEVELS],
    ) -> Result<Self, CodeGridError> {
        let designator = validate_designator(designator)?;
        let [first, second, third] = sub_levels;
        let sub_levels = [
            validate_sub_level_digits(first)?,
            validate_sub_level_digits(second)?,
            validate_sub_level_digits(third)?,
        ];
        let cell = grid.registry().find_by_designator(designator)?;

        Ok(Self::from_parts(grid, cell, sub_levels))
    }

    pub(crate) fn from_parts(
        grid: &'g CodeGrid,
        cell: &'g GridCodeCell,
        sub_levels: SubLevels,
    ) -> Self {
        Self {
            grid,
            cell,
            sub_levels,
        }
    }

    /// Parses `"<designator> <six digits>"`, the form written by `Display`.
    ///
    /// The digits are split off at the last space, so designators containing
    /// spaces round-trip. Only trailing whitespace is ignored.
    pub(crate) fn parse(grid: &'g CodeGrid, text: &str) -> Result<Self, CodeGridError> {
        let malformed = || {
            CodeGridError::validation(
                "grid code",
                format!("should look like '<designator> <6 digits>', got '{text}'"),
            )
        };

        let (designator, digits) = text.trim_end().rsplit_once(' ').ok_or_else(malformed)?;
        let digits: Vec<char> = digits.chars().collect();
        if digits.len() != NUMBER_OF_SUB_LEVELS * SUB_LEVEL_LENGTH {
            return Err(malformed());
        }

        let tokens: Vec<String> = digits
            .chunks(SUB_LEVEL_LENGTH)
            .map(|pair| pair.iter().collect())
            .collect();
        Self::new(
            grid,
            designator,
            [tokens[0].as_str(), tokens[1].as_str(), tokens[2].as_str()],
        )
    }

    pub fn designator(&self) -> &'g str {
        &self.cell.designator
    }

    pub fn sub_levels(&self) -> &SubLevels {
        &self.sub_levels
    }

    /// The three two-digit tokens, coarsest first.
    pub fn tokens(&self) -> [String; NUMBER_OF_SUB_LEVELS] {
        self.sub_levels.map(|level| level.to_string())
    }

    /// The registered cell this code is relative to.
    pub fn cell(&self) -> &'g GridCodeCell {
        self.cell
    }

    pub fn to_grid_code(&self) -> GridCode<'g> {
        *self
    }

    /// Decodes to the UTM position of the addressed sub-cell's south-west corner.
    ///
    /// # Errors
    ///
    /// - [`CodeGridError::Range`] - The digits point past the edge of a cell
    ///   narrower than 10 km, or the corner fails the UTM consistency checks
    pub fn to_utm(&self) -> Result<Utm<'g>, CodeGridError> {
        let (easting, northing) = decode(self.cell, &self.sub_levels)?;
        Utm::new(
            self.grid,
            self.cell.zone,
            self.cell.hemisphere,
            easting,
            northing,
        )
    }

    pub fn to_geodetic(&self) -> Result<Geodetic<'g>, CodeGridError> {
        self.to_utm()?.to_geodetic()
    }
}

impl fmt::Display for GridCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [first, second, third] = &self.sub_levels;
        write!(f, "{} {first}{second}{third}", self.cell.designator)
    }
}

impl fmt::Debug for GridCode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridCode")
            .field("designator", &self.cell.designator)
            .field("sub_levels", &self.tokens())
            .finish()
    }
}

impl PartialEq for GridCode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cell.designator == other.cell.designator && self.sub_levels == other.sub_levels
    }
}
