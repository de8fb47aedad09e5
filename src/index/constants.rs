/// Number of nested sub-levels in a grid code
pub const NUMBER_OF_SUB_LEVELS: usize = 3;

/// Place value in meters of each sub-level digit, coarsest first (`1000 / 10^level`)
pub const LEVEL_WEIGHTS: [u32; NUMBER_OF_SUB_LEVELS] = [1000, 100, 10];

/// Smallest resolvable distance in meters
pub const RESOLUTION: u32 = 10;

/// Largest offset (exclusive) from a cell's south-west corner a grid code can address
pub const MAX_CELL_SPAN: f64 = 10_000.0;

/// Number of characters in a zone designator
pub const DESIGNATOR_LENGTH: usize = 3;

/// Number of characters in a sub-level token
pub const SUB_LEVEL_LENGTH: usize = 2;
