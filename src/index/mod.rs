pub mod codec;
pub mod constants;

pub use codec::{SubLevel, SubLevels, decode, decode_offset, encode, encode_offset};
pub use constants::{
    DESIGNATOR_LENGTH, LEVEL_WEIGHTS, MAX_CELL_SPAN, NUMBER_OF_SUB_LEVELS, RESOLUTION,
    SUB_LEVEL_LENGTH,
};
