pub mod constants;
mod encoder;
mod quantize;

pub use constants::{
    DEFAULT_X_CELL, DEFAULT_Y_CELL, DEFAULT_Z_CELL, DEFAULT_Z_OFFSET, STANDARD_ALTITUDE,
    STANDARD_GRID, STANDARD_SWEEP,
};
pub use encoder::{AgentOrder, Encoder, StorageIndex, Strictness, encode};
pub use quantize::{CellDigits, GridShape, QuantizationScale};
