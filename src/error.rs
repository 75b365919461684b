use crate::coord::Axis;
use thiserror::Error;

/// Error type for placement-index operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlacementIndexError {
    /// The flat position vector does not hold exactly three scalars per agent.
    #[error("Invalid input length: expected {expected} values, got {actual}")]
    InvalidInputLength { expected: usize, actual: usize },
    /// The agent count is zero.
    #[error("Invalid agent count: {0}")]
    InvalidAgentCount(usize),
    /// One of the grid dimensions is zero.
    #[error("Invalid grid shape: {lines}x{columns}x{altitudes}")]
    InvalidGridShape {
        lines: u32,
        columns: u32,
        altitudes: u32,
    },
    /// A quantization cell size is not a positive finite number.
    #[error("Invalid scale: {0}")]
    InvalidScale(String),
    /// A coordinate is NaN or infinite.
    #[error("Non-finite {axis} coordinate for agent {agent}")]
    NonFiniteCoordinate { agent: usize, axis: Axis },
    /// A quantized digit falls outside its grid dimension (strict mode only).
    #[error("Agent {agent} {axis} digit {digit} outside [0, {bound})")]
    OutOfRangeCoordinate {
        agent: usize,
        axis: Axis,
        digit: i64,
        bound: u32,
    },
    /// The composed index does not fit the integer width.
    #[error("Storage index overflow")]
    IndexOverflow,
    /// The index does not address a slot of the state table.
    #[error("Storage index {index} outside state table of size {size}")]
    IndexOutOfTable { index: i128, size: u128 },
    /// The candidate grid has no positions to enumerate.
    #[error("Candidate grid is empty")]
    EmptyCandidateGrid,
    /// Configuration file could not be read or parsed.
    #[error("Config error: {0}")]
    ConfigError(String),
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(String),
    /// CSV writing error.
    #[error("CSV error: {0}")]
    CsvError(String),
    /// Arrow or Parquet encoding error.
    #[error("Arrow error: {0}")]
    ArrowError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = PlacementIndexError::InvalidInputLength {
            expected: 6,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Invalid input length: expected 6 values, got 5");

        let err = PlacementIndexError::OutOfRangeCoordinate {
            agent: 1,
            axis: Axis::Z,
            digit: -1,
            bound: 1,
        };
        assert_eq!(err.to_string(), "Agent 1 z digit -1 outside [0, 1)");
    }
}
