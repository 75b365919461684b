//! # placement-index
//!
//! Mixed-radix state indexing for gateway and UAV placements on a quantized site grid.
//! There are currently three main entry points.
//!
//! ### 1. `encode` / `Encoder` - Position Vector to State Index
//!
//! ```
//! use placement_index::{Encoder, GridShape, encode};
//!
//! # fn main() -> Result<(), placement_index::PlacementIndexError> {
//! // Two gateways on a 10 x 10 site at the 30 m flight level
//! let index = encode(2, &[500.0, 500.0, 30.0, 1500.0, 500.0, 30.0], 10, 10, 1)?;
//! assert_eq!(index.value(), 100);
//!
//! // Same thing, rejecting positions outside the grid
//! let encoder = Encoder::new(2, GridShape::new(10, 10, 1)?)?.strict();
//! assert!(encoder.encode_flat(&[500.0, 500.0, 30.0, 500.0, 500.0, 20.0]).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ### 2. `Encoder::table_index` - Simulator Observation to Q-table Slot
//!
//! ```
//! use placement_index::{Encoder, GridShape};
//!
//! # fn main() -> Result<(), placement_index::PlacementIndexError> {
//! let encoder = Encoder::new(1, GridShape::new(11, 11, 1)?)?;
//! let observation = [5000.0, 4000.0, 30.0];
//! assert_eq!(encoder.table_index(&observation)?, 49);
//! # Ok(())
//! # }
//! ```
//!
//! ### 3. `enumerate` - State Space Enumeration
//!
//! Encodes every ordered placement of distinct candidates, e.g. to size a state
//! table or to check that no two placements alias:
//!
//! ```no_run
//! use placement_index::{CandidateGrid, Encoder, GridShape, StatesToParquet, enumerate};
//!
//! # fn main() -> Result<(), placement_index::PlacementIndexError> {
//! let grid = CandidateGrid::standard();
//! let encoder = Encoder::new(3, GridShape::new(10, 10, 1)?)?;
//!
//! let states = enumerate(&encoder, &grid)?;
//! assert!(states.is_injective());
//! states.to_parquet(&grid, "states.parquet")?;
//! # Ok(())
//! # }
//! ```
//!

pub mod config;
pub mod coord;
pub mod enumerate;
pub mod error;
pub mod grid;
pub mod index;
pub mod io;

pub use config::{EncoderConfig, EnumerationConfig, SiteConfig};
pub use coord::{AgentPosition, Axis, Position, flatten_positions, positions_from_flat};
pub use enumerate::{EnumeratedState, Enumeration, enumerate};
pub use error::PlacementIndexError;
pub use grid::{CandidateGrid, CandidateGridBuilder, MAX_CANDIDATES};
pub use index::{
    AgentOrder, CellDigits, DEFAULT_X_CELL, DEFAULT_Y_CELL, DEFAULT_Z_CELL, DEFAULT_Z_OFFSET,
    Encoder, GridShape, QuantizationScale, STANDARD_ALTITUDE, STANDARD_GRID, STANDARD_SWEEP,
    StorageIndex, Strictness, encode,
};
pub use io::{StatesToArrow, StatesToParquet, write_parquet, write_states_csv};

pub use geo_types;
