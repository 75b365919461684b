use crate::error::PlacementIndexError;
use geo_types::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three axes of a site position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Trait for types that can provide x/y/z site coordinates.
///
/// Implemented for `(f64, f64, f64)` tuples, `[f64; 3]` arrays and [`AgentPosition`].
/// This allows encoders to accept any of them.
pub trait Position {
    /// Returns the x-coordinate on the site.
    fn x(&self) -> f64;
    /// Returns the y-coordinate on the site.
    fn y(&self) -> f64;
    /// Returns the altitude.
    fn z(&self) -> f64;

    /// Returns the coordinate along `axis`.
    fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x(),
            Axis::Y => self.y(),
            Axis::Z => self.z(),
        }
    }
}

impl Position for (f64, f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }
    fn y(&self) -> f64 {
        self.1
    }
    fn z(&self) -> f64 {
        self.2
    }
}

impl Position for [f64; 3] {
    fn x(&self) -> f64 {
        self[0]
    }
    fn y(&self) -> f64 {
        self[1]
    }
    fn z(&self) -> f64 {
        self[2]
    }
}

/// Position of a single gateway or UAV on the simulated site.
///
/// `x` and `y` are horizontal distances (the simulator uses roughly `[0, 10000]`),
/// `z` is the altitude in the same unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AgentPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Builds a position from a horizontal footprint and an altitude.
    pub fn from_footprint(footprint: &Point<f64>, z: f64) -> Self {
        Self::new(footprint.x(), footprint.y(), z)
    }

    /// Returns the horizontal footprint of this position.
    pub fn footprint(&self) -> Point<f64> {
        Point::new(self.x, self.y)
    }
}

impl Position for AgentPosition {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn z(&self) -> f64 {
        self.z
    }
}

impl From<(f64, f64, f64)> for AgentPosition {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[f64; 3]> for AgentPosition {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Splits a flat `(x1, y1, z1, x2, y2, z2, ...)` vector into `agents` positions.
///
/// The vector must hold exactly `3 * agents` values.
pub fn positions_from_flat(
    values: &[f64],
    agents: usize,
) -> Result<Vec<AgentPosition>, PlacementIndexError> {
    let expected = agents
        .checked_mul(3)
        .ok_or(PlacementIndexError::InvalidAgentCount(agents))?;
    if values.len() != expected {
        return Err(PlacementIndexError::InvalidInputLength {
            expected,
            actual: values.len(),
        });
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| AgentPosition::new(c[0], c[1], c[2]))
        .collect())
}

/// Flattens positions into the `(x, y, z)`-per-agent layout used by simulator observations.
pub fn flatten_positions<P: Position>(positions: &[P]) -> Vec<f64> {
    positions
        .iter()
        .flat_map(|p| [p.x(), p.y(), p.z()])
        .collect()
}
