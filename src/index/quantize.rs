use crate::coord::{Axis, Position};
use crate::error::PlacementIndexError;
use crate::index::constants::{DEFAULT_X_CELL, DEFAULT_Y_CELL, DEFAULT_Z_CELL, DEFAULT_Z_OFFSET};
use serde::{Deserialize, Serialize};

/// Discretization of a site into `lines x columns x altitudes` cells.
///
/// `lines` bins the x axis, `columns` bins the y axis and `altitudes` bins z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridShape {
    pub lines: u32,
    pub columns: u32,
    pub altitudes: u32,
}

impl GridShape {
    /// Creates a grid shape, rejecting zero-sized dimensions.
    ///
    /// # Example
    /// ```
    /// use placement_index::GridShape;
    ///
    /// # fn main() -> Result<(), placement_index::PlacementIndexError> {
    /// let shape = GridShape::new(10, 10, 1)?;
    /// assert_eq!(shape.cells_per_agent(), 100);
    /// assert!(GridShape::new(10, 0, 1).is_err());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(lines: u32, columns: u32, altitudes: u32) -> Result<Self, PlacementIndexError> {
        let shape = Self {
            lines,
            columns,
            altitudes,
        };
        shape.validate()?;
        Ok(shape)
    }

    pub fn validate(&self) -> Result<(), PlacementIndexError> {
        if self.lines == 0 || self.columns == 0 || self.altitudes == 0 {
            return Err(PlacementIndexError::InvalidGridShape {
                lines: self.lines,
                columns: self.columns,
                altitudes: self.altitudes,
            });
        }
        Ok(())
    }

    /// Number of cells a single agent can occupy, the radix of one agent digit.
    pub fn cells_per_agent(&self) -> u128 {
        self.lines as u128 * self.columns as u128 * self.altitudes as u128
    }

    /// Number of bins along `axis`.
    pub fn bound(&self, axis: Axis) -> u32 {
        match axis {
            Axis::X => self.lines,
            Axis::Y => self.columns,
            Axis::Z => self.altitudes,
        }
    }
}

/// Physical-to-grid scale applied before composing an index.
///
/// `digit = floor(value / cell)` on each axis, with `z_offset` subtracted from the
/// altitude digit. The default reproduces the simulator scenarios: 1000 x 1000
/// horizontal cells and 10 m altitude cells starting at 30 m.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizationScale {
    pub x_cell: f64,
    pub y_cell: f64,
    pub z_cell: f64,
    pub z_offset: i64,
}

impl Default for QuantizationScale {
    fn default() -> Self {
        Self {
            x_cell: DEFAULT_X_CELL,
            y_cell: DEFAULT_Y_CELL,
            z_cell: DEFAULT_Z_CELL,
            z_offset: DEFAULT_Z_OFFSET,
        }
    }
}

impl QuantizationScale {
    pub fn new(
        x_cell: f64,
        y_cell: f64,
        z_cell: f64,
        z_offset: i64,
    ) -> Result<Self, PlacementIndexError> {
        let scale = Self {
            x_cell,
            y_cell,
            z_cell,
            z_offset,
        };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<(), PlacementIndexError> {
        let cells = [
            (Axis::X, self.x_cell),
            (Axis::Y, self.y_cell),
            (Axis::Z, self.z_cell),
        ];
        for (axis, cell) in cells {
            if !cell.is_finite() || cell <= 0.0 {
                return Err(PlacementIndexError::InvalidScale(format!(
                    "{} cell size must be positive and finite, got {}",
                    axis, cell
                )));
            }
        }
        Ok(())
    }

    pub fn cell_size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x_cell,
            Axis::Y => self.y_cell,
            Axis::Z => self.z_cell,
        }
    }

    /// Quantizes one position. `agent` is only used to label errors.
    pub(crate) fn quantize_agent<P: Position>(
        &self,
        agent: usize,
        pos: &P,
    ) -> Result<CellDigits, PlacementIndexError> {
        let x = self.axis_digit(agent, Axis::X, pos.x())?;
        let y = self.axis_digit(agent, Axis::Y, pos.y())?;
        let z = self
            .axis_digit(agent, Axis::Z, pos.z())?
            .checked_sub(self.z_offset)
            .ok_or(PlacementIndexError::IndexOverflow)?;

        Ok(CellDigits { x, y, z })
    }

    /// Quantizes a single position into its cell digits.
    ///
    /// # Example
    /// ```
    /// use placement_index::{CellDigits, QuantizationScale};
    ///
    /// # fn main() -> Result<(), placement_index::PlacementIndexError> {
    /// let digits = QuantizationScale::default().quantize(&(1500.0, 2500.0, 40.0))?;
    /// assert_eq!(digits, CellDigits::new(1, 2, 1));
    /// # Ok(())
    /// # }
    /// ```
    pub fn quantize<P: Position>(&self, pos: &P) -> Result<CellDigits, PlacementIndexError> {
        self.quantize_agent(0, pos)
    }

    fn axis_digit(&self, agent: usize, axis: Axis, value: f64) -> Result<i64, PlacementIndexError> {
        if !value.is_finite() {
            return Err(PlacementIndexError::NonFiniteCoordinate { agent, axis });
        }

        let q = (value / self.cell_size(axis)).floor();
        if q < i64::MIN as f64 || q >= i64::MAX as f64 {
            return Err(PlacementIndexError::IndexOverflow);
        }
        Ok(q as i64)
    }
}

/// Quantized cell coordinates of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellDigits {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellDigits {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> i64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Returns true when every digit lies inside its grid dimension.
    pub fn in_bounds(&self, shape: &GridShape) -> bool {
        [Axis::X, Axis::Y, Axis::Z]
            .iter()
            .all(|&axis| (0..shape.bound(axis) as i64).contains(&self.get(axis)))
    }

    /// Fails with the first axis whose digit lies outside the grid.
    pub(crate) fn check_bounds(
        &self,
        agent: usize,
        shape: &GridShape,
    ) -> Result<(), PlacementIndexError> {
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let digit = self.get(axis);
            let bound = shape.bound(axis);
            if digit < 0 || digit >= bound as i64 {
                return Err(PlacementIndexError::OutOfRangeCoordinate {
                    agent,
                    axis,
                    digit,
                    bound,
                });
            }
        }
        Ok(())
    }

    /// Flattens the triple into one mixed-radix digit: `x + y*NL + z*NL*NC`.
    ///
    /// Out-of-range digits are combined as-is and may alias another cell.
    pub fn flatten(&self, shape: &GridShape) -> Result<i128, PlacementIndexError> {
        let lines = shape.lines as i128;
        let plane = lines * shape.columns as i128;

        (self.y as i128)
            .checked_mul(lines)
            .and_then(|y| (self.z as i128).checked_mul(plane).and_then(|z| y.checked_add(z)))
            .and_then(|yz| yz.checked_add(self.x as i128))
            .ok_or(PlacementIndexError::IndexOverflow)
    }

    /// Inverse of [`CellDigits::flatten`] for a digit in `[0, NL*NC*NA)`.
    pub fn from_flat(digit: u128, shape: &GridShape) -> Self {
        let lines = shape.lines as u128;
        let columns = shape.columns as u128;

        Self {
            x: (digit % lines) as i64,
            y: ((digit / lines) % columns) as i64,
            z: (digit / (lines * columns)) as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scale_quantization() -> Result<(), PlacementIndexError> {
        let scale = QuantizationScale::default();

        assert_eq!(scale.quantize(&(500.0, 500.0, 30.0))?, CellDigits::new(0, 0, 0));
        assert_eq!(scale.quantize(&(9500.0, 1500.0, 30.0))?, CellDigits::new(9, 1, 0));
        assert_eq!(scale.quantize(&(999.9, 1000.0, 49.0))?, CellDigits::new(0, 1, 1));
        Ok(())
    }

    #[test]
    fn test_below_baseline_altitude_is_negative() -> Result<(), PlacementIndexError> {
        let digits = QuantizationScale::default().quantize(&(500.0, 500.0, 20.0))?;
        assert_eq!(digits.z, -1);
        assert!(!digits.in_bounds(&GridShape::new(10, 10, 1)?));
        Ok(())
    }

    #[test]
    fn test_negative_coordinates_floor() -> Result<(), PlacementIndexError> {
        let digits = QuantizationScale::default().quantize(&(-1.0, -1000.0, 30.0))?;
        assert_eq!(digits, CellDigits::new(-1, -1, 0));
        Ok(())
    }

    #[test]
    fn test_non_finite_coordinate() {
        let result = QuantizationScale::default().quantize_agent(2, &(500.0, f64::NAN, 30.0));
        assert_eq!(
            result,
            Err(PlacementIndexError::NonFiniteCoordinate {
                agent: 2,
                axis: Axis::Y
            })
        );
    }

    #[test]
    fn test_invalid_scale() {
        assert!(QuantizationScale::new(0.0, 1000.0, 10.0, 3).is_err());
        assert!(QuantizationScale::new(1000.0, f64::INFINITY, 10.0, 3).is_err());
        assert!(QuantizationScale::new(1000.0, 1000.0, -10.0, 3).is_err());
    }

    #[test]
    fn test_invalid_grid_shape() {
        assert_eq!(
            GridShape::new(0, 10, 1),
            Err(PlacementIndexError::InvalidGridShape {
                lines: 0,
                columns: 10,
                altitudes: 1
            })
        );
    }

    #[test]
    fn test_flatten_and_back() -> Result<(), PlacementIndexError> {
        let shape = GridShape::new(10, 10, 3)?;
        let digits = CellDigits::new(7, 4, 2);

        let flat = digits.flatten(&shape)?;
        assert_eq!(flat, 7 + 4 * 10 + 2 * 100);
        assert_eq!(CellDigits::from_flat(flat as u128, &shape), digits);
        Ok(())
    }

    #[test]
    fn test_check_bounds_reports_first_axis() -> Result<(), PlacementIndexError> {
        let shape = GridShape::new(10, 10, 1)?;
        let result = CellDigits::new(3, 10, 0).check_bounds(1, &shape);

        assert_eq!(
            result,
            Err(PlacementIndexError::OutOfRangeCoordinate {
                agent: 1,
                axis: Axis::Y,
                digit: 10,
                bound: 10
            })
        );
        Ok(())
    }
}
