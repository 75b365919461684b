use crate::coord::Position;
use crate::error::PlacementIndexError;
use crate::index::quantize::{CellDigits, GridShape, QuantizationScale};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer state identifier of a tuple of agent cells.
///
/// Whenever every agent digit lies inside the grid, the value lies in
/// `[0, (NL*NC*NA)^N)` and addresses one slot of a state table. In permissive
/// mode out-of-range digits are combined as-is, so the value can alias another
/// tuple or be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageIndex(i128);

impl StorageIndex {
    pub fn new(value: i128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i128 {
        self.0
    }

    /// Converts the index into a slot of a table with `size` entries.
    pub fn as_table_slot(&self, size: u128) -> Result<usize, PlacementIndexError> {
        let out_of_table = PlacementIndexError::IndexOutOfTable {
            index: self.0,
            size,
        };
        let value = u128::try_from(self.0).map_err(|_| out_of_table.clone())?;
        if value >= size {
            return Err(out_of_table);
        }
        usize::try_from(value).map_err(|_| PlacementIndexError::IndexOverflow)
    }
}

impl fmt::Display for StorageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<StorageIndex> for i128 {
    fn from(index: StorageIndex) -> Self {
        index.0
    }
}

/// Whether quantized digits outside the grid are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Out-of-range digits are combined into a possibly aliasing index
    #[default]
    Permissive,
    /// Out-of-range digits fail with `OutOfRangeCoordinate`
    Strict,
}

/// How agent digits are weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentOrder {
    /// Agent `i` is digit `i`, agent 0 least significant
    #[default]
    AsGiven,
    /// Agent digits are sorted ascending first, so permuted placements share an index
    Canonical,
}

/// Mixed-radix encoder from agent positions to a [`StorageIndex`].
///
/// Each agent is quantized to a [`CellDigits`] triple, flattened into one digit
/// of base `NL*NC*NA`, and the digits are combined with agent 0 as the least
/// significant position:
///
/// `index = sum(digit_i * (NL*NC*NA)^i)`
///
/// # Example
/// ```
/// use placement_index::{Encoder, GridShape};
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let encoder = Encoder::new(2, GridShape::new(10, 10, 1)?)?;
/// let index = encoder.encode_flat(&[500.0, 500.0, 30.0, 1500.0, 500.0, 30.0])?;
/// assert_eq!(index.value(), 100);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Encoder {
    agents: usize,
    shape: GridShape,
    scale: QuantizationScale,
    strictness: Strictness,
    order: AgentOrder,
}

impl Encoder {
    /// Creates a permissive, order-sensitive encoder with the default scale.
    pub fn new(agents: usize, shape: GridShape) -> Result<Self, PlacementIndexError> {
        if agents == 0 {
            return Err(PlacementIndexError::InvalidAgentCount(agents));
        }
        shape.validate()?;

        Ok(Self {
            agents,
            shape,
            scale: QuantizationScale::default(),
            strictness: Strictness::default(),
            order: AgentOrder::default(),
        })
    }

    pub fn with_scale(mut self, scale: QuantizationScale) -> Result<Self, PlacementIndexError> {
        scale.validate()?;
        self.scale = scale;
        Ok(self)
    }

    pub fn strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = strictness;
        self
    }

    /// Shorthand for `strictness(Strictness::Strict)`.
    pub fn strict(self) -> Self {
        self.strictness(Strictness::Strict)
    }

    pub fn order(mut self, order: AgentOrder) -> Self {
        self.order = order;
        self
    }

    pub fn agents(&self) -> usize {
        self.agents
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    pub fn scale(&self) -> QuantizationScale {
        self.scale
    }

    pub fn is_strict(&self) -> bool {
        self.strictness == Strictness::Strict
    }

    pub fn agent_order(&self) -> AgentOrder {
        self.order
    }

    /// Number of distinct in-range indices, `(NL*NC*NA)^N`.
    pub fn state_space_size(&self) -> Result<u128, PlacementIndexError> {
        let exponent =
            u32::try_from(self.agents).map_err(|_| PlacementIndexError::IndexOverflow)?;
        self.shape
            .cells_per_agent()
            .checked_pow(exponent)
            .ok_or(PlacementIndexError::IndexOverflow)
    }

    /// Quantizes a single position with this encoder's scale.
    pub fn quantize<P: Position>(&self, pos: &P) -> Result<CellDigits, PlacementIndexError> {
        self.scale.quantize(pos)
    }

    /// Encodes a flat `(x, y, z)`-per-agent vector of exactly `3 * agents` values.
    pub fn encode_flat(&self, values: &[f64]) -> Result<StorageIndex, PlacementIndexError> {
        let expected = self.expected_len()?;
        if values.len() != expected {
            return Err(PlacementIndexError::InvalidInputLength {
                expected,
                actual: values.len(),
            });
        }

        let digits = values
            .chunks_exact(3)
            .enumerate()
            .map(|(agent, c)| self.digits_for(agent, &[c[0], c[1], c[2]]))
            .collect::<Result<Vec<_>, _>>()?;
        self.compose(&digits)
    }

    /// Encodes one position per agent.
    pub fn encode_positions<P: Position>(
        &self,
        positions: &[P],
    ) -> Result<StorageIndex, PlacementIndexError> {
        if positions.len() != self.agents {
            return Err(PlacementIndexError::InvalidInputLength {
                expected: self.expected_len()?,
                actual: positions.len().saturating_mul(3),
            });
        }

        let digits = positions
            .iter()
            .enumerate()
            .map(|(agent, pos)| self.digits_for(agent, pos))
            .collect::<Result<Vec<_>, _>>()?;
        self.compose(&digits)
    }

    /// Encodes already quantized digits, one triple per agent.
    pub fn encode_digits(
        &self,
        digits: &[CellDigits],
    ) -> Result<StorageIndex, PlacementIndexError> {
        if digits.len() != self.agents {
            return Err(PlacementIndexError::InvalidInputLength {
                expected: self.expected_len()?,
                actual: digits.len().saturating_mul(3),
            });
        }
        if self.is_strict() {
            for (agent, d) in digits.iter().enumerate() {
                d.check_bounds(agent, &self.shape)?;
            }
        }
        self.compose(digits)
    }

    /// Recovers the per-agent digits of an in-range index.
    ///
    /// Digits come back in digit order, which is agent order unless the encoder
    /// canonicalizes.
    pub fn decode(&self, index: StorageIndex) -> Result<Vec<CellDigits>, PlacementIndexError> {
        let size = self.state_space_size()?;
        let mut rest = u128::try_from(index.value())
            .ok()
            .filter(|v| *v < size)
            .ok_or(PlacementIndexError::IndexOutOfTable {
                index: index.value(),
                size,
            })?;

        let base = self.shape.cells_per_agent();
        let mut digits = Vec::with_capacity(self.agents);
        for _ in 0..self.agents {
            digits.push(CellDigits::from_flat(rest % base, &self.shape));
            rest /= base;
        }
        Ok(digits)
    }

    /// Maps a simulator observation to a slot of a state table with
    /// [`Encoder::state_space_size`] entries.
    pub fn table_index(&self, observation: &[f64]) -> Result<usize, PlacementIndexError> {
        let index = self.encode_flat(observation)?;
        index.as_table_slot(self.state_space_size()?)
    }

    fn expected_len(&self) -> Result<usize, PlacementIndexError> {
        self.agents
            .checked_mul(3)
            .ok_or(PlacementIndexError::InvalidAgentCount(self.agents))
    }

    fn digits_for<P: Position>(
        &self,
        agent: usize,
        pos: &P,
    ) -> Result<CellDigits, PlacementIndexError> {
        let digits = self.scale.quantize_agent(agent, pos)?;
        if self.is_strict() {
            digits.check_bounds(agent, &self.shape)?;
        }
        Ok(digits)
    }

    fn compose(&self, digits: &[CellDigits]) -> Result<StorageIndex, PlacementIndexError> {
        let mut flat = digits
            .iter()
            .map(|d| d.flatten(&self.shape))
            .collect::<Result<Vec<_>, _>>()?;
        if self.order == AgentOrder::Canonical {
            flat.sort_unstable();
        }

        let base = i128::try_from(self.shape.cells_per_agent())
            .map_err(|_| PlacementIndexError::IndexOverflow)?;

        // Horner form, most significant agent first
        let value = flat.iter().rev().try_fold(0i128, |acc, &digit| {
            acc.checked_mul(base)
                .and_then(|v| v.checked_add(digit))
                .ok_or(PlacementIndexError::IndexOverflow)
        })?;
        Ok(StorageIndex(value))
    }
}

/// Encodes `agents` positions on an `lines x columns x altitudes` grid using the
/// default scale (1000, 1000, 10, offset 3) and permissive bounds.
///
/// # Example
/// ```
/// use placement_index::encode;
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let index = encode(1, &[500.0, 1500.0, 30.0], 10, 10, 1)?;
/// assert_eq!(index.value(), 10);
/// # Ok(())
/// # }
/// ```
pub fn encode(
    agents: usize,
    positions: &[f64],
    lines: u32,
    columns: u32,
    altitudes: u32,
) -> Result<StorageIndex, PlacementIndexError> {
    Encoder::new(agents, GridShape::new(lines, columns, altitudes)?)?.encode_flat(positions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::{AgentPosition, Axis};

    fn shape_10x10() -> GridShape {
        GridShape {
            lines: 10,
            columns: 10,
            altitudes: 1,
        }
    }

    #[test]
    fn test_single_agent_origin() -> Result<(), PlacementIndexError> {
        assert_eq!(encode(1, &[500.0, 500.0, 30.0], 10, 10, 1)?.value(), 0);
        Ok(())
    }

    #[test]
    fn test_single_agent_x_and_y_digits() -> Result<(), PlacementIndexError> {
        assert_eq!(encode(1, &[1500.0, 500.0, 30.0], 10, 10, 1)?.value(), 1);
        assert_eq!(encode(1, &[500.0, 1500.0, 30.0], 10, 10, 1)?.value(), 10);
        Ok(())
    }

    #[test]
    fn test_two_agents_weighting() -> Result<(), PlacementIndexError> {
        let index = encode(2, &[500.0, 500.0, 30.0, 1500.0, 500.0, 30.0], 10, 10, 1)?;
        assert_eq!(index.value(), 100);
        Ok(())
    }

    #[test]
    fn test_swapped_agents_differ() -> Result<(), PlacementIndexError> {
        let swapped = encode(2, &[1500.0, 500.0, 30.0, 500.0, 500.0, 30.0], 10, 10, 1)?;
        assert_eq!(swapped.value(), 1);
        Ok(())
    }

    #[test]
    fn test_length_mismatch() {
        let result = encode(2, &[500.0, 500.0, 30.0, 1500.0, 500.0], 10, 10, 1);
        assert_eq!(
            result,
            Err(PlacementIndexError::InvalidInputLength {
                expected: 6,
                actual: 5
            })
        );
    }

    #[test]
    fn test_length_checked_before_coordinates() {
        let result = encode(2, &[f64::NAN, 500.0, 30.0, 1500.0], 10, 10, 1);
        assert!(matches!(result, Err(PlacementIndexError::InvalidInputLength { .. })));
    }

    #[test]
    fn test_invalid_agent_count_and_shape() {
        assert_eq!(
            encode(0, &[], 10, 10, 1),
            Err(PlacementIndexError::InvalidAgentCount(0))
        );
        assert!(matches!(
            encode(1, &[500.0, 500.0, 30.0], 10, 10, 0),
            Err(PlacementIndexError::InvalidGridShape { .. })
        ));
    }

    #[test]
    fn test_deterministic() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(3, GridShape::new(10, 10, 2)?)?;
        let values = [2500.0, 7100.0, 45.0, 9900.0, 0.0, 30.0, 4000.0, 4000.0, 30.0];

        let first = encoder.encode_flat(&values)?;
        for _ in 0..10 {
            assert_eq!(encoder.encode_flat(&values)?, first);
        }
        Ok(())
    }

    #[test]
    fn test_single_gateway_state_of_11x11_site() -> Result<(), PlacementIndexError> {
        let index = encode(1, &[5000.0, 4000.0, 30.0], 11, 11, 1)?;
        assert_eq!(index.value(), 5 + 4 * 11);
        Ok(())
    }

    #[test]
    fn test_altitude_digit_weight() -> Result<(), PlacementIndexError> {
        // z = 40 is altitude digit 1, weighted by NL*NC
        let index = encode(1, &[500.0, 500.0, 40.0], 10, 10, 2)?;
        assert_eq!(index.value(), 100);
        Ok(())
    }

    #[test]
    fn test_permissive_out_of_range_aliases() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(1, shape_10x10())?;

        // x digit 10 overflows into the y digit
        let overflow = encoder.encode_flat(&[10500.0, 500.0, 30.0])?;
        let aliased = encoder.encode_flat(&[500.0, 1500.0, 30.0])?;
        assert_eq!(overflow, aliased);

        let below = encoder.encode_flat(&[500.0, 500.0, 20.0])?;
        assert_eq!(below.value(), -100);
        Ok(())
    }

    #[test]
    fn test_strict_rejects_out_of_range() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(2, shape_10x10())?.strict();
        let result = encoder.encode_flat(&[500.0, 500.0, 30.0, 500.0, 500.0, 20.0]);

        assert_eq!(
            result,
            Err(PlacementIndexError::OutOfRangeCoordinate {
                agent: 1,
                axis: Axis::Z,
                digit: -1,
                bound: 1
            })
        );
        assert_eq!(
            encoder.encode_flat(&[500.0, 500.0, 30.0, 9500.0, 9500.0, 30.0])?.value(),
            9900
        );
        Ok(())
    }

    #[test]
    fn test_non_finite_rejected() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(1, shape_10x10())?;
        assert_eq!(
            encoder.encode_flat(&[500.0, 500.0, f64::INFINITY]),
            Err(PlacementIndexError::NonFiniteCoordinate {
                agent: 0,
                axis: Axis::Z
            })
        );
        Ok(())
    }

    #[test]
    fn test_encode_positions_matches_flat() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(2, shape_10x10())?;
        let positions = [
            AgentPosition::new(3500.0, 8500.0, 30.0),
            AgentPosition::new(1500.0, 500.0, 30.0),
        ];

        assert_eq!(
            encoder.encode_positions(&positions)?,
            encoder.encode_flat(&[3500.0, 8500.0, 30.0, 1500.0, 500.0, 30.0])?
        );
        assert!(matches!(
            encoder.encode_positions(&positions[..1]),
            Err(PlacementIndexError::InvalidInputLength {
                expected: 6,
                actual: 3
            })
        ));
        Ok(())
    }

    #[test]
    fn test_canonical_order_ignores_permutation() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(2, shape_10x10())?.order(AgentOrder::Canonical);

        let a = encoder.encode_flat(&[1500.0, 500.0, 30.0, 500.0, 500.0, 30.0])?;
        let b = encoder.encode_flat(&[500.0, 500.0, 30.0, 1500.0, 500.0, 30.0])?;
        assert_eq!(a, b);
        assert_eq!(a.value(), 100);
        Ok(())
    }

    #[test]
    fn test_custom_scale() -> Result<(), PlacementIndexError> {
        let scale = QuantizationScale::new(500.0, 500.0, 5.0, 0)?;
        let encoder = Encoder::new(1, shape_10x10())?.with_scale(scale)?;
        assert_eq!(
            encoder.encode_flat(&[1000.0, 1500.0, 0.0])?.value(),
            2 + 3 * 10
        );
        Ok(())
    }

    #[test]
    fn test_decode_recovers_digits() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(3, GridShape::new(10, 10, 3)?)?;
        let values = [2500.0, 7500.0, 40.0, 500.0, 9500.0, 30.0, 8500.0, 1500.0, 50.0];
        let index = encoder.encode_flat(&values)?;

        let digits = encoder.decode(index)?;
        assert_eq!(
            digits,
            vec![
                CellDigits::new(2, 7, 1),
                CellDigits::new(0, 9, 0),
                CellDigits::new(8, 1, 2),
            ]
        );
        assert_eq!(encoder.encode_digits(&digits)?, index);
        Ok(())
    }

    #[test]
    fn test_decode_out_of_table() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(1, shape_10x10())?;
        assert_eq!(
            encoder.decode(StorageIndex::new(100)),
            Err(PlacementIndexError::IndexOutOfTable {
                index: 100,
                size: 100
            })
        );
        assert!(encoder.decode(StorageIndex::new(-1)).is_err());
        Ok(())
    }

    #[test]
    fn test_state_space_size() -> Result<(), PlacementIndexError> {
        assert_eq!(Encoder::new(3, shape_10x10())?.state_space_size()?, 1_000_000);
        assert_eq!(
            Encoder::new(40, GridShape::new(1000, 1000, 10)?)?.state_space_size(),
            Err(PlacementIndexError::IndexOverflow)
        );
        Ok(())
    }

    #[test]
    fn test_table_index() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(1, GridShape::new(11, 11, 1)?)?;
        assert_eq!(encoder.table_index(&[5000.0, 4000.0, 30.0])?, 49);
        assert_eq!(encoder.table_index(&[10000.0, 10000.0, 30.0])?, 120);
        assert!(matches!(
            encoder.table_index(&[500.0, 500.0, 20.0]),
            Err(PlacementIndexError::IndexOutOfTable { index: -121, size: 121 })
        ));
        Ok(())
    }

    #[test]
    fn test_compose_overflow() -> Result<(), PlacementIndexError> {
        let encoder = Encoder::new(3, GridShape::new(u32::MAX, u32::MAX, u32::MAX)?)?;
        let digits = [
            CellDigits::new(0, 0, 0),
            CellDigits::new(0, 0, 0),
            CellDigits::new(1, 0, 0),
        ];
        assert_eq!(
            encoder.encode_digits(&digits),
            Err(PlacementIndexError::IndexOverflow)
        );
        Ok(())
    }
}
