use crate::coord::{AgentPosition, Axis};
use crate::error::PlacementIndexError;
use crate::index::{
    CellDigits, GridShape, QuantizationScale, STANDARD_ALTITUDE, STANDARD_GRID, STANDARD_SWEEP,
};
use geo_types::{Point, Rect};

/// Ordered set of candidate agent positions on a site.
///
/// Candidate ids used by the enumerator are positions in this list.
///
/// # Example
///
/// ```
/// use placement_index::CandidateGrid;
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let grid = CandidateGrid::builder()
///     .extent(0.0, 0.0, 2000.0, 2000.0)
///     .step(1000.0)
///     .altitude(30.0)
///     .build()?;
/// assert_eq!(grid.len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateGrid {
    positions: Vec<AgentPosition>,
}

impl CandidateGrid {
    pub fn builder() -> CandidateGridBuilder {
        CandidateGridBuilder::new()
    }

    /// The sweep used by the placement scenarios: x, y in `{500, 1500, ..., 9500}` at 30 m.
    pub fn standard() -> Self {
        let (start, _, step) = STANDARD_SWEEP;
        let (lines, columns, _) = STANDARD_GRID;
        let positions = (0..lines)
            .flat_map(|i| {
                (0..columns).map(move |j| {
                    AgentPosition::new(
                        start + i as f64 * step,
                        start + j as f64 * step,
                        STANDARD_ALTITUDE,
                    )
                })
            })
            .collect();
        Self { positions }
    }

    /// Builds the cartesian sweep of `(start, last, step)` ranges, both ends inclusive.
    ///
    /// Positions are ordered x first, then y, then altitude.
    pub fn sweep(
        x: (f64, f64, f64),
        y: (f64, f64, f64),
        altitudes: &[f64],
    ) -> Result<Self, PlacementIndexError> {
        let xs = axis_values(x.0, x.1, x.2)?;
        let ys = axis_values(y.0, y.1, y.2)?;
        Ok(Self {
            positions: sweep_positions(&xs, &ys, altitudes)?,
        })
    }

    /// Places one candidate at the centre of every `step x step` cell of the extent.
    pub fn from_extent(
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
        step: f64,
        altitudes: &[f64],
    ) -> Result<Self, PlacementIndexError> {
        let xs = cell_centres(min_x, max_x, step)?;
        let ys = cell_centres(min_y, max_y, step)?;
        Ok(Self {
            positions: sweep_positions(&xs, &ys, altitudes)?,
        })
    }

    pub fn from_rect(
        rect: &Rect<f64>,
        step: f64,
        altitudes: &[f64],
    ) -> Result<Self, PlacementIndexError> {
        Self::from_extent(
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y,
            step,
            altitudes,
        )
    }

    pub fn from_positions(positions: Vec<AgentPosition>) -> Self {
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[AgentPosition] {
        &self.positions
    }

    pub fn get(&self, id: usize) -> Option<&AgentPosition> {
        self.positions.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentPosition> {
        self.positions.iter()
    }

    pub fn footprints(&self) -> Vec<Point<f64>> {
        self.positions.iter().map(|p| p.footprint()).collect()
    }

    pub fn filter<F>(&self, predicate: F) -> Vec<&AgentPosition>
    where
        F: Fn(&AgentPosition) -> bool,
    {
        self.positions.iter().filter(|p| predicate(p)).collect()
    }

    /// Smallest grid shape that holds every candidate's digits under `scale`.
    ///
    /// Candidates that quantize to a negative digit cannot fit any shape and are
    /// reported as `OutOfRangeCoordinate` with a bound of 0.
    pub fn shape_for(&self, scale: &QuantizationScale) -> Result<GridShape, PlacementIndexError> {
        if self.is_empty() {
            return Err(PlacementIndexError::EmptyCandidateGrid);
        }

        let mut max = CellDigits::new(0, 0, 0);
        for (id, pos) in self.positions.iter().enumerate() {
            let digits = scale.quantize_agent(id, pos)?;
            for axis in [Axis::X, Axis::Y, Axis::Z] {
                if digits.get(axis) < 0 {
                    return Err(PlacementIndexError::OutOfRangeCoordinate {
                        agent: id,
                        axis,
                        digit: digits.get(axis),
                        bound: 0,
                    });
                }
            }
            max = CellDigits::new(
                max.x.max(digits.x),
                max.y.max(digits.y),
                max.z.max(digits.z),
            );
        }

        let bound = |d: i64| u32::try_from(d + 1).map_err(|_| PlacementIndexError::IndexOverflow);
        GridShape::new(bound(max.x)?, bound(max.y)?, bound(max.z)?)
    }
}

#[derive(Debug)]
pub struct CandidateGridBuilder {
    min_x: Option<f64>,
    min_y: Option<f64>,
    max_x: Option<f64>,
    max_y: Option<f64>,
    step: f64,
    altitudes: Vec<f64>,
}

impl Default for CandidateGridBuilder {
    fn default() -> Self {
        Self {
            min_x: None,
            min_y: None,
            max_x: None,
            max_y: None,
            step: STANDARD_SWEEP.2,
            altitudes: Vec::new(),
        }
    }
}

impl CandidateGridBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extent(mut self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        self.min_x = Some(min_x);
        self.min_y = Some(min_y);
        self.max_x = Some(max_x);
        self.max_y = Some(max_y);
        self
    }

    pub fn rect(mut self, rect: &Rect<f64>) -> Self {
        self.min_x = Some(rect.min().x);
        self.min_y = Some(rect.min().y);
        self.max_x = Some(rect.max().x);
        self.max_y = Some(rect.max().y);
        self
    }

    pub fn step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }

    /// Adds one flight level. Defaults to the 30 m level when none is given.
    pub fn altitude(mut self, z: f64) -> Self {
        self.altitudes.push(z);
        self
    }

    pub fn altitudes(mut self, altitudes: Vec<f64>) -> Self {
        self.altitudes = altitudes;
        self
    }

    pub fn build(self) -> Result<CandidateGrid, PlacementIndexError> {
        let (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) =
            (self.min_x, self.min_y, self.max_x, self.max_y)
        else {
            return Err(PlacementIndexError::ConfigError(
                "extent must be set".to_string(),
            ));
        };

        let altitudes = if self.altitudes.is_empty() {
            vec![STANDARD_ALTITUDE]
        } else {
            self.altitudes
        };

        CandidateGrid::from_extent(min_x, min_y, max_x, max_y, self.step, &altitudes)
    }
}

/// Upper bound on the number of candidates a sweep or extent may produce.
pub const MAX_CANDIDATES: usize = 1 << 24;

fn validate_step(step: f64) -> Result<(), PlacementIndexError> {
    if !step.is_finite() || step <= 0.0 {
        return Err(PlacementIndexError::InvalidScale(format!(
            "sweep step must be positive and finite, got {}",
            step
        )));
    }
    Ok(())
}

fn validate_bounds(lo: f64, hi: f64) -> Result<(), PlacementIndexError> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(PlacementIndexError::ConfigError(format!(
            "site bounds must be finite, got [{}, {}]",
            lo, hi
        )));
    }
    Ok(())
}

// Count is computed in f64 and checked before any allocation
fn checked_count(count: f64) -> Result<usize, PlacementIndexError> {
    if !count.is_finite() || count > MAX_CANDIDATES as f64 {
        return Err(PlacementIndexError::ConfigError(format!(
            "sweep of {} values per axis exceeds {} candidates",
            count, MAX_CANDIDATES
        )));
    }
    Ok(count.max(0.0) as usize)
}

// Tolerance so that a `last` reached by accumulated steps is still included
const SWEEP_EPSILON: f64 = 1e-9;

fn axis_values(start: f64, last: f64, step: f64) -> Result<Vec<f64>, PlacementIndexError> {
    validate_step(step)?;
    validate_bounds(start, last)?;
    if last < start {
        return Ok(Vec::new());
    }
    let count = checked_count(((last - start) / step + SWEEP_EPSILON).floor() + 1.0)?;
    Ok((0..count).map(|k| start + k as f64 * step).collect())
}

fn cell_centres(min: f64, max: f64, step: f64) -> Result<Vec<f64>, PlacementIndexError> {
    validate_step(step)?;
    validate_bounds(min, max)?;
    if max <= min {
        return Ok(Vec::new());
    }
    let count = checked_count(((max - min) / step - SWEEP_EPSILON).ceil())?;
    Ok((0..count)
        .map(|k| min + step / 2.0 + k as f64 * step)
        .collect())
}

fn sweep_positions(
    xs: &[f64],
    ys: &[f64],
    zs: &[f64],
) -> Result<Vec<AgentPosition>, PlacementIndexError> {
    if let Some(z) = zs.iter().find(|z| !z.is_finite()) {
        return Err(PlacementIndexError::ConfigError(format!(
            "altitude must be finite, got {}",
            z
        )));
    }
    let total = xs
        .len()
        .checked_mul(ys.len())
        .and_then(|n| n.checked_mul(zs.len()))
        .filter(|&n| n <= MAX_CANDIDATES)
        .ok_or_else(|| {
            PlacementIndexError::ConfigError(format!(
                "{} x {} x {} candidates exceeds {}",
                xs.len(),
                ys.len(),
                zs.len(),
                MAX_CANDIDATES
            ))
        })?;

    let mut positions = Vec::with_capacity(total);
    for &x in xs {
        for &y in ys {
            for &z in zs {
                positions.push(AgentPosition::new(x, y, z));
            }
        }
    }
    Ok(positions)
}
