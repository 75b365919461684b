use crate::enumerate::{EnumeratedState, Enumeration};
use crate::error::PlacementIndexError;
use crate::grid::CandidateGrid;
use arrow_array::{ArrayRef, Decimal128Array, Float64Array, RecordBatch, UInt64Array};
use arrow_schema::{DataType, Field, Schema};
use rayon::prelude::*;
use std::sync::Arc;

/// Widest Decimal128 precision
const INDEX_PRECISION: u8 = 38;

/// Trait for converting enumerated states to an Arrow [`RecordBatch`].
///
/// Implemented for `[EnumeratedState]` and [`Enumeration`].
pub trait StatesToArrow {
    /// Converts states to a RecordBatch with a `storage_index` Decimal128 column
    /// and, per agent `i`, `agent{i}_candidate`, `agent{i}_x`, `agent{i}_y`, `agent{i}_z`.
    fn to_record_batch(&self, grid: &CandidateGrid) -> Result<RecordBatch, PlacementIndexError>;
}

impl StatesToArrow for [EnumeratedState] {
    fn to_record_batch(&self, grid: &CandidateGrid) -> Result<RecordBatch, PlacementIndexError> {
        let agents = self.first().map(|s| s.members.len()).unwrap_or(0);

        let values: Vec<i128> = self.iter().map(|s| s.index.value()).collect();
        let indices = Decimal128Array::from(values)
            .with_precision_and_scale(INDEX_PRECISION, 0)
            .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;

        let mut fields = vec![Field::new(
            "storage_index",
            DataType::Decimal128(INDEX_PRECISION, 0),
            false,
        )];
        let mut columns: Vec<ArrayRef> = vec![Arc::new(indices)];

        let per_agent = (0..agents)
            .into_par_iter()
            .map(|agent| agent_columns(self, grid, agent))
            .collect::<Result<Vec<_>, _>>()?;

        for (agent, (candidates, xs, ys, zs)) in per_agent.into_iter().enumerate() {
            fields.push(Field::new(format!("agent{}_candidate", agent), DataType::UInt64, false));
            fields.push(Field::new(format!("agent{}_x", agent), DataType::Float64, false));
            fields.push(Field::new(format!("agent{}_y", agent), DataType::Float64, false));
            fields.push(Field::new(format!("agent{}_z", agent), DataType::Float64, false));
            columns.push(Arc::new(candidates));
            columns.push(Arc::new(xs));
            columns.push(Arc::new(ys));
            columns.push(Arc::new(zs));
        }

        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
            .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))
    }
}

impl StatesToArrow for Enumeration {
    fn to_record_batch(&self, grid: &CandidateGrid) -> Result<RecordBatch, PlacementIndexError> {
        self.states().to_record_batch(grid)
    }
}

type AgentColumns = (UInt64Array, Float64Array, Float64Array, Float64Array);

fn agent_columns(
    states: &[EnumeratedState],
    grid: &CandidateGrid,
    agent: usize,
) -> Result<AgentColumns, PlacementIndexError> {
    let mut candidates = Vec::with_capacity(states.len());
    let mut xs = Vec::with_capacity(states.len());
    let mut ys = Vec::with_capacity(states.len());
    let mut zs = Vec::with_capacity(states.len());

    for state in states {
        let id = *state.members.get(agent).ok_or_else(|| {
            PlacementIndexError::ArrowError(format!("state {} has no agent {}", state.index, agent))
        })?;
        let pos = grid.get(id).ok_or_else(|| {
            PlacementIndexError::ArrowError(format!("candidate {} not in grid", id))
        })?;
        candidates.push(id as u64);
        xs.push(pos.x);
        ys.push(pos.y);
        zs.push(pos.z);
    }

    Ok((
        UInt64Array::from(candidates),
        Float64Array::from(xs),
        Float64Array::from(ys),
        Float64Array::from(zs),
    ))
}
