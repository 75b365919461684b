use crate::coord::AgentPosition;
use crate::error::PlacementIndexError;
use crate::grid::CandidateGrid;
use crate::index::{Encoder, StorageIndex};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, info_span, warn};

/// One valid placement: the candidate id assigned to each agent and its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumeratedState {
    pub index: StorageIndex,
    /// Candidate id per agent, in agent order
    pub members: Vec<usize>,
}

/// Every ordered placement of distinct candidates, sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enumeration {
    states: Vec<EnumeratedState>,
    skipped: u64,
}

impl Enumeration {
    pub fn states(&self) -> &[EnumeratedState] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of tuples dropped because two agents shared a position.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Sorted index sequence, one entry per valid tuple.
    pub fn indices(&self) -> Vec<StorageIndex> {
        self.states.iter().map(|s| s.index).collect()
    }

    /// Indices produced by more than one tuple, each reported once.
    pub fn duplicates(&self) -> Vec<StorageIndex> {
        let mut dups: Vec<StorageIndex> = self
            .states
            .windows(2)
            .filter(|w| w[0].index == w[1].index)
            .map(|w| w[0].index)
            .collect();
        dups.dedup();
        dups
    }

    pub fn is_injective(&self) -> bool {
        self.states.windows(2).all(|w| w[0].index != w[1].index)
    }
}

/// Enumerates every ordered `agents`-tuple of pairwise distinct candidates and
/// encodes it.
///
/// Tuples where two agents share the same `(x, y, z)` are skipped. Work is split
/// across threads by the first agent's candidate; the merged output is sorted by
/// index, then by candidate ids, so it does not depend on scheduling.
///
/// # Example
/// ```
/// use placement_index::{CandidateGrid, Encoder, GridShape, enumerate};
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let grid = CandidateGrid::from_extent(0.0, 0.0, 2000.0, 2000.0, 1000.0, &[30.0])?;
/// let encoder = Encoder::new(2, GridShape::new(2, 2, 1)?)?;
///
/// let states = enumerate(&encoder, &grid)?;
/// assert_eq!(states.len(), 4 * 3);
/// assert!(states.is_injective());
/// # Ok(())
/// # }
/// ```
pub fn enumerate(
    encoder: &Encoder,
    grid: &CandidateGrid,
) -> Result<Enumeration, PlacementIndexError> {
    let _span = info_span!(
        "enumerate",
        agents = encoder.agents(),
        candidates = grid.len()
    )
    .entered();

    if grid.is_empty() {
        return Err(PlacementIndexError::EmptyCandidateGrid);
    }

    let start = Instant::now();
    let partials = (0..grid.len())
        .into_par_iter()
        .map(|first| enumerate_from(encoder, grid.positions(), first))
        .collect::<Result<Vec<_>, _>>()?;

    let mut states = Vec::with_capacity(partials.iter().map(|(s, _)| s.len()).sum());
    let mut skipped = 0u64;
    for (part, part_skipped) in partials {
        states.extend(part);
        skipped += part_skipped;
    }
    states.par_sort_unstable_by(|a, b| {
        a.index
            .cmp(&b.index)
            .then_with(|| a.members.cmp(&b.members))
    });

    let enumeration = Enumeration { states, skipped };
    let duplicates = enumeration.duplicates().len();
    info!(
        states = enumeration.len(),
        skipped,
        duplicates,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "enumeration finished"
    );
    if duplicates > 0 {
        warn!(duplicates, "distinct placements share a storage index");
    }

    Ok(enumeration)
}

fn enumerate_from(
    encoder: &Encoder,
    candidates: &[AgentPosition],
    first: usize,
) -> Result<(Vec<EnumeratedState>, u64), PlacementIndexError> {
    let agents = encoder.agents();
    let count = candidates.len();

    let mut states = Vec::new();
    let mut skipped = 0u64;
    let mut members = vec![0usize; agents];
    members[0] = first;
    let mut tuple = Vec::with_capacity(agents);

    loop {
        tuple.clear();
        tuple.extend(members.iter().map(|&id| candidates[id]));

        if has_repeated_position(&tuple) {
            skipped += 1;
        } else {
            states.push(EnumeratedState {
                index: encoder.encode_positions(&tuple)?,
                members: members.clone(),
            });
        }

        // Odometer over agents 1..N, last agent varies fastest
        let mut k = agents;
        loop {
            if k == 1 {
                debug!(first, states = states.len(), skipped, "partition done");
                return Ok((states, skipped));
            }
            k -= 1;
            members[k] += 1;
            if members[k] < count {
                break;
            }
            members[k] = 0;
        }
    }
}

fn has_repeated_position(tuple: &[AgentPosition]) -> bool {
    tuple
        .iter()
        .enumerate()
        .any(|(i, a)| tuple[i + 1..].iter().any(|b| a == b))
}
