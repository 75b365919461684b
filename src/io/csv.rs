use crate::enumerate::Enumeration;
use crate::error::PlacementIndexError;
use crate::grid::CandidateGrid;
use std::fs::File;
use std::path::Path;

/// Writes an enumerated state table as CSV.
///
/// Columns are `storage_index` followed by `agent{i}_x`, `agent{i}_y`, `agent{i}_z`
/// for each agent, one row per state in index order.
///
/// # Example
///
/// ```no_run
/// use placement_index::{CandidateGrid, Encoder, GridShape, enumerate, write_states_csv};
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let grid = CandidateGrid::standard();
/// let states = enumerate(&Encoder::new(2, GridShape::new(10, 10, 1)?)?, &grid)?;
/// write_states_csv(&states, &grid, "states.csv")?;
/// # Ok(())
/// # }
/// ```
pub fn write_states_csv(
    enumeration: &Enumeration,
    grid: &CandidateGrid,
    output_path: impl AsRef<Path>,
) -> Result<(), PlacementIndexError> {
    let agents = enumeration
        .states()
        .first()
        .map(|s| s.members.len())
        .unwrap_or(0);

    let out_file =
        File::create(output_path).map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
    let mut writer = csv::Writer::from_writer(out_file);

    let mut header_row = vec!["storage_index".to_string()];
    for agent in 0..agents {
        for axis in ["x", "y", "z"] {
            header_row.push(format!("agent{}_{}", agent, axis));
        }
    }
    writer
        .write_record(&header_row)
        .map_err(|e| PlacementIndexError::CsvError(e.to_string()))?;

    let mut row: Vec<String> = Vec::with_capacity(header_row.len());
    for state in enumeration.states() {
        row.clear();
        row.push(state.index.to_string());
        for &id in &state.members {
            let pos = grid.get(id).ok_or_else(|| {
                PlacementIndexError::CsvError(format!("candidate {} not in grid", id))
            })?;
            row.push(pos.x.to_string());
            row.push(pos.y.to_string());
            row.push(pos.z.to_string());
        }
        writer
            .write_record(&row)
            .map_err(|e| PlacementIndexError::CsvError(e.to_string()))?;
    }

    writer
        .flush()
        .map_err(|e| PlacementIndexError::CsvError(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate;
    use crate::index::{Encoder, GridShape};
    use tempfile::tempdir;

    #[test]
    fn test_write_states_csv() -> Result<(), PlacementIndexError> {
        let dir = tempdir().map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        let output_path = dir.path().join("states.csv");

        let grid = CandidateGrid::from_extent(0.0, 0.0, 2000.0, 2000.0, 1000.0, &[30.0])?;
        let states = enumerate(&Encoder::new(2, GridShape::new(2, 2, 1)?)?, &grid)?;
        write_states_csv(&states, &grid, &output_path)?;

        let output = std::fs::read_to_string(&output_path)
            .map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(
            lines[0],
            "storage_index,agent0_x,agent0_y,agent0_z,agent1_x,agent1_y,agent1_z"
        );
        assert_eq!(lines.len(), 1 + 12);
        assert_eq!(lines[1], "1,1500,500,30,500,500,30");
        Ok(())
    }

    #[test]
    fn test_write_empty_enumeration() -> Result<(), PlacementIndexError> {
        let dir = tempdir().map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        let output_path = dir.path().join("empty.csv");

        write_states_csv(&Enumeration::default(), &CandidateGrid::standard(), &output_path)?;

        let output = std::fs::read_to_string(&output_path)
            .map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        assert_eq!(output.trim(), "storage_index");
        Ok(())
    }
}
