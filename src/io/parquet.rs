use crate::enumerate::Enumeration;
use crate::error::PlacementIndexError;
use crate::grid::CandidateGrid;
use crate::io::arrow::StatesToArrow;
use arrow_array::RecordBatch;
use parquet::arrow::ArrowWriter;
use std::fs::File;
use std::path::Path;

pub fn write_parquet(
    batch: &RecordBatch,
    path: impl AsRef<Path>,
) -> Result<(), PlacementIndexError> {
    let file = File::create(path).map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)
        .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;

    writer
        .write(batch)
        .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;
    writer
        .close()
        .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;

    Ok(())
}

pub trait StatesToParquet: StatesToArrow {
    fn to_parquet(
        &self,
        grid: &CandidateGrid,
        path: impl AsRef<Path>,
    ) -> Result<(), PlacementIndexError>;
}

impl StatesToParquet for Enumeration {
    fn to_parquet(
        &self,
        grid: &CandidateGrid,
        path: impl AsRef<Path>,
    ) -> Result<(), PlacementIndexError> {
        let batch = self.to_record_batch(grid)?;
        write_parquet(&batch, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate;
    use crate::index::{Encoder, GridShape};
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::tempdir;

    #[test]
    fn test_states_to_parquet() -> Result<(), PlacementIndexError> {
        let grid = CandidateGrid::from_extent(0.0, 0.0, 3000.0, 3000.0, 1000.0, &[30.0])?;
        let states = enumerate(&Encoder::new(2, GridShape::new(3, 3, 1)?)?, &grid)?;

        let dir = tempdir().map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        let path = dir.path().join("states.parquet");

        states.to_parquet(&grid, &path)?;

        let file = File::open(&path).map_err(|e| PlacementIndexError::IoError(e.to_string()))?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .and_then(|b| b.build())
            .map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;

        let mut rows = 0;
        for batch in reader {
            let batch = batch.map_err(|e| PlacementIndexError::ArrowError(e.to_string()))?;
            assert_eq!(batch.num_columns(), 9);
            rows += batch.num_rows();
        }
        assert_eq!(rows, 9 * 8);
        Ok(())
    }
}
