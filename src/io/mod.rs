pub mod arrow;
pub mod csv;
pub mod parquet;

pub use self::arrow::StatesToArrow;
pub use self::csv::write_states_csv;
pub use self::parquet::{StatesToParquet, write_parquet};
