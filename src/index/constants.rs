/// Site distance covered by one x digit
pub const DEFAULT_X_CELL: f64 = 1000.0;

/// Site distance covered by one y digit
pub const DEFAULT_Y_CELL: f64 = 1000.0;

/// Altitude covered by one z digit
pub const DEFAULT_Z_CELL: f64 = 10.0;

/// Altitude digit subtracted so that the 30 m flight level maps to digit 0
pub const DEFAULT_Z_OFFSET: i64 = 3;

/// Candidate sweep along x and y used by the placement scenarios: start, last, step
pub const STANDARD_SWEEP: (f64, f64, f64) = (500.0, 9500.0, 1000.0);

/// Flight level of the placement scenarios
pub const STANDARD_ALTITUDE: f64 = 30.0;

/// Grid shape (lines, columns, altitude levels) matching [`STANDARD_SWEEP`]
pub const STANDARD_GRID: (u32, u32, u32) = (10, 10, 1);
