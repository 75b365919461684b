use crate::error::PlacementIndexError;
use crate::grid::CandidateGrid;
use crate::index::{
    AgentOrder, Encoder, GridShape, QuantizationScale, STANDARD_ALTITUDE, STANDARD_GRID,
    Strictness,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for building an [`Encoder`].
///
/// # Example
/// ```
/// use placement_index::{AgentOrder, EncoderConfig, GridShape};
///
/// # fn main() -> Result<(), placement_index::PlacementIndexError> {
/// let encoder = EncoderConfig::new(3, GridShape::new(10, 10, 1)?)
///     .strict()
///     .order(AgentOrder::Canonical)
///     .build()?;
/// assert!(encoder.is_strict());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub agents: usize,
    pub grid: GridShape,
    pub scale: QuantizationScale,
    pub strictness: Strictness,
    pub order: AgentOrder,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        let (lines, columns, altitudes) = STANDARD_GRID;
        Self {
            agents: 1,
            grid: GridShape {
                lines,
                columns,
                altitudes,
            },
            scale: QuantizationScale::default(),
            strictness: Strictness::default(),
            order: AgentOrder::default(),
        }
    }
}

impl EncoderConfig {
    pub fn new(agents: usize, grid: GridShape) -> Self {
        Self {
            agents,
            grid,
            ..Self::default()
        }
    }

    pub fn scale(mut self, scale: QuantizationScale) -> Self {
        self.scale = scale;
        self
    }

    pub fn strict(mut self) -> Self {
        self.strictness = Strictness::Strict;
        self
    }

    pub fn order(mut self, order: AgentOrder) -> Self {
        self.order = order;
        self
    }

    /// Validates the configuration and builds the encoder.
    pub fn build(&self) -> Result<Encoder, PlacementIndexError> {
        Ok(Encoder::new(self.agents, self.grid)?
            .with_scale(self.scale)?
            .strictness(self.strictness)
            .order(self.order))
    }
}

/// Rectangular site swept by the enumerator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// `[min_x, min_y, max_x, max_y]`
    pub extent: [f64; 4],
    pub step: f64,
    pub altitudes: Vec<f64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            extent: [0.0, 0.0, 10000.0, 10000.0],
            step: 1000.0,
            altitudes: vec![STANDARD_ALTITUDE],
        }
    }
}

impl SiteConfig {
    pub fn candidate_grid(&self) -> Result<CandidateGrid, PlacementIndexError> {
        let [min_x, min_y, max_x, max_y] = self.extent;
        CandidateGrid::builder()
            .extent(min_x, min_y, max_x, max_y)
            .step(self.step)
            .altitudes(self.altitudes.clone())
            .build()
    }
}

/// Configuration of an enumeration run, loadable from JSON.
///
/// Every field is optional in the file; missing fields take the scenario defaults
/// (one agent, 10x10x1 grid, 10000 x 10000 site at 30 m).
///
/// ```json
/// {
///   "encoder": { "agents": 3, "grid": { "lines": 10, "columns": 10, "altitudes": 1 } },
///   "site": { "step": 1000.0 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnumerationConfig {
    pub encoder: EncoderConfig,
    pub site: SiteConfig,
}

impl EnumerationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, PlacementIndexError> {
        serde_json::from_str(json).map_err(|e| PlacementIndexError::ConfigError(e.to_string()))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, PlacementIndexError> {
        let json =
            fs::read_to_string(path).map_err(|e| PlacementIndexError::ConfigError(e.to_string()))?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, PlacementIndexError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| PlacementIndexError::ConfigError(e.to_string()))
    }
}
