//! Generator parameters.
//!
//! Every generator takes a parameter struct whose [`Default`] matches the size
//! the corresponding mini-game uses. [`PuzzleConfig`] groups all four so a host
//! can load them from one file.

use serde::{Deserialize, Serialize};

use crate::GeneratorError;

fn invalid(reason: &'static str) -> GeneratorError {
    GeneratorError::InvalidParameters { reason }
}

/// Parameters of all four generators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Keen (arithmetic cage) parameters.
    pub keen: KeenParams,
    /// Region map parameters.
    pub map: MapParams,
    /// Bridges parameters.
    pub bridges: BridgesParams,
    /// Untangle parameters.
    pub untangle: UntangleParams,
}

impl PuzzleConfig {
    /// Validates every parameter group.
    ///
    /// # Errors
    ///
    /// Returns the first [`GeneratorError::InvalidParameters`] found.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        self.keen.validate()?;
        self.map.validate()?;
        self.bridges.validate()?;
        self.untangle.validate()
    }
}

/// Parameters of the Keen generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeenParams {
    /// Order of the Latin square.
    pub size: u8,
    /// Largest cage, in cells.
    pub max_cage_size: u8,
}

impl Default for KeenParams {
    fn default() -> Self {
        Self {
            size: 4,
            max_cage_size: 3,
        }
    }
}

impl KeenParams {
    /// Checks that the parameters are in range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the size is not in `1..=9` or
    /// the cage size is not in `1..=3`.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(1..=9).contains(&self.size) {
            return Err(invalid("keen size must be in 1..=9"));
        }
        if !(1..=3).contains(&self.max_cage_size) {
            return Err(invalid("keen cage size must be in 1..=3"));
        }
        Ok(())
    }
}

/// Parameters of the region map generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapParams {
    /// Grid width in cells.
    pub width: u8,
    /// Grid height in cells.
    pub height: u8,
    /// Number of regions.
    pub regions: usize,
    /// Probability that a region's colour is revealed as a fixed clue.
    pub clue_probability: f64,
    /// Maps generated before giving up when colouring fails.
    pub max_attempts: u32,
}

impl Default for MapParams {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
            regions: 12,
            clue_probability: 0.3,
            max_attempts: 8,
        }
    }
}

impl MapParams {
    /// Checks that the parameters are in range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the grid is empty or larger
    /// than 32×32, the region count is zero or exceeds the cell count, the clue
    /// probability is not in `[0, 1]`, or no attempt is allowed.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(1..=32).contains(&self.width) || !(1..=32).contains(&self.height) {
            return Err(invalid("map dimensions must be in 1..=32"));
        }
        let cells = usize::from(self.width) * usize::from(self.height);
        if self.regions == 0 || self.regions > cells {
            return Err(invalid("map region count must be in 1..=width*height"));
        }
        if !(0.0..=1.0).contains(&self.clue_probability) {
            return Err(invalid("map clue probability must be in [0, 1]"));
        }
        if self.max_attempts == 0 {
            return Err(invalid("map attempts must be positive"));
        }
        Ok(())
    }
}

/// Parameters of the bridges generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgesParams {
    /// Grid width in cells.
    pub width: u8,
    /// Grid height in cells.
    pub height: u8,
    /// Smallest island count to aim for.
    pub min_islands: usize,
    /// Largest island count to aim for.
    pub max_islands: usize,
    /// Shortest step between a new island and the island it grows from.
    pub min_step: u8,
    /// Longest step between a new island and the island it grows from.
    pub max_step: u8,
    /// Probability that a solution bridge is doubled.
    pub double_probability: f64,
    /// Whole-puzzle restarts allowed when growth stalls.
    pub max_restarts: u32,
}

impl Default for BridgesParams {
    fn default() -> Self {
        Self {
            width: 7,
            height: 7,
            min_islands: 6,
            max_islands: 10,
            min_step: 2,
            max_step: 4,
            double_probability: 0.3,
            max_restarts: 32,
        }
    }
}

impl BridgesParams {
    /// Checks that the parameters are in range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if the grid is empty or larger
    /// than 32×32, the island range is empty or starts below 2, the step range is
    /// empty or starts below 2, or the double probability is not in `[0, 1]`.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(1..=32).contains(&self.width) || !(1..=32).contains(&self.height) {
            return Err(invalid("bridges dimensions must be in 1..=32"));
        }
        if self.min_islands < 2 || self.min_islands > self.max_islands {
            return Err(invalid("bridges island range must be non-empty and start at 2 or more"));
        }
        if self.min_step < 2 || self.min_step > self.max_step {
            return Err(invalid("bridges step range must be non-empty and start at 2 or more"));
        }
        if !(0.0..=1.0).contains(&self.double_probability) {
            return Err(invalid("bridges double probability must be in [0, 1]"));
        }
        Ok(())
    }
}

/// Parameters of the untangle generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UntangleParams {
    /// Number of nodes.
    pub nodes: usize,
    /// Edge budget as a multiple of the node count.
    pub edge_ratio: f64,
    /// Preferred minimum distance between solved positions in the unit square.
    pub min_spacing: f64,
    /// Scrambles drawn before accepting a layout without crossings.
    pub max_scramble_attempts: u32,
}

impl Default for UntangleParams {
    fn default() -> Self {
        Self {
            nodes: 8,
            edge_ratio: 1.5,
            min_spacing: 0.12,
            max_scramble_attempts: 16,
        }
    }
}

impl UntangleParams {
    /// Checks that the parameters are in range.
    ///
    /// # Errors
    ///
    /// Returns [`GeneratorError::InvalidParameters`] if there are fewer than two or
    /// more than 64 nodes, or the edge ratio or spacing is negative or not finite.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if !(2..=64).contains(&self.nodes) {
            return Err(invalid("untangle node count must be in 2..=64"));
        }
        if !self.edge_ratio.is_finite() || self.edge_ratio < 0.0 {
            return Err(invalid("untangle edge ratio must be a non-negative number"));
        }
        if !self.min_spacing.is_finite() || self.min_spacing < 0.0 {
            return Err(invalid("untangle spacing must be a non-negative number"));
        }
        Ok(())
    }

    /// Returns the maximum number of edges, `floor(edge_ratio × nodes)`.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn edge_cap(&self) -> usize {
        (self.edge_ratio * self.nodes as f64).floor() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        PuzzleConfig::default().validate().unwrap();
        assert_eq!(UntangleParams::default().edge_cap(), 12);
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let keen = KeenParams {
            size: 0,
            ..KeenParams::default()
        };
        assert!(keen.validate().is_err());

        let map = MapParams {
            regions: 50,
            ..MapParams::default()
        };
        assert!(map.validate().is_err());

        let bridges = BridgesParams {
            min_islands: 11,
            ..BridgesParams::default()
        };
        assert!(bridges.validate().is_err());

        let untangle = UntangleParams {
            edge_ratio: f64::NAN,
            ..UntangleParams::default()
        };
        assert!(untangle.validate().is_err());
    }
}
