use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::fitness::{DEFAULT_ATTRACTION, DEFAULT_REPULSION, Fitness};
use crate::render::RenderStyle;

const SEED_COUNT: usize = 10;
const ITERATIONS: usize = 100;
const SELECTION_SIZE: usize = 10;
const SCALE: u32 = 512;

/// How node positions are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStrategy {
    /// Generational search over random seed layouts
    #[default]
    Genetic,
    /// Evenly spaced along the horizontal midline
    Arc,
    /// Uniformly random positions
    Random,
}

/// Tunables for layout search and rendering.
///
/// Every field has a default, so a config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    #[serde(default)]
    pub strategy: LayoutStrategy,
    /// Random layouts generated before the first generation
    #[serde(default = "default_seed_count")]
    pub seed_count: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Survivors kept from each generation
    #[serde(default = "default_selection_size")]
    pub selection_size: usize,
    #[serde(default = "default_attraction")]
    pub attraction: f64,
    #[serde(default = "default_repulsion")]
    pub repulsion: f64,
    /// Side of the square canvas that seed positions are drawn from
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub rng_seed: Option<u64>,
    /// Score candidates on the rayon thread pool
    #[serde(default = "default_parallel")]
    pub parallel: bool,

    #[serde(default)]
    pub style: RenderStyle,
}

fn default_seed_count() -> usize {
    SEED_COUNT
}
fn default_iterations() -> usize {
    ITERATIONS
}
fn default_selection_size() -> usize {
    SELECTION_SIZE
}
fn default_attraction() -> f64 {
    DEFAULT_ATTRACTION
}
fn default_repulsion() -> f64 {
    DEFAULT_REPULSION
}
fn default_scale() -> u32 {
    SCALE
}
fn default_parallel() -> bool {
    true
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutStrategy::default(),
            seed_count: SEED_COUNT,
            iterations: ITERATIONS,
            selection_size: SELECTION_SIZE,
            attraction: DEFAULT_ATTRACTION,
            repulsion: DEFAULT_REPULSION,
            scale: SCALE,
            rng_seed: None,
            parallel: true,
            style: RenderStyle::default(),
        }
    }
}

impl LayoutConfig {
    pub fn from_toml(content: &str) -> Result<Self, LayoutError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| LayoutError::InvalidConfig(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, LayoutError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| LayoutError::InvalidConfig(format!("Failed to parse YAML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, LayoutError> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| LayoutError::InvalidConfig(format!("Failed to parse JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, choosing the parser from the extension.
    pub fn from_path(path: &Path) -> Result<Self, LayoutError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("toml") => Self::from_toml(&content),
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            Some("json") => Self::from_json(&content),
            _ => Err(LayoutError::InvalidConfig(format!(
                "Unsupported config format: {} (use .toml, .yaml or .json)",
                path.display()
            ))),
        }
    }

    /// Reject settings the search cannot run with.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.scale == 0 {
            return Err(LayoutError::InvalidConfig("scale must be positive".to_string()));
        }
        if self.seed_count == 0 {
            return Err(LayoutError::InvalidConfig(
                "seed_count must be at least 1".to_string(),
            ));
        }
        if self.selection_size == 0 {
            return Err(LayoutError::InvalidConfig(
                "selection_size must be at least 1".to_string(),
            ));
        }
        // The first pool holds seed_count + seed_count·(seed_count − 1) candidates.
        let first_pool = self.seed_count.saturating_mul(self.seed_count);
        if self.selection_size > first_pool {
            return Err(LayoutError::InvalidConfig(format!(
                "selection_size {} exceeds the {} candidates bred from {} seeds",
                self.selection_size, first_pool, self.seed_count
            )));
        }
        for (name, value) in [("attraction", self.attraction), ("repulsion", self.repulsion)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "{} must be a finite, non-negative number (got {})",
                    name, value
                )));
            }
        }
        Ok(())
    }

    pub fn fitness(&self) -> Fitness {
        Fitness::new(self.attraction, self.repulsion)
    }

    /// Random source for a run: seeded from `rng_seed` when set, from the OS otherwise.
    pub fn rng(&self) -> StdRng {
        match self.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}
