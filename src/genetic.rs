//! Generational layout search.
//!
//! Each generation breeds a candidate pool from the current seeds, scores it
//! with [`Fitness`] and keeps the best `selection_size` candidates as the next
//! seeds. Seeds are carried into their own pool unchanged, so the best score
//! never gets worse from one generation to the next.

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{LayoutConfig, LayoutStrategy};
use crate::crossover::generate_layouts;
use crate::error::LayoutError;
use crate::fitness::Fitness;
use crate::graph::Graph;
use crate::layout::{Layout, arc_layout, random_layout};
use crate::select::select_top;

/// Result of a finished search
#[derive(Debug, Clone)]
pub struct Evolution {
    /// Highest-ranked survivor of the final generation
    pub layout: Layout,
    pub score: f64,
    /// Best score of each generation, in order
    pub history: Vec<f64>,
}

pub struct GeneticLayout<'g> {
    graph: &'g Graph,
    config: LayoutConfig,
    fitness: Fitness,
}

impl<'g> GeneticLayout<'g> {
    pub fn new(graph: &'g Graph, config: &LayoutConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        if config.selection_size > config.seed_count {
            warn!(
                selection_size = config.selection_size,
                seed_count = config.seed_count,
                "more survivors than seeds; later generations breed larger pools"
            );
        }
        Ok(Self {
            graph,
            config: config.clone(),
            fitness: config.fitness(),
        })
    }

    /// Run the search for the configured number of generations.
    pub fn run<R: Rng>(&self, rng: &mut R) -> Result<Evolution, LayoutError> {
        let scale = f64::from(self.config.scale);
        let mut seeds: Vec<Layout> = (0..self.config.seed_count)
            .map(|_| random_layout(self.graph, scale, rng))
            .collect();

        info!(
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            seeds = self.config.seed_count,
            iterations = self.config.iterations,
            "starting layout search"
        );

        if self.config.iterations == 0 {
            let scores = self.score_all(&seeds)?;
            let best = select_top(&scores, 1)?[0];
            return Ok(Evolution {
                layout: seeds.swap_remove(best),
                score: scores[best],
                history: Vec::new(),
            });
        }

        let mut history = Vec::with_capacity(self.config.iterations);
        for generation in 0..self.config.iterations {
            let mut pool = generate_layouts(&seeds, rng);
            let scores = self.score_all(&pool)?;
            let survivors = select_top(&scores, self.config.selection_size)?;

            let best = scores[survivors[0]];
            debug!(
                generation,
                pool = pool.len(),
                best,
                worst_survivor = scores[survivors[survivors.len() - 1]],
                "generation scored"
            );
            history.push(best);

            // Survivor indices are distinct, so each slot is taken at most once.
            seeds = survivors
                .iter()
                .map(|&i| std::mem::take(&mut pool[i]))
                .collect();
        }

        let score = history[history.len() - 1];
        info!(score, "layout search finished");

        Ok(Evolution {
            layout: seeds.swap_remove(0),
            score,
            history,
        })
    }

    /// Score every candidate. Scores are independent, so with `parallel` set
    /// they are computed on the rayon pool and joined before selection.
    fn score_all(&self, pool: &[Layout]) -> Result<Vec<f64>, LayoutError> {
        if self.config.parallel {
            pool.par_iter()
                .map(|layout| self.fitness.rank(layout, self.graph))
                .collect()
        } else {
            pool.iter()
                .map(|layout| self.fitness.rank(layout, self.graph))
                .collect()
        }
    }
}

/// Lay out `graph` on a `scale × scale` canvas with the default tunables.
pub fn compute_layout(graph: &Graph, scale: u32) -> Result<Layout, LayoutError> {
    let config = LayoutConfig {
        scale,
        ..LayoutConfig::default()
    };
    compute_layout_with(graph, &config, &mut rand::rng())
}

/// Lay out `graph` with an explicit config and random source.
pub fn compute_layout_with<R: Rng>(
    graph: &Graph,
    config: &LayoutConfig,
    rng: &mut R,
) -> Result<Layout, LayoutError> {
    config.validate()?;
    let scale = f64::from(config.scale);

    match config.strategy {
        LayoutStrategy::Genetic => Ok(GeneticLayout::new(graph, config)?.run(rng)?.layout),
        LayoutStrategy::Arc => Ok(arc_layout(graph, scale)),
        LayoutStrategy::Random => Ok(random_layout(graph, scale, rng)),
    }
}
