//! Depth grids and piecewise-constant sampling of layered models.

use std::sync::Arc;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use strata_core::{BoundaryRule, ErrorInfo, LayeredModel, Property, StrataError};

use crate::config::StatsOpts;

/// Fraction of a step tolerated when deciding whether `dmax` is on the grid.
pub const GRID_EPSILON: f64 = 1e-6;

/// Largest number of depths a grid may hold.
pub const MAX_GRID_POINTS: usize = 1_000_000;

/// Depths `0, dy, 2·dy, …` up to and including `dmax` when it lies on the grid.
///
/// Grids of more than [`MAX_GRID_POINTS`] depths are rejected.
///
/// Points are computed as `i · dy` rather than by accumulation, and a last
/// point within [`GRID_EPSILON`] steps of `dmax` is snapped onto it.
pub fn depth_grid(dmax: f64, dy: f64) -> Result<Vec<f64>, StrataError> {
    StatsOpts::with_grid(dmax, dy).validate()?;
    let steps = (dmax / dy + GRID_EPSILON).floor();
    if !(steps < MAX_GRID_POINTS as f64) {
        return Err(StrataError::Grid(
            ErrorInfo::new(
                "grid-too-large",
                format!("dmax {dmax} with dy {dy} needs more than {MAX_GRID_POINTS} depths"),
            )
            .with_context("dmax", dmax)
            .with_context("dy", dy)
            .with_hint("increase dy or reduce dmax"),
        ));
    }
    let steps = steps as usize;
    let mut grid: Vec<f64> = (0..=steps).map(|step| step as f64 * dy).collect();
    if let Some(last) = grid.last_mut() {
        if (dmax - *last).abs() <= GRID_EPSILON * dy {
            *last = dmax;
        }
    }
    Ok(grid)
}

/// Values of `property` at each of `depths`.
pub fn sample(
    model: &LayeredModel,
    depths: &[f64],
    property: Property,
    rule: BoundaryRule,
) -> Result<Vec<f64>, StrataError> {
    depths
        .iter()
        .map(|&depth| model.value_at_with(depth, property, rule))
        .collect()
}

/// Samples models on a fixed depth grid.
///
/// With `concurrency > 1` a rayon pool of that many workers is built once and
/// reused by every [`DepthSampler::sample_all`] call.
#[derive(Debug, Clone)]
pub struct DepthSampler {
    grid: Vec<f64>,
    rule: BoundaryRule,
    pool: Option<Arc<ThreadPool>>,
}

impl DepthSampler {
    /// Builds the grid described by `opts` and, when needed, the worker pool.
    pub fn new(opts: &StatsOpts) -> Result<Self, StrataError> {
        let opts = opts.sanitised();
        let grid = depth_grid(opts.dmax, opts.dy)?;
        let pool = if opts.concurrency > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(opts.concurrency)
                .build()
                .map_err(|err| {
                    StrataError::Grid(
                        ErrorInfo::new("thread-pool", err.to_string())
                            .with_context("concurrency", opts.concurrency),
                    )
                })?;
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Self {
            grid,
            rule: opts.boundary,
            pool,
        })
    }

    /// The sampling depths.
    pub fn grid(&self) -> &[f64] {
        &self.grid
    }

    /// Boundary rule applied at interfaces.
    pub fn rule(&self) -> BoundaryRule {
        self.rule
    }

    /// Worker threads used by [`DepthSampler::sample_all`].
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, |pool| pool.current_num_threads())
    }

    /// Values of `property` in `model` at every grid depth.
    pub fn sample(&self, model: &LayeredModel, property: Property) -> Result<Vec<f64>, StrataError> {
        sample(model, &self.grid, property, self.rule)
    }

    /// Samples every model, returning one row per model in input order.
    pub fn sample_all(
        &self,
        models: &[&LayeredModel],
        property: Property,
    ) -> Result<Vec<Vec<f64>>, StrataError> {
        match &self.pool {
            None => models
                .iter()
                .map(|model| self.sample(model, property))
                .collect(),
            Some(pool) => pool.install(|| {
                models
                    .par_iter()
                    .map(|model| self.sample(model, property))
                    .collect()
            }),
        }
    }
}
