//! Vs30, median model and log-normal dispersion over a ranked subset of an ensemble.

use serde::{Deserialize, Serialize};
use strata_core::tolerance::approx_eq;
use strata_core::{BoundaryRule, ErrorInfo, LayeredModel, Property, StrataError};
use strata_suite::{ModelEnsemble, Selection};
use tracing::{debug, warn};

use crate::config::StatsOpts;
use crate::numeric::{median, sample_std};
use crate::sampler::DepthSampler;

/// Per-depth median curves of the stored properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedianProfile {
    /// Sampling depths.
    pub depth: Vec<f64>,
    /// Median compression-wave velocity per depth.
    pub vp: Vec<f64>,
    /// Median shear-wave velocity per depth.
    pub vs: Vec<f64>,
    /// Median density per depth.
    pub density: Vec<f64>,
    /// Boundary rule the curves were sampled with.
    pub boundary: BoundaryRule,
}

/// Per-depth standard deviation of the natural log of one property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaLnProfile {
    /// Property the dispersion was computed for.
    pub property: Property,
    /// Sampling depths.
    pub depth: Vec<f64>,
    /// Dispersion aligned with `depth`.
    pub sigma: Vec<f64>,
}

fn per_depth(rows: &[Vec<f64>], depths: usize, reduce: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    let mut column = Vec::with_capacity(rows.len());
    (0..depths)
        .map(|idx| {
            column.clear();
            column.extend(rows.iter().map(|row| row[idx]));
            reduce(&column)
        })
        .collect()
}

/// Vs30 of every selected model, in selection order.
pub fn vs30(ensemble: &ModelEnsemble, selection: Selection) -> Result<Vec<f64>, StrataError> {
    let models = ensemble.selected(selection)?;
    debug!(selected = models.len(), %selection, "computing vs30");
    Ok(models.into_iter().map(LayeredModel::vs30).collect())
}

/// Per-depth medians of vp, vs and density across the selected models.
pub fn median_profile(
    ensemble: &ModelEnsemble,
    selection: Selection,
    opts: &StatsOpts,
) -> Result<MedianProfile, StrataError> {
    let models = ensemble.selected(selection)?;
    let sampler = DepthSampler::new(opts)?;
    let points = sampler.grid().len();
    debug!(selected = models.len(), grid_points = points, "computing median profile");
    // Selections are never empty and samples are finite, so the median exists.
    let reduce = |column: &[f64]| median(column).unwrap_or(f64::NAN);
    let vp = per_depth(&sampler.sample_all(&models, Property::Vp)?, points, reduce);
    let vs = per_depth(&sampler.sample_all(&models, Property::Vs)?, points, reduce);
    let density = per_depth(&sampler.sample_all(&models, Property::Density)?, points, reduce);
    Ok(MedianProfile {
        depth: sampler.grid().to_vec(),
        vp,
        vs,
        density,
        boundary: sampler.rule(),
    })
}

impl MedianProfile {
    /// Collapses runs of equal grid values into layers, ending in a half-space.
    ///
    /// An interface is placed at the first grid depth of the new run under
    /// [`BoundaryRule::Deeper`] and at the last depth of the previous run under
    /// [`BoundaryRule::Shallower`], so interfaces lying on the grid are
    /// reproduced exactly.
    pub fn to_model(&self) -> Result<LayeredModel, StrataError> {
        if self.depth.is_empty() {
            return Err(StrataError::Grid(ErrorInfo::new(
                "empty-grid",
                "a median profile needs at least one depth",
            )));
        }
        let mut tops = vec![0.0];
        let mut starts = vec![0];
        for idx in 1..self.depth.len() {
            let changed = !approx_eq(self.vp[idx], self.vp[idx - 1])
                || !approx_eq(self.vs[idx], self.vs[idx - 1])
                || !approx_eq(self.density[idx], self.density[idx - 1]);
            if !changed {
                continue;
            }
            let previous_top = tops.last().copied().unwrap_or(0.0);
            let interface = match self.boundary {
                BoundaryRule::Deeper => self.depth[idx],
                BoundaryRule::Shallower if self.depth[idx - 1] > previous_top => {
                    self.depth[idx - 1]
                }
                BoundaryRule::Shallower => self.depth[idx],
            };
            tops.push(interface);
            starts.push(idx);
        }
        let mut thickness: Vec<f64> = tops.windows(2).map(|pair| pair[1] - pair[0]).collect();
        thickness.push(0.0);
        LayeredModel::new(
            thickness,
            starts.iter().map(|&idx| self.vp[idx]).collect::<Vec<_>>(),
            starts.iter().map(|&idx| self.vs[idx]).collect::<Vec<_>>(),
            starts.iter().map(|&idx| self.density[idx]).collect::<Vec<_>>(),
        )
    }
}

/// Layered model built from the per-depth medians of the selected models.
pub fn median_model(
    ensemble: &ModelEnsemble,
    selection: Selection,
    opts: &StatsOpts,
) -> Result<LayeredModel, StrataError> {
    let model = median_profile(ensemble, selection, opts)?.to_model()?;
    debug!(layers = model.layer_count(), "collapsed median profile");
    Ok(model)
}

/// Per-depth unbiased standard deviation of `ln(property)` across the selected models.
///
/// A single selected model yields zero dispersion at every depth.
pub fn sigma_ln(
    ensemble: &ModelEnsemble,
    selection: Selection,
    property: Property,
    opts: &StatsOpts,
) -> Result<SigmaLnProfile, StrataError> {
    let models = ensemble.selected(selection)?;
    if models.len() == 1 {
        warn!(%property, "sigma_ln over a single model is zero at every depth");
    }
    let sampler = DepthSampler::new(opts)?;
    let rows = sampler.sample_all(&models, property)?;
    let points = sampler.grid().len();
    debug!(selected = models.len(), grid_points = points, %property, "computing sigma_ln");

    let mut logs = Vec::with_capacity(rows.len());
    for row in &rows {
        let mut logged = Vec::with_capacity(points);
        for (idx, value) in row.iter().enumerate() {
            if !(*value > 0.0) {
                return Err(StrataError::Model(
                    ErrorInfo::new(
                        "non-positive-log-input",
                        format!("{property} is {value}, its logarithm is undefined"),
                    )
                    .with_context("depth", sampler.grid()[idx]),
                ));
            }
            logged.push(value.ln());
        }
        logs.push(logged);
    }
    let sigma = per_depth(&logs, points, |column| sample_std(column).unwrap_or(0.0));
    Ok(SigmaLnProfile {
        property,
        depth: sampler.grid().to_vec(),
        sigma,
    })
}

/// Layer-by-layer median of the selected models after simplification.
///
/// Every simplified model must have the same number of layers; the median is
/// then taken per layer over thickness, vp, vs and density.
pub fn layerwise_median(
    ensemble: &ModelEnsemble,
    selection: Selection,
) -> Result<LayeredModel, StrataError> {
    let simplified: Vec<LayeredModel> = ensemble
        .selected(selection)?
        .into_iter()
        .map(LayeredModel::simplify)
        .collect();
    let layers = simplified[0].layer_count();
    if let Some(odd) = simplified.iter().position(|m| m.layer_count() != layers) {
        return Err(StrataError::Ensemble(
            ErrorInfo::new(
                "layer-count-mismatch",
                "selected models do not share a layer count after simplification",
            )
            .with_context("expected", layers)
            .with_context("found", simplified[odd].layer_count())
            .with_hint("use median_model for models with different layering"),
        ));
    }
    let column = |pick: fn(&LayeredModel) -> &[f64]| -> Vec<f64> {
        (0..layers)
            .map(|layer| {
                let values: Vec<f64> = simplified.iter().map(|m| pick(m)[layer]).collect();
                median(&values).unwrap_or(f64::NAN)
            })
            .collect()
    };
    LayeredModel::new(
        column(LayeredModel::thickness),
        column(LayeredModel::vp),
        column(LayeredModel::vs),
        column(LayeredModel::density),
    )
}
