//! Serializable bundle of the ensemble statistics.

use serde::{Deserialize, Serialize};
use strata_core::{LayeredModel, Property, StrataError};
use strata_suite::{ModelEnsemble, Selection};

use crate::config::StatsOpts;
use crate::stats::{median_model, sigma_ln, vs30, SigmaLnProfile};

/// Statistics of one selection, ready for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleSummary {
    /// Population of the whole ensemble.
    pub population: usize,
    /// Selection the statistics were computed over.
    pub selection: Selection,
    /// Identifiers of the selected models, in selection order.
    pub ids: Vec<String>,
    /// Misfits of the selected models, in selection order.
    pub misfits: Vec<f64>,
    /// Vs30 of the selected models, in selection order.
    pub vs30: Vec<f64>,
    /// Model collapsed from the per-depth medians.
    pub median: LayeredModel,
    /// Shear-wave velocity dispersion with depth.
    pub sigma_ln_vs: SigmaLnProfile,
}

/// Computes every statistic for `selection` in one pass over the options.
pub fn summarize(
    ensemble: &ModelEnsemble,
    selection: Selection,
    opts: &StatsOpts,
) -> Result<EnsembleSummary, StrataError> {
    let indices = ensemble.select(selection)?;
    Ok(EnsembleSummary {
        population: ensemble.len(),
        selection,
        ids: indices.iter().map(|&idx| ensemble.ids()[idx].clone()).collect(),
        misfits: indices.iter().map(|&idx| ensemble.misfits()[idx]).collect(),
        vs30: vs30(ensemble, selection)?,
        median: median_model(ensemble, selection, opts)?,
        sigma_ln_vs: sigma_ln(ensemble, selection, Property::Vs, opts)?,
    })
}
