#![deny(missing_docs)]
#![doc = "Depth-sampled statistics over misfit-ranked ensembles of layered earth models."]

pub mod config;
pub mod numeric;
pub mod sampler;
mod stats;
mod summary;

pub use config::StatsOpts;
pub use sampler::{depth_grid, sample, DepthSampler, GRID_EPSILON, MAX_GRID_POINTS};
pub use stats::{
    layerwise_median, median_model, median_profile, sigma_ln, vs30, MedianProfile, SigmaLnProfile,
};
pub use summary::{summarize, EnsembleSummary};
