//! Configuration for the depth-sampled statistics.

use serde::{Deserialize, Serialize};
use strata_core::{BoundaryRule, ErrorInfo, StrataError};

fn serde_error(code: &str, err: impl ToString) -> StrataError {
    StrataError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn default_dmax() -> f64 {
    50.0
}

fn default_dy() -> f64 {
    0.5
}

fn default_concurrency() -> usize {
    1
}

/// YAML/JSON-configurable parameters shared by the median and sigma_ln computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsOpts {
    /// Deepest grid depth in metres, included in the grid.
    #[serde(default = "default_dmax")]
    pub dmax: f64,
    /// Grid step in metres.
    #[serde(default = "default_dy")]
    pub dy: f64,
    /// Layer assignment for grid depths lying exactly on an interface.
    #[serde(default)]
    pub boundary: BoundaryRule,
    /// Worker threads used to sample models; `1` samples sequentially.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for StatsOpts {
    fn default() -> Self {
        Self {
            dmax: default_dmax(),
            dy: default_dy(),
            boundary: BoundaryRule::default(),
            concurrency: default_concurrency(),
        }
    }
}

impl StatsOpts {
    /// Default options with an explicit grid.
    pub fn with_grid(dmax: f64, dy: f64) -> Self {
        Self {
            dmax,
            dy,
            ..Self::default()
        }
    }

    /// Returns a copy with at least one worker thread.
    pub fn sanitised(&self) -> Self {
        Self {
            concurrency: self.concurrency.max(1),
            ..self.clone()
        }
    }

    /// Checks the grid parameters.
    pub fn validate(&self) -> Result<(), StrataError> {
        if !(self.dy.is_finite() && self.dy > 0.0) {
            return Err(StrataError::Grid(
                ErrorInfo::new("non-positive-step", "dy must be positive and finite")
                    .with_context("dy", self.dy),
            ));
        }
        if !(self.dmax.is_finite() && self.dmax > 0.0) {
            return Err(StrataError::Grid(
                ErrorInfo::new("non-positive-dmax", "dmax must be positive and finite")
                    .with_context("dmax", self.dmax),
            ));
        }
        Ok(())
    }

    /// Parses and validates options from YAML.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, StrataError> {
        let opts: Self =
            serde_yaml::from_slice(data).map_err(|err| serde_error("yaml-deserialize", err))?;
        opts.validate()?;
        Ok(opts.sanitised())
    }

    /// Parses and validates options from JSON.
    pub fn from_json_slice(data: &[u8]) -> Result<Self, StrataError> {
        let opts: Self =
            serde_json::from_slice(data).map_err(|err| serde_error("json-deserialize", err))?;
        opts.validate()?;
        Ok(opts.sanitised())
    }

    /// Serializes the options into YAML.
    pub fn to_yaml_string(&self) -> Result<String, StrataError> {
        serde_yaml::to_string(self).map_err(|err| serde_error("yaml-serialize", err))
    }
}
