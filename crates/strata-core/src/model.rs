//! One-dimensional layered earth models.

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, StrataError};
use crate::property::{BoundaryRule, Property};
use crate::tolerance::{approx_eq, slices_approx_eq};

fn model_error(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Model(ErrorInfo::new(code, message.into()))
}

/// Depth over which [`LayeredModel::vs30`] averages, in metres.
pub const VS30_DEPTH: f64 = 30.0;

/// A finite stack of homogeneous layers terminating in a half-space.
///
/// All four per-layer sequences share the same length. Every layer except the
/// last has a strictly positive thickness; the last layer is the half-space
/// and its stored thickness (conventionally `0`) is ignored by depth queries.
///
/// Equality is tolerant, see [`crate::tolerance`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "LayeredModelRecord")]
pub struct LayeredModel {
    thickness: Vec<f64>,
    vp: Vec<f64>,
    vs: Vec<f64>,
    density: Vec<f64>,
}

#[derive(Deserialize)]
struct LayeredModelRecord {
    thickness: Vec<f64>,
    vp: Vec<f64>,
    vs: Vec<f64>,
    density: Vec<f64>,
}

impl TryFrom<LayeredModelRecord> for LayeredModel {
    type Error = StrataError;

    fn try_from(record: LayeredModelRecord) -> Result<Self, Self::Error> {
        LayeredModel::new(record.thickness, record.vp, record.vs, record.density)
    }
}

/// Stair-step depth/value representation of a single property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Depths, two per layer (top then bottom).
    pub depth: Vec<f64>,
    /// Property values aligned with `depth`.
    pub value: Vec<f64>,
}

impl LayeredModel {
    /// Validates and builds a model from per-layer thickness, vp, vs and density.
    pub fn new(
        thickness: impl Into<Vec<f64>>,
        vp: impl Into<Vec<f64>>,
        vs: impl Into<Vec<f64>>,
        density: impl Into<Vec<f64>>,
    ) -> Result<Self, StrataError> {
        let model = Self {
            thickness: thickness.into(),
            vp: vp.into(),
            vs: vs.into(),
            density: density.into(),
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), StrataError> {
        let layers = self.thickness.len();
        if layers == 0 {
            return Err(model_error("empty-model", "a model needs at least one layer"));
        }
        for (name, values) in [("vp", &self.vp), ("vs", &self.vs), ("density", &self.density)] {
            if values.len() != layers {
                return Err(StrataError::Model(
                    ErrorInfo::new(
                        "layer-count-mismatch",
                        format!("{name} has {} entries, thickness has {layers}", values.len()),
                    )
                    .with_context("property", name),
                ));
            }
        }
        for (index, &value) in self.thickness.iter().enumerate() {
            let is_halfspace = index + 1 == layers;
            let valid = value.is_finite() && (value > 0.0 || (is_halfspace && value == 0.0));
            if !valid {
                return Err(StrataError::Model(
                    ErrorInfo::new(
                        "invalid-thickness",
                        format!("layer {index} has thickness {value}"),
                    )
                    .with_context("layer", index)
                    .with_hint("only the half-space may have zero thickness"),
                ));
            }
        }
        for (name, values) in [("vp", &self.vp), ("vs", &self.vs), ("density", &self.density)] {
            if let Some(index) = values.iter().position(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(StrataError::Model(
                    ErrorInfo::new(
                        "non-positive-property",
                        format!("{name} of layer {index} is {}", values[index]),
                    )
                    .with_context("property", name)
                    .with_context("layer", index),
                ));
            }
        }
        Ok(())
    }

    /// Number of layers, half-space included.
    pub fn layer_count(&self) -> usize {
        self.thickness.len()
    }

    /// Per-layer thicknesses.
    pub fn thickness(&self) -> &[f64] {
        &self.thickness
    }

    /// Per-layer compression-wave velocities.
    pub fn vp(&self) -> &[f64] {
        &self.vp
    }

    /// Per-layer shear-wave velocities.
    pub fn vs(&self) -> &[f64] {
        &self.vs
    }

    /// Per-layer densities.
    pub fn density(&self) -> &[f64] {
        &self.density
    }

    /// Value of `property` in layer `layer`.
    ///
    /// # Panics
    ///
    /// Panics when `layer >= self.layer_count()`.
    pub fn layer_value(&self, layer: usize, property: Property) -> f64 {
        match property {
            Property::Vp => self.vp[layer],
            Property::Vs => self.vs[layer],
            Property::Density => self.density[layer],
            Property::PoissonsRatio => poissons_ratio(self.vp[layer], self.vs[layer]),
        }
    }

    /// Per-layer values of `property`.
    pub fn values(&self, property: Property) -> Vec<f64> {
        (0..self.layer_count())
            .map(|layer| self.layer_value(layer, property))
            .collect()
    }

    /// Depth to the top of `layer`: the summed thickness of every layer above it.
    pub fn depth_of_top(&self, layer: usize) -> Result<f64, StrataError> {
        if layer >= self.layer_count() {
            return Err(StrataError::Model(
                ErrorInfo::new(
                    "layer-out-of-range",
                    format!("layer {layer} requested from a {}-layer model", self.layer_count()),
                )
                .with_context("layer", layer),
            ));
        }
        Ok(self.thickness[..layer].iter().sum())
    }

    /// Depth to the top of the half-space.
    pub fn halfspace_depth(&self) -> f64 {
        self.thickness[..self.layer_count() - 1].iter().sum()
    }

    /// Index of the layer containing `depth` under the given boundary rule.
    pub fn layer_index_at(&self, depth: f64, rule: BoundaryRule) -> Result<usize, StrataError> {
        if depth.is_nan() || depth < 0.0 {
            return Err(StrataError::Model(
                ErrorInfo::new("negative-depth", format!("depth {depth} is above the surface"))
                    .with_context("depth", depth),
            ));
        }
        let last = self.layer_count() - 1;
        let mut bottom = 0.0;
        for (layer, thickness) in self.thickness[..last].iter().enumerate() {
            bottom += thickness;
            let inside = match rule {
                BoundaryRule::Deeper => depth < bottom,
                BoundaryRule::Shallower => depth <= bottom,
            };
            if inside {
                return Ok(layer);
            }
        }
        Ok(last)
    }

    /// Value of `property` at `depth`, with interfaces belonging to the deeper layer.
    pub fn value_at(&self, depth: f64, property: Property) -> Result<f64, StrataError> {
        self.value_at_with(depth, property, BoundaryRule::Deeper)
    }

    /// Value of `property` at `depth` under an explicit boundary rule.
    pub fn value_at_with(
        &self,
        depth: f64,
        property: Property,
        rule: BoundaryRule,
    ) -> Result<f64, StrataError> {
        let layer = self.layer_index_at(depth, rule)?;
        Ok(self.layer_value(layer, property))
    }

    /// Time-averaged shear-wave velocity over the top `depth` metres.
    pub fn time_averaged_vs(&self, depth: f64) -> Result<f64, StrataError> {
        if !(depth.is_finite() && depth > 0.0) {
            return Err(StrataError::Model(
                ErrorInfo::new("non-positive-depth", "averaging depth must be positive")
                    .with_context("depth", depth),
            ));
        }
        Ok(self.average_vs_unchecked(depth))
    }

    /// Time-averaged shear-wave velocity over the top 30 m.
    pub fn vs30(&self) -> f64 {
        self.average_vs_unchecked(VS30_DEPTH)
    }

    fn average_vs_unchecked(&self, depth: f64) -> f64 {
        let last = self.layer_count() - 1;
        let mut top = 0.0;
        let mut travel_time = 0.0;
        for layer in 0..=last {
            if top >= depth {
                break;
            }
            let bottom = if layer == last {
                depth
            } else {
                (top + self.thickness[layer]).min(depth)
            };
            travel_time += (bottom - top) / self.vs[layer];
            top = bottom;
        }
        depth / travel_time
    }

    /// Merges adjacent layers whose vp, vs and density agree within tolerance.
    ///
    /// A layer merged into the half-space becomes part of the half-space.
    pub fn simplify(&self) -> LayeredModel {
        let last = self.layer_count() - 1;
        let mut out = LayeredModel {
            thickness: vec![self.thickness[0]],
            vp: vec![self.vp[0]],
            vs: vec![self.vs[0]],
            density: vec![self.density[0]],
        };
        for layer in 1..=last {
            let tail = out.layer_count() - 1;
            let same = approx_eq(out.vp[tail], self.vp[layer])
                && approx_eq(out.vs[tail], self.vs[layer])
                && approx_eq(out.density[tail], self.density[layer]);
            if same {
                if layer == last {
                    out.thickness[tail] = self.thickness[layer];
                } else {
                    out.thickness[tail] += self.thickness[layer];
                }
            } else {
                out.thickness.push(self.thickness[layer]);
                out.vp.push(self.vp[layer]);
                out.vs.push(self.vs[layer]);
                out.density.push(self.density[layer]);
            }
        }
        out
    }

    /// Stair-step representation of `property`, drawing the half-space down to
    /// `dmax` (or to its own top when that lies deeper).
    pub fn profile(&self, property: Property, dmax: f64) -> Result<Profile, StrataError> {
        if !(dmax.is_finite() && dmax > 0.0) {
            return Err(StrataError::Grid(
                ErrorInfo::new("non-positive-dmax", "profile depth must be positive")
                    .with_context("dmax", dmax),
            ));
        }
        let last = self.layer_count() - 1;
        let mut depth = Vec::with_capacity(2 * self.layer_count());
        let mut value = Vec::with_capacity(2 * self.layer_count());
        let mut top = 0.0;
        for layer in 0..=last {
            let bottom = if layer == last {
                dmax.max(top)
            } else {
                top + self.thickness[layer]
            };
            let v = self.layer_value(layer, property);
            depth.extend([top, bottom]);
            value.extend([v, v]);
            top = bottom;
        }
        Ok(Profile { depth, value })
    }
}

/// Poisson's ratio from compression- and shear-wave velocity.
pub fn poissons_ratio(vp: f64, vs: f64) -> f64 {
    let vp2 = vp * vp;
    let vs2 = vs * vs;
    (vp2 - 2.0 * vs2) / (2.0 * (vp2 - vs2))
}

impl PartialEq for LayeredModel {
    fn eq(&self, other: &Self) -> bool {
        slices_approx_eq(&self.thickness, &other.thickness)
            && slices_approx_eq(&self.vp, &other.vp)
            && slices_approx_eq(&self.vs, &other.vs)
            && slices_approx_eq(&self.density, &other.density)
    }
}
