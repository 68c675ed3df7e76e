//! Physical property selectors and depth boundary conventions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, StrataError};

/// Physical property carried (or derived) per layer of a [`crate::LayeredModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Compression-wave velocity.
    Vp,
    /// Shear-wave velocity.
    Vs,
    /// Mass density.
    Density,
    /// Poisson's ratio derived from `vp` and `vs`.
    PoissonsRatio,
}

impl Property {
    /// Properties stored directly on every layer.
    pub const STORED: [Property; 3] = [Property::Vp, Property::Vs, Property::Density];

    /// Short label used in reports and configuration files.
    pub fn label(&self) -> &'static str {
        match self {
            Property::Vp => "vp",
            Property::Vs => "vs",
            Property::Density => "density",
            Property::PoissonsRatio => "pr",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Property {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vp" => Ok(Property::Vp),
            "vs" => Ok(Property::Vs),
            "rho" | "density" => Ok(Property::Density),
            "pr" | "poissons_ratio" => Ok(Property::PoissonsRatio),
            other => Err(StrataError::Model(
                ErrorInfo::new("unknown-property", format!("unknown property `{other}`"))
                    .with_hint("expected one of vp, vs, density, pr"),
            )),
        }
    }
}

/// Which layer a depth lying exactly on an interface resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryRule {
    /// Interfaces belong to the layer below them.
    #[default]
    Deeper,
    /// Interfaces belong to the layer above them.
    Shallower,
}
