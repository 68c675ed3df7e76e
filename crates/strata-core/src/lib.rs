#![deny(missing_docs)]
#![doc = "Layered earth models, property selectors and the shared error surface for strata."]

pub mod errors;
mod model;
pub mod property;
pub mod text;
pub mod tolerance;

pub use errors::{ErrorInfo, StrataError};
pub use model::{poissons_ratio, LayeredModel, Profile, VS30_DEPTH};
pub use property::{BoundaryRule, Property};
