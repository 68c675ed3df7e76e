#![deny(missing_docs)]
#![doc = "Misfit-ranked ensembles of layered earth models, bulk construction and the layered-model report format."]

mod ensemble;
pub mod report;
mod selection;
pub mod serde;

pub use ensemble::ModelEnsemble;
pub use report::{write_report, LayeredReportParser, ModelParser, ParsedModel};
pub use selection::{select_indices, Selection};
pub use self::serde::{from_json_str, to_json_string};
