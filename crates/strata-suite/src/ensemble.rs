//! Ordered ensembles of layered models with index-aligned ids and misfits.

use std::fmt;
use std::ops::{Bound, Index, RangeBounds};

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use strata_core::{ErrorInfo, LayeredModel, StrataError};
use tracing::debug;

use crate::selection::{select_indices, Selection};

fn ensemble_error(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Ensemble(ErrorInfo::new(code, message.into()))
}

/// Arrival-ordered collection of layered models, each paired with an
/// identifier and a misfit (lower is better).
///
/// The three sequences always have the same, non-zero length. Growth only
/// happens through [`ModelEnsemble::append`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnsembleRecord")]
pub struct ModelEnsemble {
    models: Vec<LayeredModel>,
    ids: Vec<String>,
    misfits: Vec<f64>,
}

#[derive(Deserialize)]
struct EnsembleRecord {
    models: Vec<LayeredModel>,
    ids: Vec<String>,
    misfits: Vec<f64>,
}

impl TryFrom<EnsembleRecord> for ModelEnsemble {
    type Error = StrataError;

    fn try_from(record: EnsembleRecord) -> Result<Self, Self::Error> {
        ModelEnsemble::from_parts(record.models, record.ids, record.misfits)
    }
}

impl ModelEnsemble {
    /// Starts an ensemble from a single entry.
    pub fn new(model: LayeredModel, id: impl Into<String>, misfit: f64) -> Self {
        Self {
            models: vec![model],
            ids: vec![id.into()],
            misfits: vec![misfit],
        }
    }

    /// Builds an ensemble from parallel sequences, validating their lengths.
    pub fn from_parts(
        models: Vec<LayeredModel>,
        ids: Vec<String>,
        misfits: Vec<f64>,
    ) -> Result<Self, StrataError> {
        if models.is_empty() {
            return Err(ensemble_error("empty-ensemble", "an ensemble needs at least one model"));
        }
        if ids.len() != models.len() || misfits.len() != models.len() {
            return Err(StrataError::Ensemble(
                ErrorInfo::new(
                    "length-mismatch",
                    "models, ids and misfits must have the same length",
                )
                .with_context("models", models.len())
                .with_context("ids", ids.len())
                .with_context("misfits", misfits.len()),
            ));
        }
        Ok(Self {
            models,
            ids,
            misfits,
        })
    }

    /// Builds one model per column of four `layers x models` tables.
    ///
    /// Models are created in column order and paired with `ids[col]` and
    /// `misfits[col]`. Nothing is built unless every column is valid.
    pub fn from_array<S: AsRef<str>>(
        thickness: ArrayView2<'_, f64>,
        vp: ArrayView2<'_, f64>,
        vs: ArrayView2<'_, f64>,
        density: ArrayView2<'_, f64>,
        ids: &[S],
        misfits: &[f64],
    ) -> Result<Self, StrataError> {
        let shape = thickness.dim();
        for (name, dim) in [("vp", vp.dim()), ("vs", vs.dim()), ("density", density.dim())] {
            if dim != shape {
                return Err(StrataError::Ensemble(
                    ErrorInfo::new(
                        "table-shape-mismatch",
                        format!("{name} table is {dim:?}, thickness table is {shape:?}"),
                    )
                    .with_context("table", name),
                ));
            }
        }
        let (layers, columns) = shape;
        if layers == 0 || columns == 0 {
            return Err(StrataError::Ensemble(
                ErrorInfo::new("table-shape-mismatch", "tables must be non-empty")
                    .with_context("layers", layers)
                    .with_context("models", columns),
            ));
        }
        if ids.len() != columns || misfits.len() != columns {
            return Err(StrataError::Ensemble(
                ErrorInfo::new(
                    "table-shape-mismatch",
                    format!("tables hold {columns} models but ids/misfits do not match"),
                )
                .with_context("ids", ids.len())
                .with_context("misfits", misfits.len()),
            ));
        }
        let models = (0..columns)
            .map(|col| {
                LayeredModel::new(
                    thickness.column(col).to_vec(),
                    vp.column(col).to_vec(),
                    vs.column(col).to_vec(),
                    density.column(col).to_vec(),
                )
                .map_err(|err| match err {
                    StrataError::Model(info) => StrataError::Model(info.with_context("column", col)),
                    other => other,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(models = columns, layers, "built ensemble from array tables");
        Self::from_parts(
            models,
            ids.iter().map(|id| id.as_ref().to_string()).collect(),
            misfits.to_vec(),
        )
    }

    /// Appends an entry to all three sequences.
    pub fn append(&mut self, model: LayeredModel, id: impl Into<String>, misfit: f64) {
        self.models.push(model);
        self.ids.push(id.into());
        self.misfits.push(misfit);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Always false: ensembles hold at least one entry.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models in arrival order.
    pub fn models(&self) -> &[LayeredModel] {
        &self.models
    }

    /// Identifiers aligned with [`ModelEnsemble::models`].
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Misfits aligned with [`ModelEnsemble::models`].
    pub fn misfits(&self) -> &[f64] {
        &self.misfits
    }

    /// Model at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&LayeredModel> {
        self.models.get(index)
    }

    /// Iterates over the models in arrival order.
    pub fn iter(&self) -> std::slice::Iter<'_, LayeredModel> {
        self.models.iter()
    }

    /// New ensemble holding the entries in `range`, all three sequences sliced together.
    pub fn slice<R: RangeBounds<usize>>(&self, range: R) -> Result<ModelEnsemble, StrataError> {
        let start = match range.start_bound() {
            Bound::Included(&start) => Some(start),
            Bound::Excluded(&start) => start.checked_add(1),
            Bound::Unbounded => Some(0),
        };
        let end = match range.end_bound() {
            Bound::Included(&end) => end.checked_add(1),
            Bound::Excluded(&end) => Some(end),
            Bound::Unbounded => Some(self.len()),
        };
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) if start <= end && end <= self.len() => (start, end),
            _ => {
                return Err(StrataError::Ensemble(
                    ErrorInfo::new(
                        "slice-out-of-range",
                        format!("range lies outside an ensemble of {} models", self.len()),
                    )
                    .with_context("models", self.len()),
                ));
            }
        };
        if start == end {
            return Err(ensemble_error("empty-slice", "a slice must keep at least one model"));
        }
        Ok(Self {
            models: self.models[start..end].to_vec(),
            ids: self.ids[start..end].to_vec(),
            misfits: self.misfits[start..end].to_vec(),
        })
    }

    /// Index of the lowest misfit, the earliest one on ties.
    pub fn best(&self) -> usize {
        let mut best = 0;
        for (index, misfit) in self.misfits.iter().enumerate().skip(1) {
            if misfit.total_cmp(&self.misfits[best]).is_lt() {
                best = index;
            }
        }
        best
    }

    /// Indices picked by `selection`, see [`Selection`] for the ordering.
    pub fn select(&self, selection: Selection) -> Result<Vec<usize>, StrataError> {
        select_indices(&self.misfits, selection)
    }

    /// Models picked by `selection`, in selection order.
    pub fn selected(&self, selection: Selection) -> Result<Vec<&LayeredModel>, StrataError> {
        Ok(self
            .select(selection)?
            .into_iter()
            .map(|index| &self.models[index])
            .collect())
    }
}

impl Index<usize> for ModelEnsemble {
    type Output = LayeredModel;

    fn index(&self, index: usize) -> &Self::Output {
        &self.models[index]
    }
}

impl<'a> IntoIterator for &'a ModelEnsemble {
    type Item = &'a LayeredModel;
    type IntoIter = std::slice::Iter<'a, LayeredModel>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl fmt::Display for ModelEnsemble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelEnsemble with {} LayeredModels.", self.len())
    }
}
