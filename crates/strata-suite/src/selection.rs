//! Misfit-ranked subset selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_core::{ErrorInfo, StrataError};

/// Which entries of an ensemble feed a statistic.
///
/// `All` keeps arrival order; `Best(n)` returns the `n` lowest misfits in
/// ascending order, ties resolved by arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "SelectionRepr", into = "SelectionRepr")]
pub enum Selection {
    /// Every entry, in arrival order.
    #[default]
    All,
    /// The given number of lowest-misfit entries.
    Best(usize),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SelectionRepr {
    Count(usize),
    Keyword(String),
}

impl TryFrom<SelectionRepr> for Selection {
    type Error = StrataError;

    fn try_from(repr: SelectionRepr) -> Result<Self, Self::Error> {
        match repr {
            SelectionRepr::Count(count) => Ok(Selection::Best(count)),
            SelectionRepr::Keyword(keyword) => keyword.parse(),
        }
    }
}

impl From<Selection> for SelectionRepr {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => SelectionRepr::Keyword("all".to_string()),
            Selection::Best(count) => SelectionRepr::Count(count),
        }
    }
}

impl From<usize> for Selection {
    fn from(count: usize) -> Self {
        Selection::Best(count)
    }
}

impl FromStr for Selection {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(Selection::All);
        }
        trimmed.parse::<usize>().map(Selection::Best).map_err(|_| {
            StrataError::Ensemble(
                ErrorInfo::new("bad-selection", format!("`{trimmed}` is not a selection"))
                    .with_hint("use `all` or a positive model count"),
            )
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Best(count) => write!(f, "{count}"),
        }
    }
}

/// Resolves `selection` against `misfits` into entry indices.
pub fn select_indices(misfits: &[f64], selection: Selection) -> Result<Vec<usize>, StrataError> {
    match selection {
        Selection::All => Ok((0..misfits.len()).collect()),
        Selection::Best(0) => Err(StrataError::Ensemble(
            ErrorInfo::new("non-positive-nbest", "nbest must be at least 1")
                .with_hint("use Selection::All to keep every model"),
        )),
        Selection::Best(count) if count > misfits.len() => Err(StrataError::Ensemble(
            ErrorInfo::new(
                "nbest-exceeds-ensemble",
                format!("nbest {count} exceeds the {} models available", misfits.len()),
            )
            .with_context("nbest", count)
            .with_context("models", misfits.len()),
        )),
        Selection::Best(count) => {
            let mut order: Vec<usize> = (0..misfits.len()).collect();
            order.sort_by(|&a, &b| misfits[a].total_cmp(&misfits[b]));
            order.truncate(count);
            Ok(order)
        }
    }
}
