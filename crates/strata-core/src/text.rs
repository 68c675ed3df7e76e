//! Fixed-precision text block for a single layered model.
//!
//! A block is the layer count on its own line followed by one
//! `thickness vp vs density` row per layer. Values are written with
//! [`TEXT_PRECISION`] decimals; magnitudes below [`FIXED_POINT_MIN`] switch to
//! scientific notation so a positive value never reads back as zero.

use std::fmt::Write as _;

use crate::errors::{ErrorInfo, StrataError};
use crate::model::LayeredModel;

/// Number of decimals written for every value.
pub const TEXT_PRECISION: usize = 6;

/// Smallest non-zero magnitude written in fixed-point notation.
pub const FIXED_POINT_MIN: f64 = 1e-3;

fn write_value(out: &mut String, value: f64) {
    if value == 0.0 || value.abs() >= FIXED_POINT_MIN {
        let _ = write!(out, "{value:.p$}", p = TEXT_PRECISION);
    } else {
        let _ = write!(out, "{value:.p$e}", p = TEXT_PRECISION);
    }
}

fn parse_error(code: &str, message: impl Into<String>) -> StrataError {
    StrataError::Parse(ErrorInfo::new(code, message.into()))
}

/// Parses a `thickness vp vs density` row.
pub fn parse_layer_row(line: &str) -> Result<[f64; 4], StrataError> {
    let mut row = [0.0; 4];
    let mut fields = line.split_whitespace();
    for slot in row.iter_mut() {
        let field = fields
            .next()
            .ok_or_else(|| parse_error("short-layer-row", format!("expected 4 values in `{line}`")))?;
        *slot = field.parse::<f64>().map_err(|err| {
            parse_error("bad-number", format!("`{field}` is not a number: {err}"))
        })?;
    }
    if fields.next().is_some() {
        return Err(parse_error(
            "long-layer-row",
            format!("expected 4 values in `{line}`"),
        ));
    }
    Ok(row)
}

/// Parses a layer-count line.
pub fn parse_layer_count(line: &str) -> Result<usize, StrataError> {
    let count = line
        .trim()
        .parse::<usize>()
        .map_err(|err| parse_error("bad-layer-count", format!("`{}`: {err}", line.trim())))?;
    if count == 0 {
        return Err(parse_error("bad-layer-count", "layer count must be positive"));
    }
    Ok(count)
}

impl LayeredModel {
    /// Builds a model from `thickness vp vs density` rows.
    pub fn from_rows(rows: &[[f64; 4]]) -> Result<Self, StrataError> {
        let column = |idx: usize| rows.iter().map(|row| row[idx]).collect::<Vec<_>>();
        LayeredModel::new(column(0), column(1), column(2), column(3))
    }

    /// Renders the model as a text block terminated by a newline.
    pub fn to_text_block(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.layer_count());
        for layer in 0..self.layer_count() {
            let row = [
                self.thickness()[layer],
                self.vp()[layer],
                self.vs()[layer],
                self.density()[layer],
            ];
            for (idx, value) in row.into_iter().enumerate() {
                if idx > 0 {
                    out.push(' ');
                }
                write_value(&mut out, value);
            }
            out.push('\n');
        }
        out
    }

    /// Parses a block produced by [`LayeredModel::to_text_block`].
    pub fn from_text_block(block: &str) -> Result<Self, StrataError> {
        let mut lines = block.lines().map(str::trim).filter(|line| !line.is_empty());
        let header = lines
            .next()
            .ok_or_else(|| parse_error("empty-block", "text block is empty"))?;
        let count = parse_layer_count(header)?;
        let rows = lines.map(parse_layer_row).collect::<Result<Vec<_>, _>>()?;
        if rows.len() != count {
            return Err(StrataError::Parse(
                ErrorInfo::new(
                    "layer-count-mismatch",
                    format!("header announces {count} layers, found {}", rows.len()),
                )
                .with_context("expected", count)
                .with_context("found", rows.len()),
            ));
        }
        LayeredModel::from_rows(&rows)
    }
}
