//! Layered-model text reports.
//!
//! Each model in a report is a header line followed by a text block (see
//! [`strata_core::text`]):
//!
//! ```text
//! # Layered model 149698: value=0.766485
//! 2
//! 5.000000 300.000000 150.000000 2000.000000
//! 0.000000 800.000000 400.000000 2000.000000
//! ```
//!
//! Blank lines and other `#` lines between models are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use strata_core::text::{parse_layer_count, parse_layer_row};
use strata_core::{ErrorInfo, LayeredModel, StrataError};
use tracing::debug;

use crate::ensemble::ModelEnsemble;

const HEADER_PREFIX: &str = "# Layered model";

fn io_error(code: &str, err: impl ToString) -> StrataError {
    StrataError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn at_line(err: StrataError, line: usize) -> StrataError {
    match err {
        StrataError::Parse(info) => StrataError::Parse(info.with_context("line", line)),
        StrataError::Model(info) => StrataError::Model(info.with_context("line", line)),
        other => other,
    }
}

/// One model read from a report, with its label and misfit.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedModel {
    /// The layered model.
    pub model: LayeredModel,
    /// Label assigned by the producing tool.
    pub id: String,
    /// Misfit assigned by the producing tool.
    pub misfit: f64,
}

/// Source of `(model, id, misfit)` entries in source order.
pub trait ModelParser {
    /// Reads at most `limit` entries from `source`.
    fn parse(
        &self,
        source: &mut dyn BufRead,
        limit: Option<usize>,
    ) -> Result<Vec<ParsedModel>, StrataError>;
}

/// Parser for the layered-model report grammar written by [`write_report`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LayeredReportParser;

fn parse_header(line: &str) -> Result<Option<(String, f64)>, StrataError> {
    let Some(rest) = line.strip_prefix(HEADER_PREFIX) else {
        return Ok(None);
    };
    let (id, value) = rest.rsplit_once(':').ok_or_else(|| {
        StrataError::Parse(ErrorInfo::new(
            "bad-header",
            format!("missing `:` in `{line}`"),
        ))
    })?;
    let misfit = value
        .trim()
        .strip_prefix("value=")
        .ok_or_else(|| {
            StrataError::Parse(ErrorInfo::new(
                "bad-header",
                format!("missing `value=` in `{line}`"),
            ))
        })?
        .trim()
        .parse::<f64>()
        .map_err(|err| StrataError::Parse(ErrorInfo::new("bad-misfit", err.to_string())))?;
    Ok(Some((id.trim().to_string(), misfit)))
}

struct PendingModel {
    id: String,
    misfit: f64,
    layers: Option<usize>,
    rows: Vec<[f64; 4]>,
    header_line: usize,
}

impl ModelParser for LayeredReportParser {
    fn parse(
        &self,
        source: &mut dyn BufRead,
        limit: Option<usize>,
    ) -> Result<Vec<ParsedModel>, StrataError> {
        let mut parsed = Vec::new();
        let mut pending: Option<PendingModel> = None;
        let mut line_no = 0;
        let mut buffer = String::new();
        loop {
            if limit.is_some_and(|limit| parsed.len() >= limit) {
                break;
            }
            buffer.clear();
            let read = source
                .read_line(&mut buffer)
                .map_err(|err| io_error("report-read", err))?;
            if read == 0 {
                break;
            }
            line_no += 1;
            let line = buffer.trim();
            if line.is_empty() {
                continue;
            }
            match pending.as_mut() {
                None => {
                    if let Some((id, misfit)) = parse_header(line).map_err(|e| at_line(e, line_no))? {
                        pending = Some(PendingModel {
                            id,
                            misfit,
                            layers: None,
                            rows: Vec::new(),
                            header_line: line_no,
                        });
                    } else if !line.starts_with('#') {
                        return Err(StrataError::Parse(
                            ErrorInfo::new(
                                "unexpected-line",
                                format!("`{line}` appears outside a model"),
                            )
                            .with_context("line", line_no),
                        ));
                    }
                }
                Some(current) => {
                    if current.layers.is_none() {
                        current.layers =
                            Some(parse_layer_count(line).map_err(|e| at_line(e, line_no))?);
                    } else {
                        current
                            .rows
                            .push(parse_layer_row(line).map_err(|e| at_line(e, line_no))?);
                    }
                    if current.layers == Some(current.rows.len()) {
                        if let Some(done) = pending.take() {
                            let model = LayeredModel::from_rows(&done.rows)
                                .map_err(|e| at_line(e, done.header_line))?;
                            parsed.push(ParsedModel {
                                model,
                                id: done.id,
                                misfit: done.misfit,
                            });
                        }
                    }
                }
            }
        }
        if let Some(model) = pending {
            return Err(StrataError::Parse(
                ErrorInfo::new(
                    "truncated-model",
                    format!("model `{}` ends before all layers were read", model.id),
                )
                .with_context("line", model.header_line),
            ));
        }
        debug!(models = parsed.len(), lines = line_no, "parsed layered-model report");
        Ok(parsed)
    }
}

fn check_writable_id(index: usize, id: &str) -> Result<(), StrataError> {
    if id.contains(['\n', '\r']) || id.trim() != id {
        return Err(StrataError::Serde(
            ErrorInfo::new(
                "unwritable-id",
                format!("id {id:?} cannot be written on a header line"),
            )
            .with_context("index", index)
            .with_hint("ids must not contain line breaks or surrounding whitespace"),
        ));
    }
    Ok(())
}

/// Writes every entry of `ensemble` in the layered-model report grammar.
///
/// Ids are checked before anything is written: an id with a line break or
/// leading/trailing whitespace would not read back unchanged.
pub fn write_report<W: Write>(ensemble: &ModelEnsemble, writer: &mut W) -> Result<(), StrataError> {
    for (index, id) in ensemble.ids().iter().enumerate() {
        check_writable_id(index, id)?;
    }
    for ((model, id), misfit) in ensemble
        .models()
        .iter()
        .zip(ensemble.ids())
        .zip(ensemble.misfits())
    {
        write!(
            writer,
            "{HEADER_PREFIX} {id}: value={misfit}\n{}",
            model.to_text_block()
        )
        .map_err(|err| io_error("report-write", err))?;
    }
    Ok(())
}

impl ModelEnsemble {
    /// Builds an ensemble from a parser, keeping the first `nmodels` entries when given.
    pub fn from_parser<P: ModelParser + ?Sized>(
        parser: &P,
        source: &mut dyn BufRead,
        nmodels: Option<usize>,
    ) -> Result<Self, StrataError> {
        if nmodels == Some(0) {
            return Err(StrataError::Ensemble(ErrorInfo::new(
                "non-positive-nmodels",
                "nmodels must be at least 1",
            )));
        }
        let parsed = parser.parse(source, nmodels)?;
        if let Some(requested) = nmodels {
            if parsed.len() < requested {
                return Err(StrataError::Ensemble(
                    ErrorInfo::new(
                        "nmodels-exceeds-available",
                        format!("requested {requested} models, source holds {}", parsed.len()),
                    )
                    .with_context("nmodels", requested)
                    .with_context("available", parsed.len()),
                ));
            }
        }
        let mut models = Vec::with_capacity(parsed.len());
        let mut ids = Vec::with_capacity(parsed.len());
        let mut misfits = Vec::with_capacity(parsed.len());
        for entry in parsed {
            models.push(entry.model);
            ids.push(entry.id);
            misfits.push(entry.misfit);
        }
        Self::from_parts(models, ids, misfits)
    }

    /// Parses a layered-model report held in memory.
    pub fn from_report_str(text: &str, nmodels: Option<usize>) -> Result<Self, StrataError> {
        Self::from_parser(&LayeredReportParser, &mut text.as_bytes(), nmodels)
    }

    /// Opens and parses a layered-model report file.
    pub fn from_path(path: &Path, nmodels: Option<usize>) -> Result<Self, StrataError> {
        let file = File::open(path).map_err(|err| {
            io_error("report-open", format!("failed to open {}: {err}", path.display()))
        })?;
        Self::from_parser(&LayeredReportParser, &mut BufReader::new(file), nmodels)
    }

    /// Renders the ensemble in the layered-model report grammar.
    pub fn to_report_string(&self) -> Result<String, StrataError> {
        let mut bytes = Vec::new();
        write_report(self, &mut bytes)?;
        String::from_utf8(bytes).map_err(|err| io_error("report-write", err))
    }

    /// Writes the ensemble to `path` in the layered-model report grammar.
    pub fn write_path(&self, path: &Path) -> Result<(), StrataError> {
        let file = File::create(path).map_err(|err| {
            io_error("report-create", format!("failed to create {}: {err}", path.display()))
        })?;
        let mut writer = BufWriter::new(file);
        write_report(self, &mut writer)?;
        writer.flush().map_err(|err| io_error("report-write", err))
    }
}
