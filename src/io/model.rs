//! Read/write fitted model JSON files.
//!
//! Model JSON is the portable representation of a baseline: target,
//! intercept, ordered coefficients, fit timestamp and metrics. Undefined
//! metrics are stored as `null`.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::domain::FittedModel;
use crate::error::{BaselineError, Result};

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &FittedModel) -> Result<()> {
    let file = File::create(path).map_err(|e| {
        BaselineError::Io(format!("failed to create model JSON '{}': {e}", path.display()))
    })?;
    let mut out = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut out, model)
        .map_err(|e| BaselineError::Io(format!("failed to write model JSON: {e}")))?;
    out.flush()
        .map_err(|e| BaselineError::Io(format!("failed to flush model JSON: {e}")))?;

    info!(path = %path.display(), "model saved");
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<FittedModel> {
    let file = File::open(path).map_err(|e| {
        BaselineError::Io(format!("failed to open model JSON '{}': {e}", path.display()))
    })?;
    let model: FittedModel = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| BaselineError::Parse(format!("invalid model JSON: {e}")))?;
    Ok(model)
}
