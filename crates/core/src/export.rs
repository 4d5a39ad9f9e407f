//! Sample export as CSV or JSON

use crate::core_types::NutrientFraction;
use crate::sample::SoilSample;
use std::io::{self, Write};
use thiserror::Error;

/// Errors from writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing to the sink failed
    #[error("export write failed: {0}")]
    Io(#[from] io::Error),
    /// JSON serialization failed
    #[error("export serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

const CSV_HEADER: &str = "id,owner_id,municipality,location,longitude,latitude,\
temperature,ph,fertility,point_scale,nitrogen,phosphorus,potassium,created_at";

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn nutrient_cell(value: Option<NutrientFraction>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write samples as CSV: a header row, then one row per sample.
///
/// Missing nutrients are empty cells; timestamps are RFC 3339.
///
/// # Errors
/// Returns [`ExportError::Io`] if the writer fails.
pub fn export_csv<W: Write>(samples: &[SoilSample], mut out: W) -> Result<(), ExportError> {
    writeln!(out, "{CSV_HEADER}")?;
    for s in samples {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            s.id,
            csv_field(s.owner_id.as_str()),
            s.municipality.slug(),
            csv_field(&s.location),
            s.coordinates.lng,
            s.coordinates.lat,
            s.temperature.value(),
            *s.ph,
            *s.fertility,
            s.point_scale.value(),
            nutrient_cell(s.nitrogen),
            nutrient_cell(s.phosphorus),
            nutrient_cell(s.potassium),
            s.created_at.to_rfc3339(),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Write samples as a pretty-printed JSON array.
///
/// # Errors
/// Returns [`ExportError`] if serialization or the writer fails.
pub fn export_json<W: Write>(samples: &[SoilSample], mut out: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut out, samples)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}
