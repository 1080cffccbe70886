//! On-disk persistence of comparison results.
//!
//! For each (method, identifier) with a non-empty diff list, the reporter
//! writes four artifacts under `<output_dir>/<method>/<identifier>/`: the
//! original request, each endpoint's raw response, a machine-readable
//! summary, and a human-readable rendering. Nothing is written when the
//! responses agree.

use super::compute::{DiffComputer, DiffType, Difference};
use crate::utils::error::OutputError;
use chrono::Utc;
use log::{debug, info};
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Persists diff results under an output directory
pub struct DiffReporter {
    output_dir: PathBuf,
    endpoint1_name: String,
    endpoint2_name: String,
    computer: DiffComputer,
}

impl DiffReporter {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        endpoint1_name: impl Into<String>,
        endpoint2_name: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            endpoint1_name: endpoint1_name.into(),
            endpoint2_name: endpoint2_name.into(),
            computer: DiffComputer::new(),
        }
    }

    /// Compare two responses and persist the result if they diverge
    ///
    /// Returns the computed differences either way. Artifacts are written
    /// only when the list is non-empty:
    /// `request.json`, `endpoint1_response.json`, `endpoint2_response.json`,
    /// `diff.json`, `diff.txt`.
    pub fn save_diff(
        &self,
        method: &str,
        identifier: &str,
        request: &Value,
        response1: &Value,
        response2: &Value,
    ) -> Result<Vec<Difference>, OutputError> {
        let diffs = self.computer.compute(response1, response2);
        if diffs.is_empty() {
            debug!("{}/{}: responses match", method, identifier);
            return Ok(diffs);
        }

        let dir = self.output_dir.join(method).join(identifier);
        fs::create_dir_all(&dir).map_err(OutputError::WriteFailed)?;

        write_json(&dir.join("request.json"), request)?;
        write_json(&dir.join("endpoint1_response.json"), response1)?;
        write_json(&dir.join("endpoint2_response.json"), response2)?;

        let summary = serde_json::json!({
            "method": method,
            "identifier": identifier,
            "endpoint1": self.endpoint1_name,
            "endpoint2": self.endpoint2_name,
            "generated_at": Utc::now().to_rfc3339(),
            "difference_count": diffs.len(),
            "diffs": diffs.iter().map(|d| self.diff_to_dict(d)).collect::<Vec<_>>(),
        });
        write_json(&dir.join("diff.json"), &summary)?;

        fs::write(dir.join("diff.txt"), self.format_text(&diffs))
            .map_err(OutputError::WriteFailed)?;

        info!(
            "{}/{}: {} difference(s) written to {}",
            method,
            identifier,
            diffs.len(),
            dir.display()
        );

        Ok(diffs)
    }

    /// One difference as a flat JSON object for `diff.json`
    ///
    /// Value keys are omitted when the corresponding value is absent; extra
    /// metadata entries are flattened in.
    pub fn diff_to_dict(&self, diff: &Difference) -> Value {
        let mut map = Map::new();
        map.insert("path".to_string(), diff.path.clone().into());
        map.insert("type".to_string(), diff.diff_type.to_string().into());
        if let Some(value1) = &diff.value1 {
            map.insert("ep1_value".to_string(), value1.clone());
        }
        if let Some(value2) = &diff.value2 {
            map.insert("ep2_value".to_string(), value2.clone());
        }
        for (key, value) in &diff.extra {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }

    /// Human-readable rendering of a diff list
    pub fn format_text(&self, diffs: &[Difference]) -> String {
        if diffs.is_empty() {
            return "No differences found.".to_string();
        }

        let mut out = format!(
            "Found {} difference(s) between {} and {}\n",
            diffs.len(),
            self.endpoint1_name,
            self.endpoint2_name
        );

        for diff in diffs {
            out.push_str(&format!("\n[{}] {}\n", diff.diff_type, diff.path));
            let (side1, side2) = self.render_sides(diff);
            out.push_str(&format!("  {}: {}\n", self.endpoint1_name, side1));
            out.push_str(&format!("  {}: {}\n", self.endpoint2_name, side2));
        }

        out
    }

    fn render_sides(&self, diff: &Difference) -> (String, String) {
        match diff.diff_type {
            DiffType::LengthMismatch => (
                format!("{} elements", render_extra(&diff.extra, "length1")),
                format!("{} elements", render_extra(&diff.extra, "length2")),
            ),
            DiffType::MissingInEndpoint2 => {
                (render_value(diff.value1.as_ref()), "(not present)".to_string())
            }
            DiffType::AddedInEndpoint2 => {
                ("(not present)".to_string(), render_value(diff.value2.as_ref()))
            }
            DiffType::TypeMismatch => (
                format!(
                    "{} ({})",
                    render_value(diff.value1.as_ref()),
                    render_extra(&diff.extra, "type1")
                ),
                format!(
                    "{} ({})",
                    render_value(diff.value2.as_ref()),
                    render_extra(&diff.extra, "type2")
                ),
            ),
            _ => (
                render_value(diff.value1.as_ref()),
                render_value(diff.value2.as_ref()),
            ),
        }
    }
}

/// Render a value for the text report; strings print unquoted
fn render_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "(none)".to_string(),
    }
}

fn render_extra(extra: &Map<String, Value>, key: &str) -> String {
    extra.get(key).map(render_value_ref).unwrap_or_default()
}

fn render_value_ref(value: &Value) -> String {
    render_value(Some(value))
}

/// Write pretty-printed JSON to a file
fn write_json(path: &Path, value: &Value) -> Result<(), OutputError> {
    let file = File::create(path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;
    Ok(())
}
