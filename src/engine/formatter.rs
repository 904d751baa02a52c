//! Rendering merged station rows
//!
//! The text form is a single line:
//! `{Berlin=-3.2/-3.2/-3.2, Hamburg=8.5/10.3/12.0}\n`, stations in ascending
//! byte order, every value with exactly one fractional digit. Min and max are
//! exact tenths already; the mean is rounded half-up toward positive infinity
//! in integer arithmetic (`10.25` -> `10.3`, `-10.25` -> `-10.2`).

use crate::error::Result;
use crate::models::StationSummary;
use serde::Serialize;
use std::io::Write;

/// Output representations supported by [`write_summary`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// `{name=min/mean/max, ...}`
    #[default]
    Text,
    /// A JSON array of `{name, min, mean, max, count}` objects
    Json,
}

/// Format a tenths value with one fractional digit, never producing `-0.0`
pub fn format_tenths(tenths: i64) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let magnitude = tenths.unsigned_abs();
    format!("{}{}.{}", sign, magnitude / 10, magnitude % 10)
}

/// Render stations as the single-line text summary, including the newline
pub fn format_summary(stations: &[StationSummary]) -> String {
    let mut out = String::with_capacity(stations.len() * 32 + 3);
    out.push('{');

    for (index, station) in stations.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&station.name);
        out.push('=');
        out.push_str(&format_tenths(station.min_tenths()));
        out.push('/');
        out.push_str(&format_tenths(station.mean_tenths()));
        out.push('/');
        out.push_str(&format_tenths(station.max_tenths()));
    }

    out.push_str("}\n");
    out
}

#[derive(Serialize)]
struct JsonRow<'a> {
    name: &'a str,
    min: f64,
    mean: f64,
    max: f64,
    count: u64,
}

/// Render stations as pretty-printed JSON with the same rounding as the text form
pub fn format_summary_json(stations: &[StationSummary]) -> Result<String> {
    let rows: Vec<JsonRow<'_>> = stations
        .iter()
        .map(|station| JsonRow {
            name: &station.name,
            min: station.min_tenths() as f64 / 10.0,
            mean: station.mean_tenths() as f64 / 10.0,
            max: station.max_tenths() as f64 / 10.0,
            count: station.count(),
        })
        .collect();

    let mut json = serde_json::to_string_pretty(&rows)?;
    json.push('\n');
    Ok(json)
}

/// Write the rendered summary to `sink`
pub fn write_summary<W: Write>(
    sink: &mut W,
    stations: &[StationSummary],
    format: OutputFormat,
) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => format_summary(stations),
        OutputFormat::Json => format_summary_json(stations)?,
    };
    sink.write_all(rendered.as_bytes())?;
    sink.flush()?;
    Ok(())
}
