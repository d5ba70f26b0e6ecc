use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{bail, Context, Result};
use serde_json::Value as JsonValue;

use super::model::{Dataset, Metric, MetricValues, Record};
use crate::error::LoadError;

/// Remote copy of the study table, used when the primary source fails.
pub const FALLBACK_URL: &str =
    "https://raw.githubusercontent.com/alwolmer/streamlit_projeto/refs/heads/main/time_df.csv";

// ---------------------------------------------------------------------------
// Session load cache
// ---------------------------------------------------------------------------

/// Process-wide load cache keyed by source identity (the path or URL the
/// caller asked for). Populated on first load and never invalidated: the
/// source does not change within a session, and the cache lives until the
/// process exits.
fn cache() -> &'static Mutex<BTreeMap<String, Arc<Dataset>>> {
    static CACHE: OnceLock<Mutex<BTreeMap<String, Arc<Dataset>>>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(BTreeMap::new()))
}

/// Load the panel dataset for a session.
///
/// Repeated calls with the same `source` return the cached snapshot without
/// re-parsing. A primary source that cannot be read or fails schema
/// validation falls back to [`FALLBACK_URL`]; only when both fail does the
/// session fail to start.
pub fn load_session(source: &str) -> std::result::Result<Arc<Dataset>, LoadError> {
    let mut cache = cache().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(dataset) = cache.get(source) {
        log::debug!("dataset cache hit for '{source}'");
        return Ok(Arc::clone(dataset));
    }

    let dataset = match load_source(source) {
        Ok(dataset) => dataset,
        Err(primary_err) => {
            log::warn!("primary source '{source}' failed ({primary_err:#}), trying fallback");
            match load_remote_csv(FALLBACK_URL) {
                Ok(dataset) => dataset,
                Err(fallback_err) => {
                    return Err(LoadError {
                        primary: format!("{primary_err:#}"),
                        fallback: format!("{fallback_err:#}"),
                    });
                }
            }
        }
    };

    log::info!(
        "loaded {} records, {} groups, {} weeks from '{source}'",
        dataset.len(),
        dataset.groups.len(),
        dataset.weeks.len()
    );
    let dataset = Arc::new(dataset);
    cache.insert(source.to_string(), Arc::clone(&dataset));
    Ok(dataset)
}

/// Load one source: URLs fetch the remote table, anything else is a local
/// path dispatched by extension.
fn load_source(source: &str) -> Result<Dataset> {
    if source.starts_with("http://") || source.starts_with("https://") {
        load_remote_csv(source)
    } else {
        load_file(Path::new(source))
    }
}

/// Load a panel dataset from a local file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row `user_id,group,week,<metric columns…>`
/// * `.json` – records-oriented array with the same logical schema
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    parse_csv(reader)
}

fn load_remote_csv(url: &str) -> Result<Dataset> {
    let body = reqwest::blocking::get(url)
        .with_context(|| format!("fetching {url}"))?
        .error_for_status()
        .with_context(|| format!("fetching {url}"))?
        .text()
        .context("reading response body")?;
    parse_csv(csv::Reader::from_reader(body.as_bytes()))
}

fn parse_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let metrics = validate_header(&headers)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let user_id = row.get(0).unwrap_or("").trim().to_string();
        let group = row.get(1).unwrap_or("").trim().to_string();
        let week_cell = row.get(2).unwrap_or("").trim();
        let week: i64 = week_cell
            .parse()
            .with_context(|| format!("CSV row {row_no}: week '{week_cell}' is not an integer"))?;

        let mut values = MetricValues::default();
        for (i, metric) in metrics.iter().enumerate() {
            let cell = row.get(3 + i).unwrap_or("").trim();
            let value: f64 = cell.parse().with_context(|| {
                format!(
                    "CSV row {row_no}, column '{}': '{cell}' is not numeric",
                    metric.column_name()
                )
            })?;
            values.set(metric, value);
        }

        records.push(Record {
            user_id,
            group,
            week,
            metrics: values,
        });
    }

    if records.is_empty() {
        bail!("dataset has no rows");
    }
    Ok(Dataset::from_records(records, metrics))
}

/// The first three columns must be exactly `user_id, group, week`; every
/// later column is a metric.
fn validate_header(headers: &[String]) -> Result<Vec<Metric>> {
    const REQUIRED: [&str; 3] = ["user_id", "group", "week"];

    if headers.len() < REQUIRED.len() + 1 {
        bail!(
            "header has {} columns, need user_id, group, week plus at least one metric",
            headers.len()
        );
    }
    for (i, want) in REQUIRED.iter().enumerate() {
        if headers[i] != *want {
            bail!("column {} is '{}', expected '{want}'", i + 1, headers[i]);
        }
    }
    Ok(headers[3..].iter().map(|h| Metric::from_column(h)).collect())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "user_id": "u01", "group": "A", "week": 1, "hydration": 2.0, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    let rows = root.as_array().context("expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    let mut metrics: Vec<Metric> = Vec::new();

    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;

        let user_id = obj
            .get("user_id")
            .and_then(|v| v.as_str())
            .with_context(|| format!("row {i}: missing string 'user_id'"))?
            .to_string();
        let group = obj
            .get("group")
            .and_then(|v| v.as_str())
            .with_context(|| format!("row {i}: missing string 'group'"))?
            .to_string();
        let week = obj
            .get("week")
            .and_then(|v| v.as_i64())
            .with_context(|| format!("row {i}: missing integer 'week'"))?;

        let mut values = MetricValues::default();
        for (key, val) in obj {
            if key == "user_id" || key == "group" || key == "week" {
                continue;
            }
            let number = val
                .as_f64()
                .with_context(|| format!("row {i}, '{key}': not a number"))?;
            let metric = Metric::from_column(key);
            values.set(&metric, number);
            if !metrics.contains(&metric) {
                metrics.push(metric);
            }
        }

        records.push(Record {
            user_id,
            group,
            week,
            metrics: values,
        });
    }

    if records.is_empty() {
        bail!("dataset has no rows");
    }
    Ok(Dataset::from_records(records, metrics))
}
