//! Data File Heuristics
//!
//! Parses CSV/TSV into a [`Table`] and JSON/YAML into a `serde_json::Value`
//! (arrays of objects are also viewed as a table). XML and SQL are only
//! counted by lines; Parquet and database files are never parsed.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::context::FileContext;
use super::security::KeywordScan;
use crate::constants::UNSUPPORTED;
use crate::constants::data::{
    INCONSISTENCY_RATIO, OUTLIER_SHARE, PII_COLUMN_HINTS, SENSITIVE_COLUMN_HINTS,
};
use crate::types::{Result, ScopeError, Section, section};

// =============================================================================
// Format Detection
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataFormat {
    Delimited(u8),
    Json,
    Yaml,
    LineOriented,
    Opaque,
}

impl DataFormat {
    fn detect(extension: &str, mime_type: Option<&str>) -> Self {
        match extension {
            ".csv" => Self::Delimited(b','),
            ".tsv" => Self::Delimited(b'\t'),
            ".json" => Self::Json,
            ".yaml" | ".yml" => Self::Yaml,
            ".parquet" | ".db" => Self::Opaque,
            _ if mime_type.is_some_and(|m| m.contains("json")) => Self::Json,
            _ => Self::LineOriented,
        }
    }

    /// Name reported as `structure_type` for parsed documents
    fn document_name(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            _ => "json",
        }
    }
}

/// Binary data formats whose bytes are never decoded as text
pub fn is_opaque_format(extension: &str) -> bool {
    DataFormat::detect(extension, None) == DataFormat::Opaque
}

// =============================================================================
// Table Model
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    String,
    Empty,
}

impl ColumnType {
    /// Narrowest type that fits every present value
    fn infer<'v>(values: impl Iterator<Item = &'v str>) -> Self {
        let values: Vec<&str> = values.collect();
        if values.is_empty() {
            ColumnType::Empty
        } else if values.iter().all(|v| v.parse::<i64>().is_ok()) {
            ColumnType::Integer
        } else if values.iter().all(|v| v.parse::<f64>().is_ok()) {
            ColumnType::Float
        } else if values
            .iter()
            .all(|v| v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("false"))
        {
            ColumnType::Boolean
        } else {
            ColumnType::String
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Integer | ColumnType::Float)
    }
}

/// Rows of optional cells; `None` is a missing value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnProfile {
    pub name: String,
    pub kind: ColumnType,
    pub missing: usize,
    pub non_missing: usize,
    pub unique: usize,
    pub outliers: usize,
    /// Present for numeric columns with at least one finite value
    pub summary: Option<NumericSummary>,
}

/// Descriptive statistics of one numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; absent for a single value
    pub std: Option<f64>,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q1: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q3: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Summary of already sorted finite values
    fn from_sorted(sorted: &[f64]) -> Option<Self> {
        let (&min, &max) = (sorted.first()?, sorted.last()?);
        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let variance =
                sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        });

        Some(Self {
            count,
            mean,
            std,
            min,
            q1: percentile(sorted, 0.25)?,
            median: percentile(sorted, 0.5)?,
            q3: percentile(sorted, 0.75)?,
            max,
        })
    }
}

/// Suffix repeated header names (`a`, `a_2`, ...) so every column keeps its own entry
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|header| {
            let mut name = header.clone();
            let mut n = 2;
            while seen.contains(&name) {
                name = format!("{}_{}", header, n);
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

impl Table {
    fn from_delimited(text: &str, delimiter: u8) -> std::result::Result<Self, csv::Error> {
        // Short rows are padded with missing cells rather than rejected
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = dedupe_headers(reader.headers()?.iter().map(str::to_string).collect());
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|cell| {
                        let cell = cell.trim();
                        (!cell.is_empty()).then(|| cell.to_string())
                    })
                    .collect(),
            );
        }
        Ok(Self { headers, rows })
    }

    /// Table view of a non-empty array of objects; columns in first-seen order
    fn from_records(root: &Value) -> Option<Self> {
        let items = root.as_array()?;
        if items.is_empty() || !items.iter().all(Value::is_object) {
            return None;
        }

        let mut headers: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for item in items.iter().filter_map(Value::as_object) {
            for key in item.keys() {
                if seen.insert(key.as_str()) {
                    headers.push(key.clone());
                }
            }
        }

        let rows = items
            .iter()
            .filter_map(Value::as_object)
            .map(|item| {
                headers
                    .iter()
                    .map(|h| match item.get(h) {
                        None | Some(Value::Null) => None,
                        Some(Value::String(s)) => Some(s.clone()),
                        Some(other) => Some(other.to_string()),
                    })
                    .collect()
            })
            .collect();

        Some(Self { headers, rows })
    }

    fn column(&self, index: usize) -> impl Iterator<Item = Option<&str>> {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    pub fn profile(&self, sample_rows: usize) -> Vec<ColumnProfile> {
        self.headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let kind = ColumnType::infer(self.column(index).take(sample_rows).flatten());
                let present: Vec<&str> = self.column(index).flatten().collect();
                let unique = present.iter().collect::<HashSet<_>>().len();
                let (outliers, summary) = if kind.is_numeric() {
                    let sorted = sorted_finite(present.iter().filter_map(|v| v.parse().ok()));
                    (count_outliers(&sorted), NumericSummary::from_sorted(&sorted))
                } else {
                    (0, None)
                };

                ColumnProfile {
                    name: name.clone(),
                    kind,
                    missing: self.rows.len() - present.len(),
                    non_missing: present.len(),
                    unique,
                    outliers,
                    summary,
                }
            })
            .collect()
    }
}

/// Linear-interpolated percentile of sorted values, `p` in [0,1]
fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64))
}

fn sorted_finite(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Sorted values outside `[q1 - 1.5*iqr, q3 + 1.5*iqr]`
fn count_outliers(sorted: &[f64]) -> usize {
    let (Some(q1), Some(q3)) = (percentile(sorted, 0.25), percentile(sorted, 0.75)) else {
        return 0;
    };
    let iqr = q3 - q1;
    let (low, high) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);
    sorted.iter().filter(|v| **v < low || **v > high).count()
}

// =============================================================================
// JSON Shape
// =============================================================================

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn children(value: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match value {
        Value::Object(map) => Box::new(map.values()),
        Value::Array(items) => Box::new(items.iter()),
        _ => Box::new(std::iter::empty()),
    }
}

/// Nesting depth: scalar children add nothing, container children add one
pub fn json_depth(value: &Value) -> usize {
    children(value)
        .map(|child| {
            if is_container(child) {
                1 + json_depth(child)
            } else {
                0
            }
        })
        .max()
        .unwrap_or(0)
}

/// Number of object entries and array items below `value`
fn node_count(value: &Value) -> usize {
    children(value).map(|child| 1 + node_count(child)).sum()
}

/// Node count of a document; a bare scalar counts as one node
pub fn json_complexity(value: &Value) -> usize {
    if is_container(value) {
        node_count(value)
    } else {
        1
    }
}

fn root_type(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

/// (null leaves, all leaves)
fn leaf_counts(value: &Value) -> (usize, usize) {
    if is_container(value) {
        children(value).fold((0, 0), |(nulls, total), child| {
            let (n, t) = leaf_counts(child);
            (nulls + n, total + t)
        })
    } else {
        (usize::from(value.is_null()), 1)
    }
}

// =============================================================================
// Data Shape
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DataShape {
    Tabular(Table),
    Document {
        /// `"json"` or `"yaml"`
        format: &'static str,
        root: Value,
        table: Option<Table>,
    },
    Lines(usize),
    Opaque,
}

impl DataShape {
    pub fn parse(ctx: &FileContext<'_>) -> Result<Self> {
        let text = ctx.text;
        let format = ctx.format();
        let detected = DataFormat::detect(&ctx.record.extension, ctx.record.mime_type.as_deref());
        let shape = match detected {
            DataFormat::Delimited(delimiter) => Self::Tabular(
                Table::from_delimited(text, delimiter)
                    .map_err(|e| ScopeError::parse(&format, e.to_string()))?,
            ),
            DataFormat::Json => {
                let root: Value = serde_json::from_str(text)
                    .map_err(|e| ScopeError::parse(&format, e.to_string()))?;
                Self::document(detected, root)
            }
            DataFormat::Yaml => {
                let root: Value = serde_yaml::from_str(text)
                    .map_err(|e| ScopeError::parse(&format, e.to_string()))?;
                Self::document(detected, root)
            }
            DataFormat::LineOriented => Self::Lines(text.lines().count()),
            DataFormat::Opaque => Self::Opaque,
        };
        Ok(shape)
    }

    fn document(format: DataFormat, root: Value) -> Self {
        let table = Table::from_records(&root);
        Self::Document {
            format: format.document_name(),
            root,
            table,
        }
    }

    pub fn table(&self) -> Option<&Table> {
        match self {
            Self::Tabular(table) => Some(table),
            Self::Document { table, .. } => table.as_ref(),
            _ => None,
        }
    }
}

fn shape<'c>(ctx: &'c FileContext<'_>) -> Result<&'c DataShape> {
    ctx.data_shape()
        .as_ref()
        .map_err(|message| ScopeError::Context(message.clone()))
}

// =============================================================================
// Phases
// =============================================================================

fn table_structure(out: &mut Section, table: &Table, profiles: &[ColumnProfile]) {
    let column_types: BTreeMap<&str, ColumnType> =
        profiles.iter().map(|p| (p.name.as_str(), p.kind)).collect();
    let missing: BTreeMap<&str, usize> =
        profiles.iter().map(|p| (p.name.as_str(), p.missing)).collect();

    out.insert("rows".to_string(), json!(table.rows.len()));
    out.insert("columns".to_string(), json!(table.headers.len()));
    out.insert("headers".to_string(), json!(table.headers));
    out.insert("column_types".to_string(), json!(column_types));
    out.insert("missing_values".to_string(), json!(missing));
}

pub fn structure(ctx: &FileContext<'_>) -> Result<Section> {
    let sample_rows = ctx.options.sample_rows;
    let mut out = Section::new();

    match shape(ctx)? {
        DataShape::Tabular(table) => {
            out.insert("structure_type".to_string(), json!("tabular"));
            table_structure(&mut out, table, &table.profile(sample_rows));
        }
        DataShape::Document {
            format,
            root,
            table,
        } => {
            out.insert("structure_type".to_string(), json!(format));
            out.insert("root_type".to_string(), json!(root_type(root)));
            if let Some(map) = root.as_object() {
                out.insert("keys_count".to_string(), json!(map.len()));
            }
            out.insert("depth".to_string(), json!(json_depth(root)));
            out.insert("complexity".to_string(), json!(json_complexity(root)));
            if let Some(table) = table {
                table_structure(&mut out, table, &table.profile(sample_rows));
            }
        }
        DataShape::Lines(lines) => {
            out.insert("format".to_string(), json!(ctx.format()));
            out.insert("lines".to_string(), json!(lines));
            out.insert("parsed".to_string(), json!(UNSUPPORTED));
        }
        DataShape::Opaque => {
            out.insert("format".to_string(), json!(ctx.format()));
            out.insert("size_bytes".to_string(), json!(ctx.record.size_bytes));
            out.insert("parsed".to_string(), json!(UNSUPPORTED));
        }
    }
    Ok(out)
}

pub fn content(ctx: &FileContext<'_>) -> Result<Section> {
    let data = shape(ctx)?;

    if let Some(table) = data.table() {
        let profiles = table.profile(ctx.options.sample_rows);
        let numerical: Vec<&str> = profiles
            .iter()
            .filter(|p| p.kind.is_numeric())
            .map(|p| p.name.as_str())
            .collect();
        let categorical: Vec<&str> = profiles
            .iter()
            .filter(|p| matches!(p.kind, ColumnType::String | ColumnType::Boolean))
            .map(|p| p.name.as_str())
            .collect();
        let unique: BTreeMap<&str, usize> =
            profiles.iter().map(|p| (p.name.as_str(), p.unique)).collect();
        let summary: BTreeMap<&str, &NumericSummary> = profiles
            .iter()
            .filter_map(|p| p.summary.as_ref().map(|s| (p.name.as_str(), s)))
            .collect();

        return Ok(section(json!({
            "numerical_columns": numerical,
            "categorical_columns": categorical,
            "unique_values": unique,
            "statistical_summary": summary,
        })));
    }

    match data {
        DataShape::Document { root, .. } => {
            let keys: Vec<&String> = root.as_object().map(|m| m.keys().collect()).unwrap_or_default();
            Ok(section(json!({
                "top_level_keys": keys,
                "array_length": root.as_array().map(Vec::len),
            })))
        }
        _ => Ok(section(json!({ "analysis": UNSUPPORTED }))),
    }
}

/// `1 - flagged/columns`, floored at 0; 1.0 for an empty table
fn column_score(table: &Table, profiles: &[ColumnProfile], flagged: usize) -> f64 {
    if table.rows.is_empty() || profiles.is_empty() {
        1.0
    } else {
        (1.0 - flagged as f64 / profiles.len() as f64).max(0.0)
    }
}

pub fn table_quality(table: &Table, profiles: &[ColumnProfile]) -> Section {
    let cells = table.rows.len() * table.headers.len();
    let missing: usize = profiles.iter().map(|p| p.missing).sum();
    let completeness = if cells == 0 {
        1.0
    } else {
        1.0 - missing as f64 / cells as f64
    };

    let inconsistent = profiles
        .iter()
        .filter(|p| p.kind == ColumnType::String && p.non_missing > 0)
        .filter(|p| p.unique as f64 / p.non_missing as f64 > INCONSISTENCY_RATIO)
        .count();

    let outlier_limit = table.rows.len() as f64 * OUTLIER_SHARE;
    let inaccurate = profiles
        .iter()
        .filter(|p| p.kind.is_numeric() && p.outliers as f64 > outlier_limit)
        .count();

    section(json!({
        "completeness": completeness,
        "consistency": column_score(table, profiles, inconsistent),
        "accuracy_estimate": column_score(table, profiles, inaccurate),
    }))
}

pub fn quality(ctx: &FileContext<'_>) -> Result<Section> {
    let data = shape(ctx)?;

    if let Some(table) = data.table() {
        return Ok(table_quality(table, &table.profile(ctx.options.sample_rows)));
    }

    match data {
        DataShape::Document { root, .. } => {
            let (nulls, leaves) = leaf_counts(root);
            let completeness = if leaves == 0 {
                1.0
            } else {
                1.0 - nulls as f64 / leaves as f64
            };
            Ok(section(json!({ "completeness": completeness })))
        }
        _ => Ok(section(json!({ "integrity": UNSUPPORTED }))),
    }
}

/// Column names containing any of `hints`
fn matching_columns<'t>(table: Option<&'t Table>, hints: &[&str]) -> Vec<&'t str> {
    table
        .map(|t| {
            t.headers
                .iter()
                .filter(|h| {
                    let lower = h.to_lowercase();
                    hints.iter().any(|hint| lower.contains(hint))
                })
                .map(String::as_str)
                .collect()
        })
        .unwrap_or_default()
}

/// Runs on the decoded text even when the data could not be parsed
pub fn security(ctx: &FileContext<'_>) -> Result<Section> {
    let mut out = KeywordScan::run(ctx.text).to_section();
    let table = ctx.data_shape().as_ref().ok().and_then(DataShape::table);

    let sensitive = matching_columns(table, SENSITIVE_COLUMN_HINTS);
    let pii_columns = matching_columns(table, PII_COLUMN_HINTS);
    if !pii_columns.is_empty() {
        out.insert("pii_detected".to_string(), json!(true));
    }
    out.insert("sensitive_columns".to_string(), json!(sensitive));
    out.insert("pii_columns".to_string(), json!(pii_columns));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::context::AnalyzerOptions;
    use crate::types::FileRecord;
    use proptest::prelude::*;

    fn with_ctx<T>(name: &str, text: &str, f: impl FnOnce(&FileContext<'_>) -> T) -> T {
        let record = FileRecord::from_bytes(name, text.as_bytes(), None);
        let options = AnalyzerOptions::default();
        let ctx = FileContext::new(&record, text, &options);
        f(&ctx)
    }

    #[test]
    fn test_nested_json_depth_and_complexity() {
        let value: Value = serde_json::from_str(r#"{"a": {"b": 1, "c": [1, 2]}}"#).unwrap();
        assert_eq!(json_depth(&value), 2);
        assert_eq!(json_complexity(&value), 5);
    }

    #[test]
    fn test_scalar_and_empty_documents() {
        assert_eq!(json_depth(&json!(42)), 0);
        assert_eq!(json_complexity(&json!(42)), 1);
        assert_eq!(json_depth(&json!({})), 0);
        assert_eq!(json_complexity(&json!([])), 0);
        assert_eq!(json_depth(&json!([[[]]])), 2);
    }

    #[test]
    fn test_csv_structure() {
        let csv = "id,name,score\n1,alice,9.5\n2,,7\n3,carol,\n";
        let s = with_ctx("people.csv", csv, |ctx| structure(ctx).unwrap());
        assert_eq!(s["structure_type"], json!("tabular"));
        assert_eq!(s["rows"], json!(3));
        assert_eq!(s["columns"], json!(3));
        assert_eq!(s["headers"], json!(["id", "name", "score"]));
        assert_eq!(
            s["column_types"],
            json!({"id": "integer", "name": "string", "score": "float"})
        );
        assert_eq!(s["missing_values"], json!({"id": 0, "name": 1, "score": 1}));
    }

    #[test]
    fn test_tsv_uses_tab_delimiter() {
        let s = with_ctx("t.tsv", "a\tb\ntrue\tx\n", |ctx| structure(ctx).unwrap());
        assert_eq!(s["columns"], json!(2));
        assert_eq!(s["column_types"]["a"], json!("boolean"));
    }

    #[test]
    fn test_malformed_csv_fails_only_parsing_phases() {
        let csv = "a,b\n1,2,3\n";
        with_ctx("bad.csv", csv, |ctx| {
            let err = structure(ctx).unwrap_err().to_string();
            assert!(err.contains("Parse error in csv"), "{err}");
            assert!(quality(ctx).is_err());
            let sec = security(ctx).unwrap();
            assert_eq!(sec["secrets_exposed"], json!(false));
            assert_eq!(sec["sensitive_columns"], json!([]));
        });
    }

    #[test]
    fn test_json_array_of_objects_is_tabular() {
        let text = r#"[{"email": "a@x.io", "age": 30}, {"email": null, "age": 41, "token": "t"}]"#;
        with_ctx("users.json", text, |ctx| {
            let s = structure(ctx).unwrap();
            assert_eq!(s["structure_type"], json!("json"));
            assert_eq!(s["root_type"], json!("array"));
            assert_eq!(s["rows"], json!(2));
            assert_eq!(s["missing_values"]["email"], json!(1));
            assert_eq!(s["missing_values"]["token"], json!(1));

            let c = content(ctx).unwrap();
            assert_eq!(c["numerical_columns"], json!(["age"]));

            let sec = security(ctx).unwrap();
            assert_eq!(sec["pii_detected"], json!(true));
            assert_eq!(sec["pii_columns"], json!(["email"]));
            assert_eq!(sec["sensitive_columns"], json!(["token"]));
        });
    }

    #[test]
    fn test_yaml_document() {
        let s = with_ctx("c.yaml", "server:\n  ports: [80, 443]\n", |ctx| {
            structure(ctx).unwrap()
        });
        assert_eq!(s["structure_type"], json!("yaml"));
        assert_eq!(s["keys_count"], json!(1));
        assert_eq!(s["depth"], json!(2));
        assert_eq!(s["complexity"], json!(4));
    }

    #[test]
    fn test_line_oriented_and_opaque_formats() {
        let s = with_ctx("q.sql", "SELECT 1;\nSELECT 2;\n", |ctx| structure(ctx).unwrap());
        assert_eq!(s["lines"], json!(2));
        assert_eq!(s["parsed"], json!(UNSUPPORTED));

        let s = with_ctx("d.parquet", "", |ctx| structure(ctx).unwrap());
        assert_eq!(s["format"], json!("parquet"));
        assert_eq!(s["parsed"], json!(UNSUPPORTED));
    }

    #[test]
    fn test_table_quality_scores() {
        let table = Table {
            headers: vec!["v".to_string(), "label".to_string()],
            rows: [1, 2, 2, 3, 2, 1000]
                .iter()
                .map(|v| vec![Some(v.to_string()), Some("same".to_string())])
                .collect(),
        };
        let profiles = table.profile(100);
        assert_eq!(profiles[0].outliers, 1);

        let q = table_quality(&table, &profiles);
        assert_eq!(q["completeness"], json!(1.0));
        assert_eq!(q["consistency"], json!(1.0));
        // one outlier in six rows exceeds the 10% share
        assert_eq!(q["accuracy_estimate"], json!(0.5));
    }

    #[test]
    fn test_empty_table_scores_are_perfect() {
        let table = Table::default();
        let q = table_quality(&table, &table.profile(10));
        assert_eq!(q["completeness"], json!(1.0));
        assert_eq!(q["consistency"], json!(1.0));
    }

    #[test]
    fn test_short_csv_rows_count_as_missing() {
        let csv = "id,name,score\n1,alice,9\n2,bob\n";
        let s = with_ctx("ragged.csv", csv, |ctx| structure(ctx).unwrap());
        assert_eq!(s["rows"], json!(2));
        assert_eq!(s["missing_values"], json!({"id": 0, "name": 0, "score": 1}));

        let q = with_ctx("ragged.csv", csv, |ctx| quality(ctx).unwrap());
        let completeness = q["completeness"].as_f64().unwrap();
        assert!((completeness - 5.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_headers_keep_every_column() {
        let s = with_ctx("dup.csv", "a,a\n1,x\n", |ctx| structure(ctx).unwrap());
        assert_eq!(s["columns"], json!(2));
        assert_eq!(s["headers"], json!(["a", "a_2"]));
        assert_eq!(s["column_types"], json!({"a": "integer", "a_2": "string"}));

        let names = dedupe_headers(vec!["k".into(), "k".into(), "k_2".into()]);
        assert_eq!(names, vec!["k", "k_2", "k_2_2"]);
    }

    #[test]
    fn test_structure_type_follows_parsed_format() {
        let s = with_ctx("c.yml", "a: 1\n", |ctx| structure(ctx).unwrap());
        assert_eq!(s["structure_type"], json!("yaml"));

        let text = "{\"a\": 1}";
        let record = FileRecord::from_bytes("payload", text.as_bytes(), Some("application/json"));
        let options = AnalyzerOptions::default();
        let ctx = FileContext::new(&record, text, &options);
        let s = structure(&ctx).unwrap();
        assert_eq!(s["structure_type"], json!("json"));
        assert_eq!(s["keys_count"], json!(1));
    }

    #[test]
    fn test_statistical_summary_for_numeric_columns() {
        let csv = "n,label\n1,a\n2,b\n3,c\n4,d\n";
        let c = with_ctx("nums.csv", csv, |ctx| content(ctx).unwrap());
        let summary = &c["statistical_summary"];
        assert!(summary.get("label").is_none());

        let n = &summary["n"];
        assert_eq!(n["count"], json!(4));
        assert_eq!(n["mean"], json!(2.5));
        assert_eq!(n["min"], json!(1.0));
        assert_eq!(n["25%"], json!(1.75));
        assert_eq!(n["50%"], json!(2.5));
        assert_eq!(n["75%"], json!(3.25));
        assert_eq!(n["max"], json!(4.0));
        let std = n["std"].as_f64().unwrap();
        assert!((std - 1.290_994_448_7).abs() < 1e-9);
    }

    #[test]
    fn test_single_value_summary_has_no_std() {
        let summary = NumericSummary::from_sorted(&[7.0]).unwrap();
        assert_eq!(summary.count, 1);
        assert_eq!(summary.std, None);
        assert_eq!(summary.median, 7.0);
        assert!(NumericSummary::from_sorted(&[]).is_none());
    }

    #[test]
    fn test_opaque_formats() {
        assert!(is_opaque_format(".parquet"));
        assert!(is_opaque_format(".db"));
        assert!(!is_opaque_format(".csv"));
        assert!(!is_opaque_format(".sql"));
    }

    #[test]
    fn test_percentile_interpolates() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 0.25), Some(1.75));
        assert_eq!(percentile(&[], 0.5), None);
    }

    proptest! {
        #[test]
        fn prop_table_scores_bounded(cells in prop::collection::vec(
            prop::option::of("[0-9a-z]{0,3}"), 0..60)) {
            let rows: Vec<Vec<Option<String>>> =
                cells.chunks(3).filter(|c| c.len() == 3).map(|c| c.to_vec()).collect();
            let table = Table {
                headers: vec!["a".into(), "b".into(), "c".into()],
                rows,
            };
            let q = table_quality(&table, &table.profile(1000));
            for key in ["completeness", "consistency", "accuracy_estimate"] {
                let v = q[key].as_f64().unwrap();
                prop_assert!((0.0..=1.0).contains(&v), "{} = {}", key, v);
            }
        }
    }
}
