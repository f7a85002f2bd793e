//! In-memory tabular data parsed from a CSV object
//!
//! A [`Dataset`] is built once per read and never mutated afterwards. Column
//! names follow the dataframe conventions operators expect from the old
//! batch job: blank headers become `Unnamed: N` and repeated headers get a
//! `.1`, `.2`, ... suffix. Each column also carries an inferred
//! [`ColumnType`], used only when the database table has to be created.

use crate::error::{Result, TransferError};
use std::collections::HashMap;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell spellings that are read as a missing value rather than as text
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// One data row; `None` marks a missing cell
pub type Row = Vec<Option<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

/// A cell converted to its column's type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellValue<'a> {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(&'a str),
}

impl ColumnType {
    /// Narrowest type every present cell fits; `Text` when nothing is present
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a str>) -> Self {
        let mut integer = true;
        let mut float = true;
        let mut boolean = true;
        let mut seen = false;

        for cell in cells {
            seen = true;
            let cell = cell.trim();
            integer = integer && cell.parse::<i64>().is_ok();
            float = float && parse_finite(cell).is_some();
            boolean = boolean && parse_bool(cell).is_some();
            if !(integer || float || boolean) {
                return ColumnType::Text;
            }
        }

        match (seen, integer, float, boolean) {
            (false, ..) => ColumnType::Text,
            (true, true, _, _) => ColumnType::Integer,
            (true, false, true, _) => ColumnType::Float,
            (true, false, false, true) => ColumnType::Boolean,
            _ => ColumnType::Text,
        }
    }

    pub fn convert<'a>(self, cell: Option<&'a str>) -> CellValue<'a> {
        let Some(raw) = cell else {
            return CellValue::Null;
        };
        let trimmed = raw.trim();
        let converted = match self {
            ColumnType::Integer => trimmed.parse().ok().map(CellValue::Integer),
            ColumnType::Float => parse_finite(trimmed).map(CellValue::Float),
            ColumnType::Boolean => parse_bool(trimmed).map(CellValue::Boolean),
            ColumnType::Text => None,
        };
        converted.unwrap_or(CellValue::Text(raw))
    }
}

/// MySQL DOUBLE has no NaN or infinity, so those spellings stay text
fn parse_finite(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Parse a comma-delimited body whose first record is the header.
    ///
    /// Blank lines are skipped. An empty body, a data line whose width differs
    /// from the header, or non-UTF-8 content is a `SourceUnavailable` error.
    pub fn from_csv(body: &[u8]) -> Result<Self> {
        let body = body.strip_prefix(UTF8_BOM).unwrap_or(body);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b',')
            .has_headers(true)
            .flexible(false)
            .from_reader(body);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() {
            return Err(TransferError::source_unavailable(
                "no columns to parse from object",
            ));
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(missing_to_none).collect());
        }

        Ok(Self::from_parts(headers, rows))
    }

    /// Build a dataset from raw header names and rows of equal width
    pub fn from_parts(headers: Vec<String>, rows: Vec<Row>) -> Self {
        let names = dedupe_names(headers);
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Column {
                data_type: ColumnType::infer(
                    rows.iter().filter_map(|row| row.get(index)?.as_deref()),
                ),
                name,
            })
            .collect();

        Self { columns, rows }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

fn missing_to_none(cell: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&cell) {
        None
    } else {
        Some(cell.to_string())
    }
}

fn dedupe_names(headers: Vec<String>) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();

    headers
        .into_iter()
        .enumerate()
        .map(|(index, header)| {
            let mut name = if header.is_empty() {
                format!("Unnamed: {}", index)
            } else {
                header
            };

            let mut seen = counts.get(&name).copied().unwrap_or(0);
            while seen > 0 {
                counts.insert(name.clone(), seen + 1);
                name = format!("{}.{}", name, seen);
                seen = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), seen + 1);
            name
        })
        .collect()
}
