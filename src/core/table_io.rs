//! CSV and JSON rendering of [`Table`].
//!
//! Reading infers one type per column: booleans, then finite numbers, then
//! text. Common missing-value tokens become `Null`. Booleans and numbers may
//! carry surrounding whitespace; a whitespace-only field is neither missing
//! nor a number, so a column holding `" "` stays textual.

use crate::domain::model::{Cell, Column, Table};
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};

const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A",
    "<NA>", "#NA", "-1.#IND", "1.#QNAN",
];

fn is_missing(field: &str) -> bool {
    MISSING_TOKENS.contains(&field)
}

fn parse_bool(field: &str) -> Option<bool> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("true") {
        Some(true)
    } else if field.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_number(field: &str) -> Option<Value> {
    let field = field.trim();
    if let Ok(i) = field.parse::<i64>() {
        return Some(Value::from(i));
    }
    field
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::from)
}

enum Kind {
    Bool,
    Number,
    Text,
}

fn infer_kind(fields: &[String]) -> Kind {
    let mut present = fields.iter().filter(|f| !is_missing(f)).peekable();
    if present.peek().is_none() {
        return Kind::Text;
    }
    let present: Vec<&String> = present.collect();
    if present.iter().all(|f| parse_bool(f).is_some()) {
        Kind::Bool
    } else if present.iter().all(|f| parse_number(f).is_some()) {
        Kind::Number
    } else {
        Kind::Text
    }
}

fn to_cells(fields: Vec<String>) -> Vec<Cell> {
    let kind = infer_kind(&fields);
    fields
        .into_iter()
        .map(|field| {
            if is_missing(&field) {
                return Value::Null;
            }
            match kind {
                Kind::Bool => parse_bool(&field).map(Value::Bool).unwrap_or(Value::Null),
                Kind::Number => parse_number(&field).unwrap_or(Value::Null),
                Kind::Text => Value::String(field),
            }
        })
        .collect()
}

pub fn read_csv(data: &[u8]) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut fields: Vec<Vec<String>> = vec![Vec::new(); headers.len()];

    for record in reader.records() {
        let record = record?;
        for (column, field) in fields.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(fields)
        .map(|(name, values)| Column::new(name, to_cells(values)))
        .collect();

    let table = Table::new(columns)?;
    tracing::debug!(
        "Parsed CSV with {} rows and {} columns",
        table.row_count(),
        table.column_count()
    );
    Ok(table)
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Writes the header and one record per row. A table without columns is
/// written as one empty line per row after an empty header line.
pub fn write_csv(table: &Table) -> Result<String> {
    if table.column_count() == 0 {
        return Ok("\n".repeat(table.row_count() + 1));
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.column_names())?;

    for row in 0..table.row_count() {
        writer.write_record(table.columns().iter().map(|c| render_cell(&c.values[row])))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| EtlError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Row objects keyed by column name, keys in column order.
pub fn to_json_records(table: &Table) -> Value {
    let rows = (0..table.row_count())
        .map(|row| {
            let object: Map<String, Value> = table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), c.values[row].clone()))
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(rows)
}
