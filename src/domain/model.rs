use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single table cell. `Null` marks a missing value.
pub type Cell = serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }
}

/// Ordered, named columns aligned by row index.
///
/// Every column has exactly `row_count()` cells and names are unique. Both
/// are checked once in [`Table::new`]; the transform stages only rebuild
/// tables through crate-internal helpers that keep them intact.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut seen = HashSet::with_capacity(columns.len());

        for column in &columns {
            if column.len() != rows {
                return Err(EtlError::MalformedTable {
                    message: format!(
                        "column '{}' has {} values, expected {}",
                        column.name,
                        column.len(),
                        rows
                    ),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(EtlError::MalformedTable {
                    message: format!("duplicate column name '{}'", column.name),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Builds a table from `(name, values)` pairs.
    pub fn from_pairs<N, I>(pairs: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<Cell>)>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, values)| Column::new(name, values))
                .collect(),
        )
    }

    pub(crate) fn from_parts(columns: Vec<Column>, rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.len() == rows));
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub(crate) fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn cell(&self, column: &str, row: usize) -> Option<&Cell> {
        self.column(column).and_then(|c| c.values.get(row))
    }

    /// Removes a column, returning it if it was present.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.columns.iter().position(|c| c.name == name)?;
        Some(self.columns.remove(idx))
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}

/// One categorical column's expansion as reported after a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedColumn {
    pub column: String,
    /// Category that received no indicator column (drop-first).
    pub reference: Option<String>,
    pub indicators: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PreprocessReport {
    pub rows: usize,
    pub columns_in: usize,
    pub columns_out: usize,
    pub dropped_columns: Vec<String>,
    pub filled_cells: usize,
    pub coerced_to_zero: usize,
    pub encoded: Vec<EncodedColumn>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub table: Table,
    pub report: PreprocessReport,
    pub csv_output: Option<String>,
    pub json_output: Option<String>,
}
