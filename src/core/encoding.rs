//! Categorical expansion into drop-first indicator columns.

use crate::domain::model::{Cell, Column};
use serde_json::Value;
use std::collections::BTreeSet;

/// Label of a cell inside a categorical column; `None` for missing cells.
pub fn category_label(cell: &Cell) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Distinct labels sorted byte-wise. The first one is the reference
/// category and gets no indicator column.
pub fn distinct_values(values: &[Cell]) -> Vec<String> {
    values
        .iter()
        .filter_map(category_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn indicator_name(column: &str, value: &str) -> String {
    format!("{}_{}", column, value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expansion {
    pub reference: Option<String>,
    pub indicators: Vec<Column>,
}

/// Expands one column into boolean indicators, one per category except the
/// reference. Missing cells are false in every indicator.
pub fn expand_column(column: &Column) -> Expansion {
    let labels: Vec<Option<String>> = column.values.iter().map(category_label).collect();
    let mut categories = distinct_values(&column.values).into_iter();
    let reference = categories.next();

    let indicators = categories
        .map(|category| {
            let values = labels
                .iter()
                .map(|label| Value::Bool(label.as_deref() == Some(category.as_str())))
                .collect();
            Column::new(indicator_name(&column.name, &category), values)
        })
        .collect();

    Expansion {
        reference,
        indicators,
    }
}
