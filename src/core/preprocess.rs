//! The churn table transform.
//!
//! Four stages run in a fixed order over an owned copy of the input:
//! column removal, missing-value fill, numeric coercion and categorical
//! expansion. Expansion must run last since it sees the filled column set.
//! Each stage is skipped when the resolved [`Schema`] has no column for it.

use crate::core::encoding::expand_column;
use crate::domain::model::{Cell, Column, EncodedColumn, PreprocessReport, Table};
use crate::domain::schema::Schema;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub table: Table,
    pub report: PreprocessReport,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, input: &Table) -> Preprocessed {
        let schema = Schema::resolve(input);
        let mut report = PreprocessReport {
            rows: input.row_count(),
            columns_in: input.column_count(),
            ..Default::default()
        };

        let table = input.clone();
        let table = drop_columns(table, &schema, &mut report);
        let table = fill_missing(table, &schema, &mut report);
        let table = coerce_numeric(table, &schema, &mut report);
        let table = expand_categoricals(table, &schema, &mut report);

        report.columns_out = table.column_count();
        tracing::debug!(
            "Preprocessed {} rows: {} -> {} columns",
            report.rows,
            report.columns_in,
            report.columns_out
        );

        Preprocessed { table, report }
    }
}

/// Runs the transform and returns the new table.
pub fn preprocess(table: &Table) -> Table {
    Preprocessor::new().run(table).table
}

fn drop_columns(mut table: Table, schema: &Schema, report: &mut PreprocessReport) -> Table {
    for name in schema.dropped() {
        if table.remove_column(name).is_some() {
            tracing::debug!("Dropped column '{}'", name);
            report.dropped_columns.push(name.to_string());
        }
    }
    table
}

fn fill_missing(mut table: Table, schema: &Schema, report: &mut PreprocessReport) -> Table {
    for (name, fill) in schema.imputed() {
        let Some(column) = table.column_mut(name) else {
            continue;
        };
        let mut filled = 0;
        for cell in column.values.iter_mut().filter(|c| c.is_null()) {
            *cell = Value::String(fill.to_string());
            filled += 1;
        }
        tracing::debug!("Filled {} missing cells in '{}' with '{}'", filled, name, fill);
        report.filled_cells += filled;
    }
    table
}

/// Parses a cell as a finite decimal. Text is trimmed first; booleans map to
/// 1 and 0.
pub fn parse_decimal(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }?;
    value.is_finite().then_some(value)
}

fn coerce_numeric(mut table: Table, schema: &Schema, report: &mut PreprocessReport) -> Table {
    for name in schema.numeric_text() {
        let Some(column) = table.column_mut(name) else {
            continue;
        };
        let mut zeroed = 0;
        for cell in column.values.iter_mut() {
            let number = parse_decimal(cell).unwrap_or_else(|| {
                zeroed += 1;
                0.0
            });
            *cell = Value::from(number);
        }
        if zeroed > 0 {
            tracing::debug!("Coerced {} unparseable cells in '{}' to 0", zeroed, name);
        }
        report.coerced_to_zero += zeroed;
    }
    table
}

fn expand_categoricals(table: Table, schema: &Schema, report: &mut PreprocessReport) -> Table {
    let categorical: HashSet<&str> = schema.categorical().into_iter().collect();
    if categorical.is_empty() {
        return table;
    }

    let rows = table.row_count();
    let mut kept = Vec::new();
    let mut expanded = Vec::new();
    for column in table.into_columns() {
        if categorical.contains(column.name.as_str()) {
            expanded.push(column);
        } else {
            kept.push(column);
        }
    }

    let mut names: HashSet<String> = kept.iter().map(|c| c.name.clone()).collect();
    let mut indicators: Vec<Column> = Vec::new();

    for column in &expanded {
        let expansion = expand_column(column);
        let mut emitted = Vec::with_capacity(expansion.indicators.len());

        for mut indicator in expansion.indicators {
            indicator.name = unique_name(&indicator.name, &names);
            names.insert(indicator.name.clone());
            emitted.push(indicator.name.clone());
            indicators.push(indicator);
        }

        tracing::debug!(
            "Expanded '{}' into {} indicators (reference: {:?})",
            column.name,
            emitted.len(),
            expansion.reference
        );
        report.encoded.push(EncodedColumn {
            column: column.name.clone(),
            reference: expansion.reference,
            indicators: emitted,
        });
    }

    kept.extend(indicators);
    Table::from_parts(kept, rows)
}

fn unique_name(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}#{}", base, n))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{
        CHURN, CHURN_CATEGORY, CHURN_REASON, CUSTOMER_ID, INTERNET_TYPE, LAT_LONG, TOTAL_CHARGES,
    };
    use serde_json::json;

    fn raw_table() -> Table {
        Table::from_pairs([
            (CUSTOMER_ID, vec![json!("0002-ORFBO"), json!("0003-MKNFE"), json!("0004-TLHLJ")]),
            (LAT_LONG, vec![json!("34.8, -118.1"), json!("34.0, -118.2"), json!("33.9, -118.3")]),
            ("Gender", vec![json!("Female"), json!("Male"), json!("Male")]),
            ("Age", vec![json!(37), json!(46), json!(50)]),
            (INTERNET_TYPE, vec![json!("Cable"), json!(null), json!("Fiber Optic")]),
            (TOTAL_CHARGES, vec![json!("593.3"), json!(" "), json!("280.85")]),
            (CHURN, vec![json!("No"), json!("No"), json!("Yes")]),
            (CHURN_CATEGORY, vec![json!(null), json!(null), json!("Competitor")]),
            (CHURN_REASON, vec![json!(null), json!(null), json!("Competitor had better devices")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_drop_columns_removes_identifiers_and_leakage() {
        let output = preprocess(&raw_table());

        for name in [CUSTOMER_ID, LAT_LONG, CHURN_CATEGORY, CHURN_REASON] {
            assert!(!output.contains(name), "{} should be dropped", name);
        }
    }

    #[test]
    fn test_output_column_layout() {
        let output = preprocess(&raw_table());

        assert_eq!(
            output.column_names(),
            vec![
                "Age",
                TOTAL_CHARGES,
                CHURN,
                "Gender_Male",
                "Internet Type_Fiber Optic",
                "Internet Type_No Internet Service",
            ]
        );
        assert_eq!(output.row_count(), 3);
    }

    #[test]
    fn test_internet_type_fill_becomes_indicator() {
        let output = preprocess(&raw_table());

        let no_internet = output.column("Internet Type_No Internet Service").unwrap();
        assert_eq!(no_internet.values, vec![json!(false), json!(true), json!(false)]);
    }

    #[test]
    fn test_total_charges_coercion() {
        let output = preprocess(&raw_table());

        let charges: Vec<Option<f64>> = output
            .column(TOTAL_CHARGES)
            .unwrap()
            .values
            .iter()
            .map(|v| v.as_f64())
            .collect();
        assert_eq!(charges, vec![Some(593.3), Some(0.0), Some(280.85)]);
    }

    #[test]
    fn test_churn_label_untouched() {
        let output = preprocess(&raw_table());

        assert_eq!(
            output.column(CHURN).unwrap().values,
            vec![json!("No"), json!("No"), json!("Yes")]
        );
    }

    #[test]
    fn test_input_is_not_mutated() {
        let input = raw_table();
        let before = input.clone();

        let _ = preprocess(&input);

        assert_eq!(input, before);
    }

    #[test]
    fn test_report_counts() {
        let result = Preprocessor::new().run(&raw_table());
        let report = result.report;

        assert_eq!(report.rows, 3);
        assert_eq!(report.columns_in, 9);
        assert_eq!(report.columns_out, 6);
        assert_eq!(
            report.dropped_columns,
            vec![CUSTOMER_ID, LAT_LONG, CHURN_CATEGORY, CHURN_REASON]
        );
        assert_eq!(report.filled_cells, 1);
        assert_eq!(report.coerced_to_zero, 1);
        assert_eq!(report.encoded.len(), 2);
        assert_eq!(report.encoded[0].column, "Gender");
        assert_eq!(report.encoded[0].reference.as_deref(), Some("Female"));
        assert_eq!(report.encoded[1].reference.as_deref(), Some("Cable"));
    }

    #[test]
    fn test_stages_skip_absent_columns() {
        let table = Table::from_pairs([("Age", vec![json!(20), json!(null)])]).unwrap();

        let result = Preprocessor::new().run(&table);

        assert_eq!(result.table, table);
        assert!(result.report.dropped_columns.is_empty());
        assert_eq!(result.report.filled_cells, 0);
        assert!(result.report.encoded.is_empty());
    }

    #[test]
    fn test_table_without_columns_keeps_row_count() {
        let table = Table::from_pairs([(CUSTOMER_ID, vec![json!("a"), json!("b")])]).unwrap();

        let output = preprocess(&table);

        assert_eq!(output.column_count(), 0);
        assert_eq!(output.row_count(), 2);
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(&json!(" 42.5 ")), Some(42.5));
        assert_eq!(parse_decimal(&json!(7)), Some(7.0));
        assert_eq!(parse_decimal(&json!(true)), Some(1.0));
        assert_eq!(parse_decimal(&json!("")), None);
        assert_eq!(parse_decimal(&json!("1,234")), None);
        assert_eq!(parse_decimal(&json!("NaN")), None);
        assert_eq!(parse_decimal(&json!("inf")), None);
        assert_eq!(parse_decimal(&json!(null)), None);
    }

    #[test]
    fn test_indicator_name_collision_gets_suffix() {
        let table = Table::from_pairs([
            ("Plan", vec![json!("A"), json!("B")]),
            ("Plan_B", vec![json!(1), json!(2)]),
        ])
        .unwrap();

        let output = preprocess(&table);

        assert_eq!(output.column_names(), vec!["Plan_B", "Plan_B#1"]);
    }

    #[test]
    fn test_reference_category_is_smallest_label() {
        let result = Preprocessor::new().run(&raw_table());

        assert!(result.table.contains("Gender_Male"));
        assert!(result.table.contains("Internet Type_Fiber Optic"));
        assert!(result.table.contains("Internet Type_No Internet Service"));
        assert!(!result.table.contains("Internet Type_Cable"));

        let table = Table::from_pairs([("Gender", vec![json!("Male"), json!("Female")])]).unwrap();
        let output = preprocess(&table);
        assert_eq!(output.column_names(), vec!["Gender_Male"]);
    }

    #[test]
    fn test_boolean_column_with_missing_cells_is_expanded() {
        let table = Table::from_pairs([
            ("Paperless", vec![json!(true), json!(null), json!(false)]),
            (CHURN, vec![json!("No"), json!("Yes"), json!("No")]),
        ])
        .unwrap();

        let result = Preprocessor::new().run(&table);

        assert_eq!(result.table.column_names(), vec![CHURN, "Paperless_true"]);
        assert_eq!(
            result.table.column("Paperless_true").unwrap().values,
            vec![json!(true), json!(false), json!(false)]
        );
        assert_eq!(result.report.encoded[0].reference.as_deref(), Some("false"));
    }

    #[test]
    fn test_complete_boolean_column_passes_through() {
        let table = Table::from_pairs([("Paperless", vec![json!(true), json!(false)])]).unwrap();

        assert_eq!(preprocess(&table), table);
    }
}
