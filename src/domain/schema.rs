//! Column roles for the churn table.
//!
//! The fixed column names are declared here. Any other column gets its role
//! from a single inspection of its cells in [`Schema::resolve`]: text anywhere
//! makes it categorical, and so do booleans mixed with missing cells, since
//! those cannot pass through as a numeric column. Everything else passes
//! through as numeric.

use crate::domain::model::{Column, Table};

pub const CHURN_CATEGORY: &str = "Churn Category";
pub const CHURN_REASON: &str = "Churn Reason";
pub const CUSTOMER_ID: &str = "Customer ID";
pub const LAT_LONG: &str = "Lat Long";
pub const INTERNET_TYPE: &str = "Internet Type";
pub const TOTAL_CHARGES: &str = "Total Charges";
pub const CHURN: &str = "Churn";

pub const NO_INTERNET_SERVICE: &str = "No Internet Service";

/// Columns never carried into the output.
pub const DROPPED_COLUMNS: [&str; 4] = [CHURN_CATEGORY, CHURN_REASON, CUSTOMER_ID, LAT_LONG];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Identifier or target-leaking column, removed in the first stage.
    Dropped,
    /// Categorical column whose missing cells are filled before expansion.
    ImputedCategorical { fill: &'static str },
    /// Numbers stored as text; unparseable cells become zero.
    NumericText,
    /// Target label, kept as-is.
    Label,
    Categorical,
    Numeric,
}

impl ColumnRole {
    pub fn is_categorical(&self) -> bool {
        matches!(
            self,
            ColumnRole::Categorical | ColumnRole::ImputedCategorical { .. }
        )
    }
}

fn declared_role(name: &str) -> Option<ColumnRole> {
    match name {
        CHURN_CATEGORY | CHURN_REASON | CUSTOMER_ID | LAT_LONG => Some(ColumnRole::Dropped),
        INTERNET_TYPE => Some(ColumnRole::ImputedCategorical {
            fill: NO_INTERNET_SERVICE,
        }),
        TOTAL_CHARGES => Some(ColumnRole::NumericText),
        CHURN => Some(ColumnRole::Label),
        _ => None,
    }
}

fn inferred_role(column: &Column) -> ColumnRole {
    let has_text = column.values.iter().any(|v| v.is_string());
    let nullable_bool = column.values.iter().any(|v| v.is_boolean())
        && column.values.iter().any(|v| v.is_null());

    if has_text || nullable_bool {
        ColumnRole::Categorical
    } else {
        ColumnRole::Numeric
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    roles: Vec<(String, ColumnRole)>,
}

impl Schema {
    pub fn resolve(table: &Table) -> Self {
        let roles = table
            .columns()
            .iter()
            .map(|column| {
                let role = declared_role(&column.name).unwrap_or_else(|| inferred_role(column));
                (column.name.clone(), role)
            })
            .collect();

        Self { roles }
    }

    pub fn role(&self, name: &str) -> Option<ColumnRole> {
        self.roles
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, role)| *role)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnRole)> {
        self.roles.iter().map(|(n, r)| (n.as_str(), *r))
    }

    pub fn dropped(&self) -> Vec<&str> {
        self.names_where(|r| r == ColumnRole::Dropped)
    }

    /// Columns to impute, with their fill value.
    pub fn imputed(&self) -> Vec<(&str, &'static str)> {
        self.iter()
            .filter_map(|(name, role)| match role {
                ColumnRole::ImputedCategorical { fill } => Some((name, fill)),
                _ => None,
            })
            .collect()
    }

    pub fn numeric_text(&self) -> Vec<&str> {
        self.names_where(|r| r == ColumnRole::NumericText)
    }

    pub fn categorical(&self) -> Vec<&str> {
        self.names_where(|r| r.is_categorical())
    }

    fn names_where(&self, pred: impl Fn(ColumnRole) -> bool) -> Vec<&str> {
        self.iter()
            .filter(|(_, role)| pred(*role))
            .map(|(name, _)| name)
            .collect()
    }
}
