// In: src/transcode/planner.rs

//! The schema planner.
//!
//! Given the ordered schema of a batch stream, the planner allocates one empty
//! `StorageContainer` per column before any values arrive. Planning inspects
//! only the schema, never the data, and succeeds for every arrow type: anything
//! the catalog does not recognise is planned as a text fallback column.

use arrow::datatypes::Schema;
use serde::{Deserialize, Serialize};

use super::container::StorageContainer;
use crate::frame::Field;
use crate::types::ColumnType;

/// A named, typed column of the incoming stream.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn from_arrow_field(field: &arrow::datatypes::Field) -> Self {
        Self {
            name: field.name().clone(),
            column_type: ColumnType::from_arrow_type(field.data_type()),
        }
    }
}

/// A column spec paired with the container that accumulates its values.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub spec: ColumnSpec,
    pub container: StorageContainer,
}

impl ColumnPlan {
    pub fn new(spec: ColumnSpec) -> Self {
        let container = StorageContainer::for_type(&spec.column_type);
        Self { spec, container }
    }

    /// Finalizes the column into an immutable output field of the same name.
    pub fn into_field(self) -> Field {
        Field::new(self.spec.name, self.container.into_values())
    }
}

/// Extracts the ordered column specs from an arrow schema.
pub fn column_specs(schema: &Schema) -> Vec<ColumnSpec> {
    schema
        .fields()
        .iter()
        .map(|field| ColumnSpec::from_arrow_field(field))
        .collect()
}

/// Plans one empty container per column. Plan `i` always corresponds to schema field `i`.
pub fn plan_columns(schema: &Schema) -> Vec<ColumnPlan> {
    let plans: Vec<ColumnPlan> = column_specs(schema).into_iter().map(ColumnPlan::new).collect();
    for (idx, plan) in plans.iter().enumerate() {
        log::debug!(
            "  - column {}: '{}' {} -> {}",
            idx,
            plan.spec.name,
            plan.spec.column_type,
            plan.container.storage_kind()
        );
    }
    plans
}
