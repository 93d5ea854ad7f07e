//! Projects a raw provider table onto its resolved canonical columns.

use anyhow::{Result, anyhow};
use itertools::Itertools;
use log::debug;

use crate::{
    fields::{FieldSpec, TableKind},
    frame::{CanonicalTable, RawTable},
    resolve::{ColumnMap, resolve_table},
};

/// Keeps only the resolved columns, renamed to canonical fields in the order
/// the field specs were declared. With `distinct`, rows identical across all
/// selected columns collapse to their first occurrence.
pub fn normalize(raw: &RawTable, map: &ColumnMap, distinct: bool) -> Result<CanonicalTable> {
    let mut fields = Vec::new();
    let mut indices = Vec::new();
    for (field, label) in map.resolved() {
        let idx = raw.column_index(label).ok_or_else(|| {
            anyhow!("Resolved column '{label}' is not present in {} table", map.table)
        })?;
        fields.push(field);
        indices.push(idx);
    }

    let projected = raw.rows.iter().map(|row| {
        indices
            .iter()
            .map(|idx| row.get(*idx).cloned().unwrap_or_default())
            .collect::<Vec<_>>()
    });
    let rows: Vec<Vec<String>> = if distinct {
        projected.unique().collect()
    } else {
        projected.collect()
    };
    if distinct && rows.len() != raw.rows.len() {
        debug!(
            "{}: collapsed {} duplicate row(s)",
            map.table,
            raw.rows.len() - rows.len()
        );
    }

    Ok(CanonicalTable { fields, rows })
}

/// Resolves and normalizes in one step, de-duplicating dimension tables.
pub fn resolve_and_normalize(
    raw: &RawTable,
    table: TableKind,
    specs: &[FieldSpec],
) -> Result<(ColumnMap, CanonicalTable)> {
    let map = resolve_table(table, &raw.headers, specs)?;
    let normalized = normalize(raw, &map, table.deduplicates())?;
    Ok((map, normalized))
}
