//! Column resolution: matching canonical fields against the labels a provider
//! actually used.
//!
//! Resolution is a pure function of the available labels and the ordered
//! candidate list. The first candidate present wins; when two candidates are
//! both present the earlier one is chosen and the later one is ignored.

use log::debug;
use serde::Serialize;

use crate::{
    error::ResolveError,
    fields::{Field, FieldSpec, TableKind},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "label", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(String),
    Absent,
}

impl Resolution {
    pub fn label(&self) -> Option<&str> {
        match self {
            Resolution::Resolved(label) => Some(label.as_str()),
            Resolution::Absent => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }
}

pub fn resolve_field(
    table: TableKind,
    available: &[String],
    spec: &FieldSpec,
) -> Result<Resolution, ResolveError> {
    if let Some(label) = spec
        .candidates
        .iter()
        .find(|candidate| available.iter().any(|label| label == *candidate))
    {
        return Ok(Resolution::Resolved(label.clone()));
    }
    if !spec.required {
        return Ok(Resolution::Absent);
    }
    if spec.field == Field::Season {
        return Err(ResolveError::MissingSeasonColumn {
            table,
            candidates: spec.candidates.clone(),
            available: available.to_vec(),
        });
    }
    Err(ResolveError::MissingColumn {
        table,
        field: spec.field,
        candidates: spec.candidates.clone(),
        available: available.to_vec(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub field: Field,
    pub required: bool,
    pub resolution: Resolution,
}

/// Canonical view of one table's columns, in field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMap {
    pub table: TableKind,
    pub fields: Vec<ResolvedField>,
}

impl ColumnMap {
    pub fn label(&self, field: Field) -> Option<&str> {
        self.fields
            .iter()
            .find(|entry| entry.field == field)
            .and_then(|entry| entry.resolution.label())
    }

    pub fn is_resolved(&self, field: Field) -> bool {
        self.label(field).is_some()
    }

    /// Resolved `(field, source label)` pairs in declaration order.
    pub fn resolved(&self) -> impl Iterator<Item = (Field, &str)> {
        self.fields
            .iter()
            .filter_map(|entry| entry.resolution.label().map(|label| (entry.field, label)))
    }

    pub fn report_rows(&self) -> Vec<Vec<String>> {
        self.fields
            .iter()
            .map(|entry| {
                vec![
                    self.table.to_string(),
                    entry.field.to_string(),
                    if entry.required { "yes" } else { "no" }.to_string(),
                    entry
                        .resolution
                        .label()
                        .map(str::to_string)
                        .unwrap_or_else(|| "(absent)".to_string()),
                ]
            })
            .collect()
    }
}

/// Resolves every spec of a table, stopping at the first required field that
/// cannot be found.
pub fn resolve_table(
    table: TableKind,
    available: &[String],
    specs: &[FieldSpec],
) -> Result<ColumnMap, ResolveError> {
    let mut fields = Vec::with_capacity(specs.len());
    for spec in specs {
        let resolution = resolve_field(table, available, spec)?;
        match &resolution {
            Resolution::Resolved(label) => {
                debug!("{table}: {} <- '{label}'", spec.field)
            }
            Resolution::Absent => debug!("{table}: {} not present", spec.field),
        }
        fields.push(ResolvedField {
            field: spec.field,
            required: spec.required,
            resolution,
        });
    }
    Ok(ColumnMap { table, fields })
}
