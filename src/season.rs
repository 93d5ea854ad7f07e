//! Restricts the header table to the most recent season.
//!
//! Ordering rule: when every non-empty season value parses as a finite number
//! the comparison (and the equality test) is numeric, so `2023` and `2023.0`
//! name the same season. As soon as one value does not parse, every value is
//! compared as a plain string in byte order; `"2010-11"` then sorts after
//! `"2009"` but `"9"` sorts after `"10"`.

use std::{cmp::Ordering, fmt};

use anyhow::Result;
use log::{info, warn};

use crate::{
    error::ResolveError,
    fields::{Field, TableKind},
    frame::CanonicalTable,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeasonOrdering {
    Numeric,
    Lexicographic,
}

impl fmt::Display for SeasonOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonOrdering::Numeric => f.write_str("numeric"),
            SeasonOrdering::Lexicographic => f.write_str("lexicographic"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SeasonKey<'a> {
    Number(f64),
    Text(&'a str),
}

impl SeasonKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SeasonKey::Number(a), SeasonKey::Number(b)) => a.total_cmp(b),
            (SeasonKey::Text(a), SeasonKey::Text(b)) => a.cmp(b),
            (SeasonKey::Number(_), SeasonKey::Text(_)) => Ordering::Less,
            (SeasonKey::Text(_), SeasonKey::Number(_)) => Ordering::Greater,
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn season_ordering<'a>(values: impl IntoIterator<Item = &'a str>) -> SeasonOrdering {
    let mut values = values.into_iter().filter(|v| !v.is_empty()).peekable();
    if values.peek().is_none() {
        return SeasonOrdering::Lexicographic;
    }
    if values.all(|v| parse_number(v).is_some()) {
        SeasonOrdering::Numeric
    } else {
        SeasonOrdering::Lexicographic
    }
}

fn key(value: &str, ordering: SeasonOrdering) -> SeasonKey<'_> {
    match ordering {
        SeasonOrdering::Numeric => parse_number(value)
            .map(SeasonKey::Number)
            .unwrap_or(SeasonKey::Text(value)),
        SeasonOrdering::Lexicographic => SeasonKey::Text(value),
    }
}

fn season_cell(row: &[String], column: usize) -> &str {
    row.get(column).map(|s| s.as_str()).unwrap_or("")
}

#[derive(Debug, Clone)]
pub struct SeasonSelection {
    /// Source text of the first row carrying the maximum season; `None` when
    /// no row has a season value.
    pub season: Option<String>,
    pub ordering: SeasonOrdering,
    pub header: CanonicalTable,
}

pub fn filter_latest_season(header: CanonicalTable) -> Result<SeasonSelection> {
    let column = header.column(Field::Season).ok_or_else(|| {
        ResolveError::MissingSeasonColumn {
            table: TableKind::Header,
            candidates: Vec::new(),
            available: header.headers(),
        }
    })?;
    let ordering = season_ordering(header.rows.iter().map(|row| season_cell(row, column)));
    let latest = header
        .rows
        .iter()
        .map(|row| season_cell(row, column))
        .filter(|v| !v.is_empty())
        .fold(None::<&str>, |best, value| match best {
            Some(current)
                if key(current, ordering).compare(&key(value, ordering)) != Ordering::Less =>
            {
                Some(current)
            }
            _ => Some(value),
        })
        .map(str::to_string);

    let Some(season) = latest else {
        warn!(
            "No season values present in header table; keeping all {} row(s)",
            header.row_count()
        );
        return Ok(SeasonSelection {
            season: None,
            ordering,
            header,
        });
    };

    let target = key(&season, ordering);
    let rows: Vec<Vec<String>> = header
        .rows
        .iter()
        .filter(|row| {
            let value = season_cell(row, column);
            !value.is_empty() && key(value, ordering).compare(&target) == Ordering::Equal
        })
        .cloned()
        .collect();
    info!(
        "Using season: {season} ({ordering} ordering, {} of {} header row(s))",
        rows.len(),
        header.row_count()
    );

    Ok(SeasonSelection {
        season: Some(season),
        ordering,
        header: CanonicalTable {
            fields: header.fields,
            rows,
        },
    })
}
