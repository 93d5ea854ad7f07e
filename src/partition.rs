//! Splits the flat record set into one group per game date.
//!
//! Rows without a date only appear in the aggregate output. Dates sort
//! chronologically when every one of them parses with a supported format and
//! as plain strings otherwise.

use std::collections::{BTreeMap, HashMap};

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::join::{FlatRecord, RecordSet};

pub const DEFAULT_PARTITION_PREFIX: &str = "boxscores_";

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
    "%d-%m-%Y",
    "%d.%m.%Y",
];

pub fn parse_game_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    pub date: &'a str,
    pub records: Vec<&'a FlatRecord>,
}

impl Partition<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn partition_by_date(set: &RecordSet) -> Vec<Partition<'_>> {
    let mut groups: BTreeMap<&str, Vec<&FlatRecord>> = BTreeMap::new();
    for record in &set.records {
        if let Some(date) = record.game_date.as_deref().filter(|d| !d.is_empty()) {
            groups.entry(date).or_default().push(record);
        }
    }

    let mut partitions: Vec<Partition<'_>> = groups
        .into_iter()
        .map(|(date, records)| Partition { date, records })
        .collect();

    let parsed: Option<Vec<NaiveDate>> = partitions
        .iter()
        .map(|partition| parse_game_date(partition.date))
        .collect();
    if let Some(dates) = parsed {
        let mut keyed: Vec<(NaiveDate, Partition<'_>)> = dates.into_iter().zip(partitions).collect();
        // Stable, so two spellings of one day keep their string order.
        keyed.sort_by_key(|(date, _)| *date);
        partitions = keyed.into_iter().map(|(_, partition)| partition).collect();
    }
    partitions
}

/// Replaces characters that would split or disguise a path component.
pub fn safe_partition_key(date: &str) -> String {
    date.replace(['/', '.'], "-")
}

pub fn partition_file_name(prefix: &str, date: &str) -> String {
    format!("{prefix}{}.csv", safe_partition_key(date))
}

/// File name for every partition, refusing distinct dates that would land on
/// the same file.
pub fn assign_file_names<'a, 'p>(
    prefix: &str,
    partitions: &'p [Partition<'a>],
) -> Result<Vec<(String, &'p Partition<'a>)>> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut named = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let name = partition_file_name(prefix, partition.date);
        if let Some(previous) = seen.insert(name.clone(), partition.date) {
            bail!(
                "Game dates '{previous}' and '{}' both map to partition file '{name}'",
                partition.date
            );
        }
        named.push((name, partition));
    }
    Ok(named)
}
