//! INFO and FORMAT field extraction
//!
//! Parses the semicolon-delimited metadata blob (`TYPE=snp;DP=100;...`) and
//! zips colon-delimited FORMAT names against one sample column.

use crate::core::error::{RecordError, RecordResult};
use std::collections::HashMap;

/// Parsed `key=value` metadata blob
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataMap {
    entries: HashMap<String, String>,
}

impl MetadataMap {
    /// Raw value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for a key that must be present
    pub fn require(&self, key: &'static str) -> RecordResult<&str> {
        self.get(key).ok_or(RecordError::MissingRequiredField(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse a metadata blob into a key/value map
///
/// Each `;`-separated item is split on its first `=`. An item without `=`
/// is rejected. A repeated key keeps its last value.
pub fn parse_metadata(blob: &str) -> RecordResult<MetadataMap> {
    let mut entries = HashMap::new();

    for item in blob.split(';') {
        match item.split_once('=') {
            Some((key, value)) => {
                entries.insert(key.to_string(), value.to_string());
            }
            None => return Err(RecordError::MalformedField(item.to_string())),
        }
    }

    Ok(MetadataMap { entries })
}

/// FORMAT names zipped with one sample's values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatMap {
    entries: HashMap<String, String>,
}

impl FormatMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for a format key that must be present
    pub fn require(&self, key: &'static str) -> RecordResult<&str> {
        self.get(key).ok_or(RecordError::MissingRequiredField(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pair colon-delimited FORMAT names with a colon-delimited sample column
pub fn parse_format(format_names: &str, sample_values: &str) -> RecordResult<FormatMap> {
    let names: Vec<&str> = format_names.split(':').collect();
    let values: Vec<&str> = sample_values.split(':').collect();

    if names.len() != values.len() {
        return Err(RecordError::FieldCountMismatch {
            names: names.len(),
            values: values.len(),
        });
    }

    let entries = names
        .into_iter()
        .zip(values)
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Ok(FormatMap { entries })
}

/// The INFO fields the row assembler depends on
///
/// `TYPE`, `AC` and `AF` stay as raw comma lists since their arity decides
/// whether resolution is needed at all.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredInfo<'a> {
    pub types: &'a str,
    pub depth: u64,
    pub allele_counts: &'a str,
    pub allele_freqs: &'a str,
}

impl<'a> RequiredInfo<'a> {
    pub fn from_metadata(meta: &'a MetadataMap) -> RecordResult<Self> {
        let types = meta.require("TYPE")?;
        let depth_raw = meta.require("DP")?;
        let allele_counts = meta.require("AC")?;
        let allele_freqs = meta.require("AF")?;

        let depth = parse_number("DP", depth_raw)?;

        Ok(Self {
            types,
            depth,
            allele_counts,
            allele_freqs,
        })
    }

    /// Whether more than one candidate type is reported
    pub fn is_multi_type(&self) -> bool {
        self.types.contains(',')
    }
}

/// Parse a numeric field, naming the field on failure
pub fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> RecordResult<T> {
    value.trim().parse().map_err(|_| RecordError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Parse every entry of a comma-separated numeric list
pub fn parse_number_list<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> RecordResult<Vec<T>> {
    value.split(',').map(|item| parse_number(field, item)).collect()
}
