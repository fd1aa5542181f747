//! Variant type tally

use crate::core::resolver::VariantType;
use indexmap::IndexMap;
use std::fmt;

/// Counts of resolved variant types, in order of first occurrence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantSummary {
    counts: IndexMap<VariantType, usize>,
    total: usize,
}

impl VariantSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, variant_type: VariantType) {
        *self.counts.entry(variant_type).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of distinct types seen
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn count(&self, variant_type: VariantType) -> usize {
        self.counts.get(&variant_type).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VariantType, usize)> + '_ {
        self.counts.iter().map(|(t, n)| (*t, *n))
    }
}

impl FromIterator<VariantType> for VariantSummary {
    fn from_iter<I: IntoIterator<Item = VariantType>>(iter: I) -> Self {
        let mut summary = Self::new();
        for t in iter {
            summary.add(t);
        }
        summary
    }
}

impl fmt::Display for VariantSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "There were a total of {}, variants identified, composed of {}, types",
            self.total,
            self.distinct()
        )?;
        for (t, n) in self.iter() {
            write!(f, "\n{}\t:\t{}", t, n)?;
        }
        Ok(())
    }
}
