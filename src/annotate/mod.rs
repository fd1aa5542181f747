//! Bulk annotation of resolved rows
//!
//! Enrichment runs once per input, after every row is assembled: the
//! distinct coordinate keys go to the annotation source in a single batch,
//! and the batch result is mapped back onto the rows by key.
//!
//! [`AnnotationSource`] is the seam between the two phases. [`ExacClient`]
//! queries the ExAC REST API; [`InMemorySource`] serves canned entries.

pub mod exac;

pub use exac::{parse_bulk_response, ExacClient};

use crate::core::config::EnrichmentPolicy;
use crate::core::error::LookupResult;
use crate::core::row::{RowAnnotation, VariantRow};
use indexmap::IndexSet;
use std::cell::Cell;
use std::collections::HashMap;

/// Metadata returned for one coordinate key; every field may be absent
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationEntry {
    /// Consequence terms in response order
    pub consequences: Option<Vec<String>>,
    pub allele_freq: Option<f64>,
    pub gene_ids: Option<Vec<String>>,
    pub transcript_ids: Option<Vec<String>>,
}

impl AnnotationEntry {
    fn to_row_annotation(&self) -> RowAnnotation {
        RowAnnotation {
            consequence: self.consequences.as_ref().map(|c| c.join(",")),
            allele_freq: self.allele_freq,
            gene_ids: self.gene_ids.as_ref().map(|g| g.join(",")),
            transcript_ids: self.transcript_ids.as_ref().map(|t| t.join(",")),
        }
    }
}

/// Batch lookup result keyed by coordinate key
pub type AnnotationResult = HashMap<String, AnnotationEntry>;

/// Anything that can annotate a batch of coordinate keys in one call
pub trait AnnotationSource {
    fn lookup(&self, keys: &[String]) -> LookupResult<AnnotationResult>;
}

/// Annotation source backed by a fixed map
#[derive(Debug, Default)]
pub struct InMemorySource {
    entries: AnnotationResult,
    lookups: Cell<usize>,
}

impl InMemorySource {
    pub fn new(entries: AnnotationResult) -> Self {
        Self {
            entries,
            lookups: Cell::new(0),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: AnnotationEntry) {
        self.entries.insert(key.into(), entry);
    }

    /// Number of batch lookups served so far
    pub fn lookups(&self) -> usize {
        self.lookups.get()
    }
}

impl AnnotationSource for InMemorySource {
    fn lookup(&self, keys: &[String]) -> LookupResult<AnnotationResult> {
        self.lookups.set(self.lookups.get() + 1);
        Ok(keys
            .iter()
            .filter_map(|k| self.entries.get(k).map(|e| (k.clone(), e.clone())))
            .collect())
    }
}

/// Distinct coordinate keys of all rows, in first-seen order
pub fn coordinate_keys(rows: &[VariantRow]) -> Vec<String> {
    rows.iter()
        .map(VariantRow::coordinate_key)
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

/// Attach batch results to rows; keys missing from the batch stay NA
pub fn enrich(rows: Vec<VariantRow>, result: &AnnotationResult) -> Vec<VariantRow> {
    rows.into_iter()
        .map(|mut row| {
            row.annotation = result
                .get(&row.coordinate_key())
                .map(AnnotationEntry::to_row_annotation)
                .unwrap_or_default();
            row
        })
        .collect()
}

/// Query the source once for all rows, then enrich them
///
/// With [`EnrichmentPolicy::Degrade`] a failed lookup leaves every row's
/// enrichment columns as NA instead of failing.
pub fn enrich_rows<S: AnnotationSource + ?Sized>(
    rows: Vec<VariantRow>,
    source: &S,
    policy: EnrichmentPolicy,
) -> LookupResult<Vec<VariantRow>> {
    let keys = coordinate_keys(&rows);
    log::info!("Requesting annotations for {} coordinate keys", keys.len());

    match source.lookup(&keys) {
        Ok(result) => {
            log::info!("Annotation source returned {} entries", result.len());
            Ok(enrich(rows, &result))
        }
        Err(e) => match policy {
            EnrichmentPolicy::Required => Err(e),
            EnrichmentPolicy::Degrade => {
                log::warn!("{}; writing rows without annotations", e);
                Ok(enrich(rows, &AnnotationResult::new()))
            }
        },
    }
}
