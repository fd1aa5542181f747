//! vcf2exac - Variant table builder with ExAC annotation
//!
//! Reads freebayes-style VCF records, resolves each position with several
//! candidate variant types down to its most deleterious call, annotates the
//! resulting rows against the ExAC bulk variant API in a single request, and
//! writes a tab-separated table.
//!
//! # Example
//!
//! ```ignore
//! use vcf2exac::{read_variant_rows, enrich_rows, write_table, ExacClient, PipelineConfig};
//!
//! let config = PipelineConfig::default();
//! let mut resolver = config.resolver();
//! let batch = read_variant_rows("sample.vcf", &mut resolver, config.record_policy)?;
//!
//! let client = ExacClient::new(config.annotation.clone())?;
//! let rows = enrich_rows(batch.rows, &client, config.annotation.policy)?;
//! write_table("out/sample_parsedVCF.tsv", &rows)?;
//! ```

pub mod annotate;
pub mod core;
pub mod formats;

// Re-export commonly used types
pub use crate::annotate::{enrich_rows, AnnotationEntry, AnnotationSource, ExacClient, InMemorySource};
pub use crate::core::{
    AnnotationConfig, AnnotationError, CandidateSet, EnrichmentPolicy, PipelineConfig,
    RecordError, RecordPolicy, ResolvedCall, Resolver, Vcf2ExacError, VariantRow,
    VariantSummary, VariantType,
};
pub use crate::formats::{output_path, read_table, read_variant_rows, write_table, TableRecord};
