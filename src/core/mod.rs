//! Core record handling
//!
//! Field parsing, most-deleterious resolution, the row model, run
//! configuration, input opening and the run summary.

pub mod config;
pub mod error;
pub mod fields;
pub mod io;
pub mod resolver;
pub mod row;
pub mod summary;

pub use config::{AnnotationConfig, EnrichmentPolicy, PipelineConfig, RecordPolicy, DEFAULT_EXAC_URL};
pub use error::{
    AnnotationError, LookupResult, RecordError, RecordResult, Result, Vcf2ExacError,
};
pub use fields::{parse_format, parse_metadata, FormatMap, MetadataMap, RequiredInfo};
pub use io::{detect_compression, open_input, Compression, RecordLines, DEFAULT_BUFFER_SIZE};
pub use resolver::{CandidateSet, ResolvedCall, Resolver, VariantType};
pub use row::{coordinate_key, RowAnnotation, VariantRow, NA};
pub use summary::VariantSummary;
