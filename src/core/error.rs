//! Error types for vcf2exac
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for a vcf2exac run
#[derive(Debug, Error)]
pub enum Vcf2ExacError {
    /// A single input record could not be turned into a row
    #[error("Invalid record at line {line}: {source} (line: {content})")]
    Record {
        line: usize,
        content: String,
        #[source]
        source: RecordError,
    },

    /// Annotation lookup errors
    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    /// Output table errors
    #[error("Table error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while assembling one row from one record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    /// Metadata item without `=`
    #[error("Malformed metadata field '{0}': expected key=value")]
    MalformedField(String),

    /// Format names and sample values differ in length
    #[error("Format has {names} fields but sample has {values} values")]
    FieldCountMismatch { names: usize, values: usize },

    /// Variant type outside the del/ins/complex/mnp/snp vocabulary
    #[error("Unknown variant type: {0}")]
    UnknownVariantType(String),

    /// Fewer tab-separated fields than the column schema requires
    #[error("Too few fields: expected at least {expected}, found {found}")]
    TruncatedRecord { expected: usize, found: usize },

    /// A required metadata or format key is absent
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// Failed to parse a numeric value
    #[error("Invalid number in field {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// Candidate type, count and frequency lists differ in length
    #[error("Candidate lists differ in length: {types} types, {counts} counts, {freqs} frequencies")]
    CandidateLengthMismatch {
        types: usize,
        counts: usize,
        freqs: usize,
    },

    /// No candidates to resolve
    #[error("Empty candidate set")]
    EmptyCandidates,

    /// Depth of coverage is zero, so no read percentage exists
    #[error("Depth of coverage is zero")]
    ZeroDepth,
}

/// Errors that can occur while querying the annotation source
#[derive(Debug, Error)]
pub enum AnnotationError {
    /// The service could not be reached
    #[error("Annotation lookup failed after {attempts} attempt(s): {message}")]
    Transport { attempts: u32, message: String },

    /// The service answered with a non-success status
    #[error("Annotation lookup returned HTTP {status} after {attempts} attempt(s)")]
    Status { attempts: u32, status: u16 },

    /// The response body was not the expected JSON
    #[error("Unparseable annotation response: {0}")]
    InvalidResponse(String),

    /// HTTP client could not be built
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

impl AnnotationError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            AnnotationError::Transport { .. } => true,
            AnnotationError::Status { status, .. } => *status == 429 || *status >= 500,
            AnnotationError::InvalidResponse(_) | AnnotationError::Client(_) => false,
        }
    }
}

/// Result type alias for vcf2exac operations
pub type Result<T> = std::result::Result<T, Vcf2ExacError>;

/// Result type alias for record assembly
pub type RecordResult<T> = std::result::Result<T, RecordError>;

/// Result type alias for annotation lookups
pub type LookupResult<T> = std::result::Result<T, AnnotationError>;
