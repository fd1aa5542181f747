//! Output row model

use crate::core::resolver::VariantType;

/// Sentinel written for any enrichment value the annotation source lacks
pub const NA: &str = "NA";

/// Enrichment values attached to a row after the bulk lookup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowAnnotation {
    /// Consequence terms, comma-joined
    pub consequence: Option<String>,
    pub allele_freq: Option<f64>,
    /// Ensembl gene ids, comma-joined
    pub gene_ids: Option<String>,
    /// Ensembl transcript ids, comma-joined
    pub transcript_ids: Option<String>,
}

impl RowAnnotation {
    pub fn consequence_or_na(&self) -> &str {
        self.consequence.as_deref().unwrap_or(NA)
    }

    pub fn allele_freq_or_na(&self) -> String {
        self.allele_freq
            .map(format_float)
            .unwrap_or_else(|| NA.to_string())
    }

    pub fn gene_ids_or_na(&self) -> &str {
        self.gene_ids.as_deref().unwrap_or(NA)
    }

    pub fn transcript_ids_or_na(&self) -> &str {
        self.transcript_ids.as_deref().unwrap_or(NA)
    }
}

/// One resolved variant record
#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub chrom: String,
    /// 1-based, as given in the input
    pub pos: u64,
    pub ref_allele: String,
    pub alt_allele: String,
    pub variant_type: VariantType,
    /// Depth of coverage (INFO `DP`)
    pub depth: u64,
    /// Reads supporting the resolved allele (FORMAT `AO`)
    pub variant_reads: u64,
    /// `variant_reads / depth * 100`, rounded to 3 decimals
    pub variant_reads_pct: f64,
    /// Allele count of the resolved call (INFO `AC`)
    pub allele_count: u64,
    /// Allele frequency of the resolved call (INFO `AF`) scaled by 100
    pub allele_freq_pct: f64,
    pub annotation: RowAnnotation,
}

impl VariantRow {
    /// Key used to query the annotation source: `CHROM-POS-REF-ALT`
    pub fn coordinate_key(&self) -> String {
        coordinate_key(&self.chrom, self.pos, &self.ref_allele, &self.alt_allele)
    }
}

pub fn coordinate_key(chrom: &str, pos: u64, ref_allele: &str, alt_allele: &str) -> String {
    format!("{}-{}-{}-{}", chrom, pos, ref_allele, alt_allele)
}

/// Round to 3 decimal places, ties to even on the exact binary value
pub fn round3(value: f64) -> f64 {
    format!("{:.3}", value).parse().unwrap_or(value)
}

/// Shortest round-trip text for a float, switching to `1.65e-05` style
/// outside `1e-4 <= |value| < 1e16`
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => match e.parse::<i32>() {
            Ok(e) => (m, e),
            Err(_) => return value.to_string(),
        },
        None => return value.to_string(),
    };

    if (-4..16).contains(&exponent) {
        let plain = value.to_string();
        if plain.contains('.') {
            plain
        } else {
            format!("{}.0", plain)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}
