//! VCF record assembly
//!
//! Turns one tab-separated variant line into one [`VariantRow`]:
//! INFO gives the candidate types, depth, allele counts and frequencies;
//! the alternate sample's FORMAT column gives the supporting read count.
//! Lines reporting several candidate types go through the [`Resolver`].

use crate::core::config::RecordPolicy;
use crate::core::error::{RecordError, RecordResult, Result, Vcf2ExacError};
use crate::core::fields::{self, FormatMap, RequiredInfo};
use crate::core::io::{open_input, RecordLines};
use crate::core::resolver::{Resolver, VariantType};
use crate::core::row::{round3, RowAnnotation, VariantRow};
use memchr::memchr;
use rand::Rng;
use std::io::BufRead;
use std::path::Path;

/// Column positions (0-based) the assembler reads
pub mod columns {
    pub const CHROM: usize = 0;
    pub const POS: usize = 1;
    pub const REF: usize = 3;
    pub const ALT: usize = 4;
    pub const INFO: usize = 7;
    pub const FORMAT: usize = 8;
    pub const REF_SAMPLE: usize = 9;
    pub const ALT_SAMPLE: usize = 10;

    /// Fields a record must have
    pub const REQUIRED: usize = ALT_SAMPLE + 1;
}

/// Zero-copy view over the columns of one variant line
pub struct VariantRecordView<'a> {
    line: &'a str,
    /// Field boundaries (start, end)
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> VariantRecordView<'a> {
    /// Split a line on tabs; fails if fewer than 11 fields are present
    pub fn parse(line: &'a str) -> RecordResult<Self> {
        let bytes = line.as_bytes();
        let mut field_bounds = Vec::with_capacity(columns::REQUIRED);
        let mut start = 0;

        while let Some(tab) = memchr(b'\t', &bytes[start..]) {
            field_bounds.push((start, start + tab));
            start += tab + 1;
        }
        // Last field
        field_bounds.push((start, bytes.len()));

        if field_bounds.len() < columns::REQUIRED {
            return Err(RecordError::TruncatedRecord {
                expected: columns::REQUIRED,
                found: field_bounds.len(),
            });
        }

        Ok(Self { line, field_bounds })
    }

    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Get field by index
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.field_bounds
            .get(index)
            .map(|&(start, end)| &self.line[start..end])
    }

    fn column(&self, index: usize) -> &'a str {
        // Every schema column is below REQUIRED, checked in parse()
        self.field(index).unwrap_or("")
    }

    pub fn chrom(&self) -> &'a str {
        self.column(columns::CHROM)
    }

    pub fn pos(&self) -> RecordResult<u64> {
        fields::parse_number("POS", self.column(columns::POS))
    }

    pub fn ref_allele(&self) -> &'a str {
        self.column(columns::REF)
    }

    pub fn alt_allele(&self) -> &'a str {
        self.column(columns::ALT)
    }

    pub fn info(&self) -> &'a str {
        self.column(columns::INFO)
    }

    pub fn format(&self) -> &'a str {
        self.column(columns::FORMAT)
    }

    pub fn ref_sample(&self) -> &'a str {
        self.column(columns::REF_SAMPLE)
    }

    pub fn alt_sample(&self) -> &'a str {
        self.column(columns::ALT_SAMPLE)
    }
}

/// Assemble one row from one non-header line
pub fn assemble_row<R: Rng>(line: &str, resolver: &mut Resolver<R>) -> RecordResult<VariantRow> {
    let view = VariantRecordView::parse(line)?;
    let pos = view.pos()?;

    let meta = fields::parse_metadata(view.info())?;
    let info = RequiredInfo::from_metadata(&meta)?;

    // The reference sample is validated against FORMAT but not reported
    fields::parse_format(view.format(), view.ref_sample())?;
    let alt_format = fields::parse_format(view.format(), view.alt_sample())?;

    let call = if info.is_multi_type() {
        let resolved = resolver.resolve_lists(info.types, info.allele_counts, info.allele_freqs)?;
        Call {
            variant_type: resolved.variant_type,
            allele_count: resolved.allele_count,
            allele_freq: resolved.allele_freq,
            variant_reads: allele_observations_at(&alt_format, resolved.index)?,
        }
    } else {
        Call {
            variant_type: info.types.parse::<VariantType>()?,
            allele_count: fields::parse_number("AC", info.allele_counts)?,
            allele_freq: fields::parse_number("AF", info.allele_freqs)?,
            variant_reads: fields::parse_number("AO", alt_format.require("AO")?)?,
        }
    };

    if info.depth == 0 {
        return Err(RecordError::ZeroDepth);
    }
    let variant_reads_pct = round3(call.variant_reads as f64 / info.depth as f64 * 100.0);

    Ok(VariantRow {
        chrom: view.chrom().to_string(),
        pos,
        ref_allele: view.ref_allele().to_string(),
        alt_allele: view.alt_allele().to_string(),
        variant_type: call.variant_type,
        depth: info.depth,
        variant_reads: call.variant_reads,
        variant_reads_pct,
        allele_count: call.allele_count,
        allele_freq_pct: call.allele_freq * 100.0,
        annotation: RowAnnotation::default(),
    })
}

struct Call {
    variant_type: VariantType,
    allele_count: u64,
    allele_freq: f64,
    variant_reads: u64,
}

/// Supporting read count at a resolved candidate index of `AO`
fn allele_observations_at(format: &FormatMap, index: usize) -> RecordResult<u64> {
    let observations = format.require("AO")?;
    let value = observations
        .split(',')
        .nth(index)
        .ok_or_else(|| RecordError::InvalidNumber {
            field: "AO",
            value: observations.to_string(),
        })?;
    fields::parse_number("AO", value)
}

/// Record counts for one input file
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssemblyStats {
    /// Non-header, non-blank lines seen
    pub total: usize,
    pub assembled: usize,
    pub skipped: usize,
}

/// Rows assembled from one input, in input order
#[derive(Debug, Default, Clone)]
pub struct RowBatch {
    pub rows: Vec<VariantRow>,
    pub stats: AssemblyStats,
}

/// Read and assemble every record of a (possibly compressed) input file
pub fn read_variant_rows<P: AsRef<Path>, R: Rng>(
    input: P,
    resolver: &mut Resolver<R>,
    policy: RecordPolicy,
) -> Result<RowBatch> {
    log::info!("Reading variant records from {:?}", input.as_ref());
    let reader = open_input(input.as_ref())?;
    read_variant_rows_from(reader, resolver, policy)
}

/// Assemble every record from a reader
pub fn read_variant_rows_from<B: BufRead, R: Rng>(
    reader: B,
    resolver: &mut Resolver<R>,
    policy: RecordPolicy,
) -> Result<RowBatch> {
    let mut lines = RecordLines::new(reader);
    let mut batch = RowBatch::default();
    let mut line_number = 0;

    while let Some(line) = lines.next_line() {
        let line = line?;
        line_number += 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        batch.stats.total += 1;
        match assemble_row(line, resolver) {
            Ok(row) => {
                batch.rows.push(row);
                batch.stats.assembled += 1;
            }
            Err(source) => {
                let content: String = line.chars().take(100).collect();
                match policy {
                    RecordPolicy::FailFast => {
                        return Err(Vcf2ExacError::Record {
                            line: line_number,
                            content,
                            source,
                        });
                    }
                    RecordPolicy::Skip => {
                        log::warn!("Skipping line {}: {}", line_number, source);
                        batch.stats.skipped += 1;
                    }
                }
            }
        }
    }

    log::info!(
        "Assembled {} of {} records ({} skipped)",
        batch.stats.assembled,
        batch.stats.total,
        batch.stats.skipped
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNP_LINE: &str = "chr1\t12345\t.\tA\tG\t50\t.\tAB=0;AC=4;AF=0.02;DP=100;TYPE=snp\tGT:DP:RO:AO\t0/0:100:82:18\t0/1:100:82:18";

    #[test]
    fn test_view_schema_columns() {
        let view = VariantRecordView::parse(SNP_LINE).unwrap();
        assert_eq!(view.field_count(), 11);
        assert_eq!(view.chrom(), "chr1");
        assert_eq!(view.pos(), Ok(12345));
        assert_eq!(view.ref_allele(), "A");
        assert_eq!(view.alt_allele(), "G");
        assert_eq!(view.format(), "GT:DP:RO:AO");
        assert_eq!(view.alt_sample(), "0/1:100:82:18");
    }

    #[test]
    fn test_view_truncated() {
        let line = "chr1\t100\t.\tA\tG\t.\t.\tDP=10";
        assert!(matches!(
            VariantRecordView::parse(line),
            Err(RecordError::TruncatedRecord { expected: 11, found: 8 })
        ));
    }

    #[test]
    fn test_single_type_row() {
        let mut resolver = Resolver::seeded(0);
        let row = assemble_row(SNP_LINE, &mut resolver).unwrap();

        assert_eq!(row.variant_type, VariantType::Snp);
        assert_eq!(row.depth, 100);
        assert_eq!(row.variant_reads, 18);
        assert_eq!(row.variant_reads_pct, 18.0);
        assert_eq!(row.allele_count, 4);
        assert_eq!(row.allele_freq_pct, 2.0);
        assert_eq!(row.coordinate_key(), "chr1-12345-A-G");
        assert_eq!(row.annotation, RowAnnotation::default());
    }

    #[test]
    fn test_multi_type_row_uses_resolved_index() {
        let line = "2\t500\t.\tAT\tA,ATT,AT\t.\t.\tTYPE=del,del,ins;DP=40;AC=2,7,7;AF=0.1,0.35,0.35\tGT:AO\t0/0:1,2,3\t0/1:5,13,9";
        let mut resolver = Resolver::seeded(0);
        let row = assemble_row(line, &mut resolver).unwrap();

        assert_eq!(row.variant_type, VariantType::Del);
        assert_eq!(row.allele_count, 7);
        assert_eq!(row.variant_reads, 13);
        assert_eq!(row.variant_reads_pct, 32.5);
        assert_eq!(row.allele_freq_pct, 35.0);
    }

    #[test]
    fn test_read_percentage_rounds_ties_to_even() {
        let line = "chr1\t10\t.\tA\tG\t.\t.\tAC=1;AF=0.5;DP=64;TYPE=snp\tGT:AO\t0/0:0\t0/1:1";
        let mut resolver = Resolver::seeded(0);
        let row = assemble_row(line, &mut resolver).unwrap();
        assert_eq!(row.variant_reads_pct, 1.562);
    }

    #[test]
    fn test_zero_depth() {
        let line = SNP_LINE.replace("DP=100", "DP=0");
        let mut resolver = Resolver::seeded(0);
        assert_eq!(assemble_row(&line, &mut resolver), Err(RecordError::ZeroDepth));
    }

    #[test]
    fn test_missing_type() {
        let line = SNP_LINE.replace(";TYPE=snp", "");
        let mut resolver = Resolver::seeded(0);
        assert_eq!(
            assemble_row(&line, &mut resolver),
            Err(RecordError::MissingRequiredField("TYPE"))
        );
    }

    #[test]
    fn test_missing_ao() {
        let line = "chr1\t1\t.\tA\tG\t.\t.\tTYPE=snp;DP=10;AC=1;AF=0.5\tGT:DP\t0/0:10\t0/1:10";
        let mut resolver = Resolver::seeded(0);
        assert_eq!(
            assemble_row(line, &mut resolver),
            Err(RecordError::MissingRequiredField("AO"))
        );
    }

    #[test]
    fn test_ao_index_out_of_range() {
        let line = "chr1\t1\t.\tA\tG,T\t.\t.\tTYPE=snp,mnp;DP=10;AC=1,2;AF=0.5,0.5\tAO\t1\t4";
        let mut resolver = Resolver::seeded(0);
        assert!(matches!(
            assemble_row(line, &mut resolver),
            Err(RecordError::InvalidNumber { field: "AO", .. })
        ));
    }

    #[test]
    fn test_sample_format_mismatch() {
        let line = SNP_LINE.replace("0/1:100:82:18", "0/1:100");
        let mut resolver = Resolver::seeded(0);
        assert_eq!(
            assemble_row(&line, &mut resolver),
            Err(RecordError::FieldCountMismatch { names: 4, values: 2 })
        );
    }

    #[test]
    fn test_read_rows_skips_headers_and_blanks() {
        let input = format!("##fileformat=VCFv4.2\n#CHROM\tPOS\n\n{}\n{}\n", SNP_LINE, SNP_LINE);
        let mut resolver = Resolver::seeded(0);
        let batch =
            read_variant_rows_from(input.as_bytes(), &mut resolver, RecordPolicy::FailFast).unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.stats, AssemblyStats { total: 2, assembled: 2, skipped: 0 });
    }

    #[test]
    fn test_read_rows_fail_fast_reports_line() {
        let input = format!("#CHROM\n{}\nchr1\t5\t.\n", SNP_LINE);
        let mut resolver = Resolver::seeded(0);
        let err = read_variant_rows_from(input.as_bytes(), &mut resolver, RecordPolicy::FailFast)
            .unwrap_err();
        match err {
            Vcf2ExacError::Record { line, content, source } => {
                assert_eq!(line, 3);
                assert_eq!(content, "chr1\t5\t.");
                assert!(matches!(source, RecordError::TruncatedRecord { .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_read_rows_skip_policy() {
        let input = format!("{}\nchr1\t5\t.\n{}\n", SNP_LINE, SNP_LINE);
        let mut resolver = Resolver::seeded(0);
        let batch =
            read_variant_rows_from(input.as_bytes(), &mut resolver, RecordPolicy::Skip).unwrap();
        assert_eq!(batch.rows.len(), 2);
        assert_eq!(batch.stats, AssemblyStats { total: 3, assembled: 2, skipped: 1 });
    }
}
