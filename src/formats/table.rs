//! Tab-separated output table
//!
//! One row per resolved record with the columns
//! `CHROM POS refAllele alternativeAllele variantType depthOfCoverage
//! nReadsVariant variantReads_% ExAC_col consequence alleleFreq ensembl_gid
//! ensembl_tid`. Missing enrichment values are written as `NA`.

use crate::core::error::Result;
use crate::core::io::DEFAULT_BUFFER_SIZE;
use crate::core::resolver::VariantType;
use crate::core::row::VariantRow;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Output column names, in order
pub const HEADER: [&str; 13] = [
    "CHROM",
    "POS",
    "refAllele",
    "alternativeAllele",
    "variantType",
    "depthOfCoverage",
    "nReadsVariant",
    "variantReads_%",
    "ExAC_col",
    "consequence",
    "alleleFreq",
    "ensembl_gid",
    "ensembl_tid",
];

/// Suffix appended to the input stem to name the output table
pub const OUTPUT_SUFFIX: &str = "_parsedVCF.tsv";

/// One line of the output table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(rename = "CHROM")]
    pub chrom: String,
    #[serde(rename = "POS")]
    pub pos: u64,
    #[serde(rename = "refAllele")]
    pub ref_allele: String,
    #[serde(rename = "alternativeAllele")]
    pub alt_allele: String,
    #[serde(rename = "variantType")]
    pub variant_type: VariantType,
    #[serde(rename = "depthOfCoverage")]
    pub depth: u64,
    #[serde(rename = "nReadsVariant")]
    pub variant_reads: u64,
    #[serde(rename = "variantReads_%")]
    pub variant_reads_pct: f64,
    #[serde(rename = "ExAC_col")]
    pub exac_key: String,
    pub consequence: String,
    #[serde(rename = "alleleFreq")]
    pub allele_freq: String,
    pub ensembl_gid: String,
    pub ensembl_tid: String,
}

impl From<&VariantRow> for TableRecord {
    fn from(row: &VariantRow) -> Self {
        Self {
            chrom: row.chrom.clone(),
            pos: row.pos,
            ref_allele: row.ref_allele.clone(),
            alt_allele: row.alt_allele.clone(),
            variant_type: row.variant_type,
            depth: row.depth,
            variant_reads: row.variant_reads,
            variant_reads_pct: row.variant_reads_pct,
            exac_key: row.coordinate_key(),
            consequence: row.annotation.consequence_or_na().to_string(),
            allele_freq: row.annotation.allele_freq_or_na(),
            ensembl_gid: row.annotation.gene_ids_or_na().to_string(),
            ensembl_tid: row.annotation.transcript_ids_or_na().to_string(),
        }
    }
}

/// `{out_dir}/{input stem}_parsedVCF.tsv`
pub fn output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    out_dir.join(format!("{}{}", stem, OUTPUT_SUFFIX))
}

/// Write rows to a table file, returning the number of rows written
pub fn write_table<P: AsRef<Path>>(path: P, rows: &[VariantRow]) -> Result<usize> {
    let file = File::create(path.as_ref())?;
    let written = write_table_to(BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file), rows)?;
    log::info!("Wrote {} rows to {:?}", written, path.as_ref());
    Ok(written)
}

/// Write rows as a table to any writer
pub fn write_table_to<W: Write>(writer: W, rows: &[VariantRow]) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_writer(writer);

    // Header goes out even for an empty table
    writer.write_record(HEADER)?;
    for row in rows {
        writer.serialize(TableRecord::from(row))?;
    }
    writer.flush()?;

    Ok(rows.len())
}

/// Read a table written by [`write_table`]
pub fn read_table<P: AsRef<Path>>(path: P) -> Result<Vec<TableRecord>> {
    let file = File::open(path.as_ref())?;
    read_table_from(BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file))
}

pub fn read_table_from<R: Read>(reader: R) -> Result<Vec<TableRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_reader(reader);

    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
