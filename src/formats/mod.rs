//! File format adapters
//!
//! Variant record input (VCF-style, freebayes schema) and the tab-separated
//! output table.

pub mod table;
pub mod vcf;

pub use table::{output_path, read_table, write_table, TableRecord};
pub use vcf::{
    assemble_row, read_variant_rows, read_variant_rows_from, AssemblyStats, RowBatch,
    VariantRecordView,
};
