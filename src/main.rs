//! vcf2exac CLI entry point
//!
//! Builds a per-variant table from a freebayes VCF and annotates it against
//! the ExAC bulk variant API.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use vcf2exac::annotate::{self, ExacClient};
use vcf2exac::core::{
    AnnotationConfig, EnrichmentPolicy, PipelineConfig, RecordPolicy, VariantSummary,
    DEFAULT_EXAC_URL,
};
use vcf2exac::formats;

#[derive(Parser)]
#[command(name = "vcf2exac")]
#[command(about = "Parse a VCF into a variant table annotated with ExAC data")]
#[command(version)]
struct Cli {
    /// Input VCF file (plain, gzip or bzip2)
    #[arg(short = 'i', long = "ifile")]
    ifile: PathBuf,
    /// Output directory (created if missing)
    #[arg(short = 'o', long = "odir")]
    odir: PathBuf,
    /// Seed for the del/ins tie-break coin flip
    #[arg(long)]
    seed: Option<u64>,
    /// Skip malformed records instead of aborting
    #[arg(long = "skip-malformed")]
    skip_malformed: bool,
    /// ExAC bulk variant endpoint
    #[arg(long = "exac-url", default_value = DEFAULT_EXAC_URL)]
    exac_url: String,
    /// Request timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,
    /// Retries after a failed annotation request
    #[arg(long, default_value = "3")]
    retries: u32,
    /// Write NA enrichment columns when the annotation request fails
    #[arg(long = "allow-unannotated")]
    allow_unannotated: bool,
    /// Do not contact the annotation service at all
    #[arg(long = "no-annotation")]
    no_annotation: bool,
}

impl From<&Cli> for PipelineConfig {
    fn from(cli: &Cli) -> Self {
        PipelineConfig {
            record_policy: if cli.skip_malformed {
                RecordPolicy::Skip
            } else {
                RecordPolicy::FailFast
            },
            annotation: AnnotationConfig {
                endpoint: cli.exac_url.clone(),
                timeout: Duration::from_secs(cli.timeout),
                max_retries: cli.retries,
                policy: if cli.allow_unannotated {
                    EnrichmentPolicy::Degrade
                } else {
                    EnrichmentPolicy::Required
                },
                ..Default::default()
            },
            skip_annotation: cli.no_annotation,
            seed: cli.seed,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = PipelineConfig::from(&cli);
    let start = Instant::now();

    std::fs::create_dir_all(&cli.odir)
        .map_err(|e| anyhow::anyhow!("Failed to create output directory {:?}: {}", cli.odir, e))?;
    let output_path = formats::output_path(&cli.ifile, &cli.odir);

    eprintln!("Parsing VCF file: {:?} -> {:?}", cli.ifile, output_path);
    let mut resolver = config.resolver();
    let batch = formats::read_variant_rows(&cli.ifile, &mut resolver, config.record_policy)?;

    let rows = if config.skip_annotation {
        eprintln!("Annotation disabled, enrichment columns set to NA");
        annotate::enrich(batch.rows, &annotate::AnnotationResult::new())
    } else {
        let client = ExacClient::new(config.annotation.clone())?;
        eprintln!("Annotating against {}", client.endpoint());
        annotate::enrich_rows(batch.rows, &client, config.annotation.policy)?
    };

    let written = formats::write_table(&output_path, &rows)?;
    let summary: VariantSummary = rows.iter().map(|row| row.variant_type).collect();

    eprintln!("\n=== Parsing Statistics ===");
    eprintln!("Total records:   {}", batch.stats.total);
    eprintln!("Written:         {}", written);
    eprintln!("Skipped:         {}", batch.stats.skipped);
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    write_summary(&mut std::io::stdout().lock(), &summary)?;

    Ok(())
}

/// Per-type report, the run's user-facing output on stdout
fn write_summary<W: Write>(out: &mut W, summary: &VariantSummary) -> std::io::Result<()> {
    writeln!(out, "{}", summary)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcf2exac::core::VariantType;

    #[test]
    fn test_summary_report() {
        let summary: VariantSummary = [VariantType::Del, VariantType::Snp, VariantType::Snp]
            .into_iter()
            .collect();
        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "There were a total of 3, variants identified, composed of 2, types\ndel\t:\t1\nsnp\t:\t2\n"
        );
    }

    #[test]
    fn test_cli_maps_policies() {
        let cli = Cli::parse_from([
            "vcf2exac", "-i", "in.vcf", "-o", "out", "--skip-malformed", "--allow-unannotated",
            "--seed", "7", "--retries", "5",
        ]);
        let config = PipelineConfig::from(&cli);

        assert_eq!(config.record_policy, RecordPolicy::Skip);
        assert_eq!(config.annotation.policy, EnrichmentPolicy::Degrade);
        assert_eq!(config.annotation.max_retries, 5);
        assert_eq!(config.seed, Some(7));
        assert!(!config.skip_annotation);
    }
}
