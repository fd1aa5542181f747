//! ExAC bulk variant REST client
//!
//! Posts every coordinate key in one request to the bulk variant endpoint
//! (`{"14-21853913-T-C": "14-21853913-T-C", ...}`) and reads back, per key:
//!
//! ```text
//! {
//!   "consequence": {"missense_variant": {...}, ...} | null,
//!   "variant": {"allele_freq": 1.2e-05, "genes": [...], "transcripts": [...], ...}
//! }
//! ```
//!
//! Transport errors and 5xx/429 answers are retried with exponential backoff.

use super::{AnnotationEntry, AnnotationResult, AnnotationSource};
use crate::core::config::AnnotationConfig;
use crate::core::error::{AnnotationError, LookupResult};
use indexmap::IndexMap;
use reqwest::blocking::Client;
use serde::Deserialize;

/// One value of the bulk response
#[derive(Debug, Deserialize)]
struct BulkVariantEntry {
    #[serde(default)]
    consequence: Option<IndexMap<String, serde_json::Value>>,
    #[serde(default)]
    variant: Option<BulkVariantInfo>,
}

#[derive(Debug, Deserialize)]
struct BulkVariantInfo {
    #[serde(default)]
    allele_freq: Option<f64>,
    #[serde(default)]
    genes: Option<Vec<String>>,
    #[serde(default)]
    transcripts: Option<Vec<String>>,
}

impl From<BulkVariantEntry> for AnnotationEntry {
    fn from(entry: BulkVariantEntry) -> Self {
        let (allele_freq, gene_ids, transcript_ids) = match entry.variant {
            Some(v) => (v.allele_freq, v.genes, v.transcripts),
            None => (None, None, None),
        };
        AnnotationEntry {
            consequences: entry.consequence.map(|c| c.into_keys().collect()),
            allele_freq,
            gene_ids,
            transcript_ids,
        }
    }
}

/// Parse a bulk variant response body
pub fn parse_bulk_response(body: &str) -> LookupResult<AnnotationResult> {
    // A null entry only blanks its own key
    let parsed: IndexMap<String, Option<BulkVariantEntry>> = serde_json::from_str(body)
        .map_err(|e| AnnotationError::InvalidResponse(e.to_string()))?;

    Ok(parsed
        .into_iter()
        .map(|(key, entry)| (key, entry.map(AnnotationEntry::from).unwrap_or_default()))
        .collect())
}

/// HTTP client for the ExAC bulk variant endpoint
pub struct ExacClient {
    client: Client,
    config: AnnotationConfig,
}

impl ExacClient {
    pub fn new(config: AnnotationConfig) -> LookupResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AnnotationError::Client(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    /// Fetch annotations for all keys in one request, retrying transient failures
    pub fn fetch(&self, keys: &[String]) -> LookupResult<AnnotationResult> {
        if keys.is_empty() {
            log::debug!("No coordinate keys to annotate");
            return Ok(AnnotationResult::new());
        }

        let body: IndexMap<&str, &str> = keys.iter().map(|k| (k.as_str(), k.as_str())).collect();
        log::info!(
            "Retrieving {} variants from {}, please be patient ...",
            keys.len(),
            self.config.endpoint
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.post_once(&body, attempt) {
                Ok(text) => {
                    log::debug!("Received {} bytes on attempt {}", text.len(), attempt);
                    return parse_bulk_response(&text);
                }
                Err(e) if e.is_transient() && attempt <= self.config.max_retries => {
                    let delay = self.config.backoff_for(attempt - 1);
                    log::warn!("{}; retrying in {:?}", e, delay);
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn post_once(&self, body: &IndexMap<&str, &str>, attempts: u32) -> LookupResult<String> {
        let response = self
            .client
            .post(&self.config.endpoint)
            .json(body)
            .send()
            .map_err(|e| AnnotationError::Transport {
                attempts,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnnotationError::Status {
                attempts,
                status: status.as_u16(),
            });
        }

        response.text().map_err(|e| AnnotationError::Transport {
            attempts,
            message: e.to_string(),
        })
    }
}

impl AnnotationSource for ExacClient {
    fn lookup(&self, keys: &[String]) -> LookupResult<AnnotationResult> {
        self.fetch(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_entry() {
        let body = r#"{
            "14-21853913-T-C": {
                "consequence": {"missense_variant": {"ENSG1": []}, "upstream_gene_variant": {}},
                "variant": {
                    "allele_freq": 1.65e-05,
                    "genes": ["ENSG00000100888"],
                    "transcripts": ["ENST00000397354", "ENST00000554017"],
                    "chrom": "14"
                }
            }
        }"#;
        let result = parse_bulk_response(body).unwrap();
        let entry = &result["14-21853913-T-C"];

        assert_eq!(
            entry.consequences,
            Some(vec!["missense_variant".to_string(), "upstream_gene_variant".to_string()])
        );
        assert_eq!(entry.allele_freq, Some(1.65e-05));
        assert_eq!(entry.gene_ids, Some(vec!["ENSG00000100888".to_string()]));
        assert_eq!(entry.transcript_ids.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_parse_sparse_entry() {
        let body = r#"{"1-1-A-G": {"consequence": null, "variant": {"chrom": "1"}}}"#;
        let result = parse_bulk_response(body).unwrap();
        assert_eq!(result["1-1-A-G"], AnnotationEntry::default());
    }

    #[test]
    fn test_parse_entry_without_variant() {
        let body = r#"{"1-1-A-G": {}}"#;
        let result = parse_bulk_response(body).unwrap();
        assert_eq!(result["1-1-A-G"], AnnotationEntry::default());
    }

    #[test]
    fn test_parse_null_entry_keeps_batch() {
        let body = r#"{
            "1-1-A-G": null,
            "2-5-C-T": {"consequence": null, "variant": {"allele_freq": 0.5}}
        }"#;
        let result = parse_bulk_response(body).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result["1-1-A-G"], AnnotationEntry::default());
        assert_eq!(result["2-5-C-T"].allele_freq, Some(0.5));
    }

    #[test]
    fn test_parse_invalid_body() {
        let err = parse_bulk_response("<html>Service Unavailable</html>").unwrap_err();
        assert!(matches!(err, AnnotationError::InvalidResponse(_)));
    }

    #[test]
    fn test_fetch_empty_keys_skips_request() {
        let client = ExacClient::new(AnnotationConfig {
            endpoint: "http://127.0.0.1:9/unreachable".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert!(client.fetch(&[]).unwrap().is_empty());
    }
}
