//! Run configuration
//!
//! Policies and endpoint settings for one pipeline run. The CLI maps its
//! arguments onto these types; library callers build them directly.

use crate::core::resolver::Resolver;
use std::time::Duration;

/// ExAC bulk variant endpoint
pub const DEFAULT_EXAC_URL: &str = "http://exac.hms.harvard.edu/rest/bulk/variant";

/// What to do with a record that cannot be assembled into a row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordPolicy {
    /// Abort the run on the first malformed record
    #[default]
    FailFast,
    /// Log and count malformed records, keep going
    Skip,
}

/// What to do when the annotation lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrichmentPolicy {
    /// A failed lookup fails the run
    #[default]
    Required,
    /// A failed lookup leaves every enrichment column as NA
    Degrade,
}

/// Annotation service settings
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationConfig {
    pub endpoint: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub policy: EnrichmentPolicy,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EXAC_URL.to_string(),
            timeout: Duration::from_secs(120),
            max_retries: 3,
            base_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(30),
            policy: EnrichmentPolicy::Required,
        }
    }
}

impl AnnotationConfig {
    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.base_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Settings for one pipeline run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub record_policy: RecordPolicy,
    pub annotation: AnnotationConfig,
    /// Skip the lookup entirely; enrichment columns stay NA
    pub skip_annotation: bool,
    /// Seed for the del/ins tie-break; OS entropy when unset
    pub seed: Option<u64>,
}

impl PipelineConfig {
    /// Resolver honoring the configured seed
    pub fn resolver(&self) -> Resolver {
        match self.seed {
            Some(seed) => Resolver::seeded(seed),
            None => Resolver::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.record_policy, RecordPolicy::FailFast);
        assert_eq!(config.annotation.policy, EnrichmentPolicy::Required);
        assert_eq!(config.annotation.endpoint, DEFAULT_EXAC_URL);
        assert!(!config.skip_annotation);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = AnnotationConfig {
            base_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(3),
            ..Default::default()
        };
        assert_eq!(config.backoff_for(0), Duration::from_millis(500));
        assert_eq!(config.backoff_for(1), Duration::from_millis(1000));
        assert_eq!(config.backoff_for(2), Duration::from_millis(2000));
        assert_eq!(config.backoff_for(3), Duration::from_secs(3));
        assert_eq!(config.backoff_for(40), Duration::from_secs(3));
    }
}
