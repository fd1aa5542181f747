//! Most-deleterious variant resolution
//!
//! When a record reports several candidate types at one position
//! (`TYPE=snp,del,ins`), a single representative call is chosen:
//!
//! 1. If both `del` and `ins` are present, the one with more occurrences
//!    wins, then the one with the larger maximum allele count, then a fair
//!    coin flip.
//! 2. Otherwise the first present type in the order
//!    `del > ins > complex > mnp > snp` wins.
//! 3. Within the winning type, the candidate with the largest allele count
//!    is picked; ties go to the earliest index.
//!
//! The coin flip draws from a random source owned by [`Resolver`], so a
//! seeded resolver reproduces its choices exactly.

use crate::core::error::{RecordError, RecordResult};
use crate::core::fields::parse_number_list;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Variant classification as reported in the INFO `TYPE` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantType {
    Del,
    Ins,
    Complex,
    Mnp,
    Snp,
}

impl VariantType {
    /// Types ordered from most to least deleterious
    pub const PRIORITY: [VariantType; 5] = [
        VariantType::Del,
        VariantType::Ins,
        VariantType::Complex,
        VariantType::Mnp,
        VariantType::Snp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Del => "del",
            VariantType::Ins => "ins",
            VariantType::Complex => "complex",
            VariantType::Mnp => "mnp",
            VariantType::Snp => "snp",
        }
    }

    /// Position in [`VariantType::PRIORITY`]
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VariantType {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "del" => Ok(VariantType::Del),
            "ins" => Ok(VariantType::Ins),
            "complex" => Ok(VariantType::Complex),
            "mnp" => Ok(VariantType::Mnp),
            "snp" => Ok(VariantType::Snp),
            other => Err(RecordError::UnknownVariantType(other.to_string())),
        }
    }
}

/// Parallel candidate lists reported at one position
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateSet {
    types: Vec<VariantType>,
    allele_counts: Vec<u64>,
    allele_freqs: Vec<f64>,
}

impl CandidateSet {
    /// Build a candidate set; all lists must be non-empty and equally long
    pub fn new(
        types: Vec<VariantType>,
        allele_counts: Vec<u64>,
        allele_freqs: Vec<f64>,
    ) -> RecordResult<Self> {
        if types.is_empty() {
            return Err(RecordError::EmptyCandidates);
        }
        if types.len() != allele_counts.len() || types.len() != allele_freqs.len() {
            return Err(RecordError::CandidateLengthMismatch {
                types: types.len(),
                counts: allele_counts.len(),
                freqs: allele_freqs.len(),
            });
        }

        Ok(Self {
            types,
            allele_counts,
            allele_freqs,
        })
    }

    /// Build a candidate set from raw comma lists (`TYPE`, `AC`, `AF`)
    pub fn parse(types: &str, allele_counts: &str, allele_freqs: &str) -> RecordResult<Self> {
        let types = types
            .split(',')
            .map(VariantType::from_str)
            .collect::<RecordResult<Vec<_>>>()?;
        let allele_counts = parse_number_list("AC", allele_counts)?;
        let allele_freqs = parse_number_list("AF", allele_freqs)?;

        Self::new(types, allele_counts, allele_freqs)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn types(&self) -> &[VariantType] {
        &self.types
    }

    pub fn allele_counts(&self) -> &[u64] {
        &self.allele_counts
    }

    pub fn allele_freqs(&self) -> &[f64] {
        &self.allele_freqs
    }

    /// Candidate indices grouped by type, in input order within each group
    fn group_indices(&self) -> [Vec<usize>; 5] {
        let mut groups: [Vec<usize>; 5] = Default::default();
        for (i, t) in self.types.iter().enumerate() {
            groups[t.rank()].push(i);
        }
        groups
    }
}

/// The single call chosen for a position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCall {
    pub variant_type: VariantType,
    pub allele_count: u64,
    pub allele_freq: f64,
    /// Index into the candidate lists
    pub index: usize,
}

/// Resolver owning the random source used for the `del`/`ins` coin flip
#[derive(Debug, Clone)]
pub struct Resolver<R = StdRng> {
    rng: R,
}

impl Resolver<StdRng> {
    /// Reproducible resolver
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Resolver seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> Resolver<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Pick the most deleterious call from a candidate set
    pub fn resolve(&mut self, candidates: &CandidateSet) -> RecordResult<ResolvedCall> {
        let groups = candidates.group_indices();
        let counts = candidates.allele_counts();

        let variant_type = self
            .select_type(&groups, counts)
            .ok_or(RecordError::EmptyCandidates)?;

        let mut best: Option<usize> = None;
        for &i in &groups[variant_type.rank()] {
            if best.map_or(true, |b| counts[i] > counts[b]) {
                best = Some(i);
            }
        }
        let index = best.ok_or(RecordError::EmptyCandidates)?;

        Ok(ResolvedCall {
            variant_type,
            allele_count: counts[index],
            allele_freq: candidates.allele_freqs()[index],
            index,
        })
    }

    /// Parse raw `TYPE`, `AC` and `AF` lists and resolve them
    pub fn resolve_lists(
        &mut self,
        types: &str,
        allele_counts: &str,
        allele_freqs: &str,
    ) -> RecordResult<ResolvedCall> {
        let candidates = CandidateSet::parse(types, allele_counts, allele_freqs)?;
        self.resolve(&candidates)
    }

    fn select_type(&mut self, groups: &[Vec<usize>; 5], counts: &[u64]) -> Option<VariantType> {
        let dels = &groups[VariantType::Del.rank()];
        let ins = &groups[VariantType::Ins.rank()];

        if !dels.is_empty() && !ins.is_empty() {
            let winner = match dels.len().cmp(&ins.len()) {
                Ordering::Greater => VariantType::Del,
                Ordering::Less => VariantType::Ins,
                Ordering::Equal => {
                    let max_del = dels.iter().map(|&i| counts[i]).max();
                    let max_ins = ins.iter().map(|&i| counts[i]).max();
                    match max_del.cmp(&max_ins) {
                        Ordering::Greater => VariantType::Del,
                        Ordering::Less => VariantType::Ins,
                        Ordering::Equal => {
                            if self.rng.random_bool(0.5) {
                                VariantType::Ins
                            } else {
                                VariantType::Del
                            }
                        }
                    }
                }
            };
            return Some(winner);
        }

        VariantType::PRIORITY
            .into_iter()
            .find(|t| !groups[t.rank()].is_empty())
    }
}
