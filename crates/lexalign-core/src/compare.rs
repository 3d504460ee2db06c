//! Cross-language comparison of entity mappings.
//!
//! Two related decisions over the same inputs:
//! - a per-tag significant-mismatch predicate, reported as diagnostics;
//! - an aggregate similarity score per paragraph, mapped to a traffic light.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extract::Entities;
use crate::tag::{EntityTag, Language};

/// True when at least one side asserts values for a tag and the two sides
/// share none of them. Counts do not matter: any common value is enough.
pub fn is_significant_mismatch<S: AsRef<str>>(a: &[S], b: &[S]) -> bool {
    if a.is_empty() && b.is_empty() {
        return false;
    }
    let a: BTreeSet<&str> = a.iter().map(AsRef::as_ref).collect();
    !b.iter().any(|value| a.contains(value.as_ref()))
}

/// Fraction of asserted tags whose value sets intersect, rounded to three
/// decimals. No tags on either side is vacuously consistent (1.0).
pub fn entity_similarity(a: &Entities, b: &Entities) -> f64 {
    let considered: BTreeSet<EntityTag> = a.tags().chain(b.tags()).collect();
    if considered.is_empty() {
        return 1.0;
    }

    let matched = considered
        .iter()
        .filter(|tag| {
            let a_values = a.value_set(**tag);
            b.get(**tag).iter().any(|v| a_values.contains(v.as_str()))
        })
        .count();

    round3(matched as f64 / considered.len() as f64)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Traffic-light status of a paragraph pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Green,
    Yellow,
    Red,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score cut-offs: `green` at or above `green`, `yellow` at or above
/// `yellow`, `red` below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            green: 0.8,
            yellow: 0.4,
        }
    }
}

impl StatusThresholds {
    pub fn classify(&self, score: f64) -> Status {
        if score >= self.green {
            Status::Green
        } else if score >= self.yellow {
            Status::Yellow
        } else {
            Status::Red
        }
    }
}

/// One (paragraph, tag) where the two compared languages share no value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchRecord {
    pub para_number: u32,
    pub tag: EntityTag,
    pub lang_a: Language,
    pub lang_b: Language,
    pub values_a: BTreeSet<String>,
    pub values_b: BTreeSet<String>,
    /// `values_a − values_b`
    pub only_a: BTreeSet<String>,
    /// `values_b − values_a`
    pub only_b: BTreeSet<String>,
}

/// Significant mismatches between two entity mappings of one paragraph,
/// in catalog tag order.
pub fn find_mismatches(
    para_number: u32,
    (lang_a, a): (Language, &Entities),
    (lang_b, b): (Language, &Entities),
) -> Vec<MismatchRecord> {
    EntityTag::ALL
        .into_iter()
        .filter(|tag| is_significant_mismatch(a.get(*tag), b.get(*tag)))
        .map(|tag| {
            let values_a: BTreeSet<String> = a.get(tag).iter().cloned().collect();
            let values_b: BTreeSet<String> = b.get(tag).iter().cloned().collect();
            MismatchRecord {
                para_number,
                tag,
                lang_a,
                lang_b,
                only_a: values_a.difference(&values_b).cloned().collect(),
                only_b: values_b.difference(&values_a).cloned().collect(),
                values_a,
                values_b,
            }
        })
        .collect()
}
