//! Entity extraction: pattern catalog scan followed by per-tag normalisation.

use std::collections::{BTreeMap, BTreeSet};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::equivalence::EquivalenceMap;
use crate::error::CoreError;
use crate::normalize::EntityNormalizer;
use crate::patterns::PatternCatalog;
use crate::tag::EntityTag;
use crate::text::clean_text;

/// One matched span. Offsets are byte offsets into the cleaned text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMatch {
    pub tag: EntityTag,
    pub raw: String,
    pub canonical: String,
    pub start: usize,
    pub end: usize,
}

/// Tag → canonical values in scan order, duplicates kept.
///
/// Only tags with at least one match have an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entities(BTreeMap<EntityTag, Vec<String>>);

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for `tag`; empty when the tag was not asserted.
    pub fn get(&self, tag: EntityTag) -> &[String] {
        self.0.get(&tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, tag: EntityTag) -> bool {
        self.0.contains_key(&tag)
    }

    /// Distinct values for `tag`, for set-based comparison.
    pub fn value_set(&self, tag: EntityTag) -> BTreeSet<&str> {
        self.get(tag).iter().map(String::as_str).collect()
    }

    /// Asserted tags in catalog order.
    pub fn tags(&self) -> impl Iterator<Item = EntityTag> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityTag, &[String])> {
        self.0.iter().map(|(tag, values)| (*tag, values.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of asserted tags.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of values across all tags.
    pub fn value_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn push(&mut self, tag: EntityTag, value: String) {
        self.0.entry(tag).or_default().push(value);
    }
}

impl FromIterator<(EntityTag, String)> for Entities {
    fn from_iter<I: IntoIterator<Item = (EntityTag, String)>>(iter: I) -> Self {
        let mut entities = Entities::new();
        for (tag, value) in iter {
            entities.push(tag, value);
        }
        entities
    }
}

/// Pattern catalog plus normaliser. Immutable once built.
#[derive(Debug, Clone)]
pub struct Extractor {
    catalog: PatternCatalog,
    normalizer: EntityNormalizer,
}

static SHARED: Lazy<Extractor> =
    Lazy::new(|| Extractor::new().expect("built-in entity patterns compile"));

impl Extractor {
    /// Built-in catalog with the default equivalence map.
    pub fn new() -> Result<Self, CoreError> {
        Self::with_equivalence(EquivalenceMap::default())
    }

    pub fn with_equivalence(equivalence: EquivalenceMap) -> Result<Self, CoreError> {
        Ok(Self {
            catalog: PatternCatalog::new()?,
            normalizer: EntityNormalizer::new(equivalence)?,
        })
    }

    /// Process-wide default extractor, built on first use.
    pub fn shared() -> &'static Extractor {
        &SHARED
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn normalizer(&self) -> &EntityNormalizer {
        &self.normalizer
    }

    /// Every match of every tag, tag by tag in catalog order, each tag's
    /// matches left to right. Matches of different tags may overlap.
    pub fn extract_matches(&self, text: &str) -> Vec<EntityMatch> {
        let text = clean_text(text);
        let mut out = Vec::new();

        for (tag, _) in self.catalog.rules() {
            for m in self.catalog.find_all(tag, &text) {
                out.push(EntityMatch {
                    tag,
                    raw: m.as_str().to_string(),
                    canonical: self.normalizer.normalize(tag, m.as_str()),
                    start: m.start(),
                    end: m.end(),
                });
            }
        }

        out
    }

    /// Canonical entity mapping for one paragraph.
    pub fn extract(&self, text: &str) -> Entities {
        self.extract_matches(text)
            .into_iter()
            .map(|m| (m.tag, m.canonical))
            .collect()
    }
}

/// Extract with the shared default extractor.
pub fn extract_entities(text: &str) -> Entities {
    Extractor::shared().extract(text)
}
