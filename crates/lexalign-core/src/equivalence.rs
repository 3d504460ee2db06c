//! Institution code equivalences across EN/DE/LV legal citations.
//!
//! Latvian and German texts abbreviate the same institutions differently
//! (`ES` for the European Union, `EK` for the European Community). Codes are
//! mapped to one canonical spelling before citations are compared.

use std::collections::HashMap;

/// Canonical ordering of well-known codes inside a citation key.
/// Codes not listed sort after these, in first-seen order.
const CODE_PRIORITY: &[&str] = &["EC", "EU", "EURATOM"];

/// Abbreviation → canonical institution code.
#[derive(Debug, Clone)]
pub struct EquivalenceMap {
    entries: HashMap<String, String>,
}

impl Default for EquivalenceMap {
    fn default() -> Self {
        Self::empty()
            .with("ES", "EU")
            .with("EK", "EC")
            .with("EURATO", "EURATOM")
    }
}

impl EquivalenceMap {
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add (or replace) an equivalence. Keys and values are uppercased.
    pub fn with(mut self, from: &str, to: &str) -> Self {
        self.entries
            .insert(from.trim().to_uppercase(), to.trim().to_uppercase());
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Canonical form of a single code.
    pub fn canonical(&self, code: &str) -> String {
        let code = code.trim().to_uppercase();
        match self.entries.get(&code) {
            Some(mapped) => mapped.clone(),
            None => code,
        }
    }

    /// Map, deduplicate, and order a list of codes: `EC < EU < EURATOM`,
    /// then any other code in the order it first appeared.
    pub fn canonical_codes<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out: Vec<String> = Vec::new();
        for code in codes {
            let code = self.canonical(code);
            if !code.is_empty() && !out.contains(&code) {
                out.push(code);
            }
        }
        // Stable sort keeps first-seen order among unranked codes.
        out.sort_by_key(|code| {
            CODE_PRIORITY
                .iter()
                .position(|p| *p == code.as_str())
                .unwrap_or(CODE_PRIORITY.len())
        });
        out
    }

    /// Substitute every whole-token occurrence of a known abbreviation.
    ///
    /// Used as the best-effort fallback for citations the canonical pattern
    /// cannot parse. Token-wise so that `EURATOM` never becomes `EURATOMM`.
    pub fn substitute_tokens(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut token = String::new();

        for ch in text.chars() {
            if ch.is_alphanumeric() {
                token.push(ch);
                continue;
            }
            self.flush_token(&mut token, &mut out);
            out.push(ch);
        }
        self.flush_token(&mut token, &mut out);
        out
    }

    fn flush_token(&self, token: &mut String, out: &mut String) {
        if token.is_empty() {
            return;
        }
        match self.entries.get(token.as_str()) {
            Some(mapped) => out.push_str(mapped),
            None => out.push_str(token),
        }
        token.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_entries() {
        let map = EquivalenceMap::default();
        assert_eq!(map.len(), 3);
        assert_eq!(map.canonical("ES"), "EU");
        assert_eq!(map.canonical("ek"), "EC");
        assert_eq!(map.canonical("EURATO"), "EURATOM");
        assert_eq!(map.canonical("EU"), "EU");
    }

    #[test]
    fn codes_are_deduplicated_and_ordered() {
        let map = EquivalenceMap::default();
        assert_eq!(map.canonical_codes(["EU", "ES"]), vec!["EU"]);
        assert_eq!(
            map.canonical_codes(["EURATOM", "EU", "EK"]),
            vec!["EC", "EU", "EURATOM"]
        );
    }

    #[test]
    fn unranked_codes_keep_first_seen_order() {
        let map = EquivalenceMap::default();
        assert_eq!(
            map.canonical_codes(["XB", "EU", "XA"]),
            vec!["EU", "XB", "XA"]
        );
    }

    #[test]
    fn extensible_without_other_changes() {
        let map = EquivalenceMap::default().with("EG", "EC");
        assert_eq!(map.canonical_codes(["EG", "EK"]), vec!["EC"]);
    }

    #[test]
    fn token_substitution_is_whole_word() {
        let map = EquivalenceMap::default();
        assert_eq!(map.substitute_tokens("(ES) ABC"), "(EU) ABC");
        assert_eq!(map.substitute_tokens("(EURATOM) X"), "(EURATOM) X");
        assert_eq!(map.substitute_tokens("DIRECTIVES"), "DIRECTIVES");
        assert_eq!(map.substitute_tokens("(EURATO, EK)"), "(EURATOM, EC)");
    }
}
