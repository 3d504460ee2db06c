//! Per-tag canonicalisation of matched spans.
//!
//! Two spans that denote the same fact must normalise to the same string,
//! whatever their language or formatting. Normalisation never fails: a span
//! no rule can interpret comes back as its cleaned literal text and is then
//! compared literally.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use tracing::debug;

use crate::equivalence::EquivalenceMap;
use crate::error::CoreError;
use crate::patterns::{LEGAL_KEYWORDS, LV_MONTH_ENDINGS, LV_MONTH_STEMS};
use crate::tag::EntityTag;
use crate::text::clean_text;

const EN_DE_MONTHS: &[(&str, u32)] = &[
    ("january", 1),
    ("januar", 1),
    ("jan", 1),
    ("february", 2),
    ("februar", 2),
    ("feb", 2),
    ("march", 3),
    ("märz", 3),
    ("maerz", 3),
    ("mar", 3),
    ("april", 4),
    ("apr", 4),
    ("may", 5),
    ("mai", 5),
    ("june", 6),
    ("juni", 6),
    ("jun", 6),
    ("july", 7),
    ("juli", 7),
    ("jul", 7),
    ("august", 8),
    ("aug", 8),
    ("september", 9),
    ("sept", 9),
    ("sep", 9),
    ("october", 10),
    ("oktober", 10),
    ("oct", 10),
    ("okt", 10),
    ("november", 11),
    ("nov", 11),
    ("december", 12),
    ("dezember", 12),
    ("dec", 12),
    ("dez", 12),
];

const BILLION_WORDS: &[&str] = &["MILJARDI", "MILLIARDEN", "MILLIARDE", "MRD", "BILLION"];
const MILLION_WORDS: &[&str] = &["MILJONI", "MILLIONEN", "MILLION", "MIO"];

/// Citation years outside this window are never read as years.
const PLAUSIBLE_YEARS: std::ops::RangeInclusive<u32> = 1950..=2099;

/// From this year on EU acts are numbered YEAR/NUMBER.
const YEAR_FIRST_SINCE: u32 = 2015;

const DEFAULT_CODE: &str = "EU";

/// Canonicalises raw spans per [`EntityTag`].
///
/// Owns its lookup tables and the [`EquivalenceMap`]; built once and shared
/// read-only.
#[derive(Debug, Clone)]
pub struct EntityNormalizer {
    equivalence: EquivalenceMap,
    months: HashMap<&'static str, u32>,
    lv_date: Regex,
    en_de_date: Regex,
    numeric_date: Regex,
    eur_amount: Regex,
    eur_suffix: Regex,
    legal_keywords: Regex,
    number_prefix: Regex,
    legal_canon: Regex,
    article_keyword: Regex,
    article_number: Regex,
    range: Regex,
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|source| CoreError::Pattern { name, source })
}

impl EntityNormalizer {
    pub fn new(equivalence: EquivalenceMap) -> Result<Self, CoreError> {
        let scale_words = BILLION_WORDS
            .iter()
            .chain(MILLION_WORDS)
            .copied()
            .collect::<Vec<_>>()
            .join("|");

        Ok(Self {
            equivalence,
            months: EN_DE_MONTHS.iter().copied().collect(),
            lv_date: compile(
                "lv_date",
                r"(?i)^(\d{4})\.\s*(?:gada\s*)?(\d{1,2})\.\s*(\p{L}+)",
            )?,
            en_de_date: compile(
                "en_de_date",
                r"(?i)^(\d{1,2})[.\-/]?\s*(\p{L}+)\.?\s*(\d{2,4})\b",
            )?,
            numeric_date: compile(
                "numeric_date",
                r"^(\d{1,2})[.\-/](\d{1,2})[.\-/](\d{2,4})\b",
            )?,
            eur_amount: compile(
                "eur_amount",
                &format!(r"^(?:EURO?)?(\d[\d.,]*)({scale_words})?(?:EURO?)?$"),
            )?,
            eur_suffix: compile("eur_suffix", r"(\d+(?:[.,]\d+)?)EUR")?,
            legal_keywords: compile(
                "legal_keywords",
                &format!(r"(?i)\b(?:COUNCIL|{LEGAL_KEYWORDS})\s*"),
            )?,
            number_prefix: compile("number_prefix", r"(?i)\b(?:NO|NR|N)\.?\s*(\d)")?,
            legal_canon: compile(
                "legal_canon",
                r"(?:\((?P<codes>[A-Z]+(?:\s*,\s*[A-Z]+)*)\)\s*)?(?P<first>\d+)\s*/\s*(?P<second>\d+)",
            )?,
            article_keyword: compile(
                "article_keyword",
                r"(?i)\b(?:Article|Artikel|Art\.?|pants|panta|pantā|pantu)",
            )?,
            article_number: compile("article_number", r"\d+[A-Za-z]?(?:\(\d+\))?")?,
            range: compile("range", r"^(\d{4})\s?[–\-—]\s?(\d{4})$")?,
        })
    }

    pub fn equivalence(&self) -> &EquivalenceMap {
        &self.equivalence
    }

    /// Canonical value for `raw` under `tag`. Falls back to the cleaned raw
    /// text when no rule applies.
    pub fn normalize(&self, tag: EntityTag, raw: &str) -> String {
        let cleaned = clean_text(raw);
        let canonical = match tag {
            EntityTag::Date => self.normalize_date(&cleaned),
            EntityTag::Number => normalize_number(&cleaned),
            EntityTag::Percent => normalize_number(cleaned.trim_end_matches('%')),
            EntityTag::EurAmount => Some(self.normalize_eur_amount(&cleaned)),
            EntityTag::LegalRef => Some(self.normalize_legal_ref(&cleaned)),
            EntityTag::Article => Some(self.normalize_article(&cleaned)),
            EntityTag::Range => self.normalize_range(&cleaned),
        };

        canonical.unwrap_or_else(|| {
            debug!(tag = %tag, raw = %cleaned, "no canonical form, comparing literally");
            cleaned
        })
    }

    fn normalize_date(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.lv_date.captures(text) {
            let month = latvian_month(&caps[3]);
            if let Some(month) = month {
                return iso_date(&caps[1], month, &caps[2]);
            }
        }

        if let Some(caps) = self.en_de_date.captures(text)
            && let Some(month) = self.months.get(caps[2].to_lowercase().as_str())
        {
            return iso_date(&caps[3], *month, &caps[1]);
        }

        let caps = self.numeric_date.captures(text)?;
        let month: u32 = caps[2].parse().ok()?;
        iso_date(&caps[3], month, &caps[1])
    }

    fn normalize_eur_amount(&self, text: &str) -> String {
        let compact: String = text
            .to_uppercase()
            .replace('€', "EUR")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        if let Some(caps) = self.eur_amount.captures(&compact) {
            let amount = caps[1].replace(',', ".");
            let scale = match caps.get(2).map(|m| m.as_str()) {
                Some(word) if BILLION_WORDS.contains(&word) => "BILLION",
                Some(_) => "MILLION",
                None => "",
            };
            return format!("EUR{amount}{scale}");
        }

        // Lexical fallback: move the marker first and translate Latvian scales.
        self.eur_suffix
            .replace_all(&compact, "EUR${1}")
            .replace("MILJARDI", "BILLION")
            .replace("MILJONI", "MILLION")
            .replace(',', ".")
    }

    fn normalize_legal_ref(&self, text: &str) -> String {
        let upper = text.to_uppercase();
        let stripped = self.legal_keywords.replace_all(&upper, "");
        let stripped = self.number_prefix.replace_all(&stripped, " ${1}");
        let reduced = clean_text(&stripped);

        let Some(caps) = self.legal_canon.captures(&reduced) else {
            debug!(raw = %text, "citation did not parse, substituting codes only");
            return self.equivalence.substitute_tokens(&reduced);
        };

        let codes = caps
            .name("codes")
            .map(|m| m.as_str().split(',').map(str::trim).collect::<Vec<_>>())
            .unwrap_or_else(|| vec![DEFAULT_CODE]);
        let codes = self.equivalence.canonical_codes(codes);
        let (year, number) = citation_year_number(&caps["first"], &caps["second"]);

        format!("({}){}/{}", codes.join(", "), year, number)
    }

    fn normalize_article(&self, text: &str) -> String {
        let marked = self.article_keyword.replace_all(text, "Art");
        match self.article_number.find(&marked) {
            Some(m) => format!("Art {}", m.as_str()),
            None => "Art".to_string(),
        }
    }

    fn normalize_range(&self, text: &str) -> Option<String> {
        let caps = self.range.captures(text)?;
        Some(format!("{}-{}", &caps[1], &caps[2]))
    }
}

/// Month number for a Latvian month token in any case form.
fn latvian_month(token: &str) -> Option<u32> {
    let lower = token.to_lowercase();
    LV_MONTH_STEMS
        .iter()
        .find(|(stem, _)| {
            lower
                .strip_prefix(stem)
                .is_some_and(|ending| LV_MONTH_ENDINGS.contains(&ending))
        })
        .map(|(_, month)| *month)
}

/// `YYYY-MM-DD` for a calendar-valid date. Two-digit years are 20YY.
fn iso_date(year: &str, month: u32, day: &str) -> Option<String> {
    let mut year: i32 = year.parse().ok()?;
    if year < 100 {
        year += 2000;
    }
    let day: u32 = day.parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

/// Decimal string of a number written with either decimal separator.
///
/// Spaces are dropped and `,` reads as `.`; a value with several separators
/// does not parse and stays literal.
fn normalize_number(text: &str) -> Option<String> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if compact.is_empty() || !compact.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    let value: f64 = compact.parse().ok()?;
    Some(format!("{value:?}"))
}

fn plausible_year(s: &str) -> Option<u32> {
    if s.len() != 4 {
        return None;
    }
    s.parse().ok().filter(|y| PLAUSIBLE_YEARS.contains(y))
}

/// Order the two halves of `A/B` as `(year, number)`.
///
/// A side that cannot be a year is the number. When both could be, YEAR/NUMBER
/// wins for modern acts and otherwise the later year is taken, so an already
/// canonical `YEAR/NUMBER` reads back unchanged.
fn citation_year_number<'a>(first: &'a str, second: &'a str) -> (&'a str, &'a str) {
    match (plausible_year(first), plausible_year(second)) {
        (Some(_), None) => (first, second),
        (None, Some(_)) => (second, first),
        (Some(a), Some(b)) if a >= YEAR_FIRST_SINCE || a >= b => (first, second),
        (Some(_), Some(_)) => (second, first),
        (None, None) => (second, first),
    }
}
