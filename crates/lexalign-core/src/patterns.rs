//! Cross-lingual pattern catalog.
//!
//! One rule per entity tag, each recognising the union of the English, German,
//! and Latvian surface forms for that tag. All rules are case-insensitive and
//! free of capture groups; matches are non-overlapping, leftmost-first.

use regex::{Match, Regex};

use crate::error::CoreError;
use crate::tag::EntityTag;

/// Legal instrument keywords (EN/DE/LV), longest alternatives first.
pub(crate) const LEGAL_KEYWORDS: &str = concat!(
    "Regulation|Regulas|Regulu|Regulā|Regula|Verordnung|",
    "Directive|Direktīvas|Direktīva|Richtlinie|",
    "Decision|Lēmuma|Lēmums|Beschluss"
);

/// Institution codes accepted inside citation parentheses.
const CODES: &str = r"(?:EURATOM|EU|ES|EK|EC)(?:\s*,\s*(?:EURATOM|EU|ES|EK|EC))*";

/// Citation number in either NUMBER/YEAR or YEAR/NUMBER order.
const CITATION_NUMBER: &str = r"(?:\d{4}\s*/\s*\d{1,6}|\d{1,6}\s*/\s*\d{4})";

const NUMBER_PREFIX: &str = r"(?:(?:No|Nr|N)\.?\s*)?";

const EN_DE_MONTHS: &str = concat!(
    "Jan(?:uary|uar)?|Feb(?:ruary|ruar)?|März|Maerz|Mar(?:ch)?|Apr(?:il)?|",
    "Ma[iy]|Jun[ei]?|Jul[yi]?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|",
    "O[ck]t(?:ober)?|Nov(?:ember)?|De[cz](?:ember)?"
);

/// Latvian month stems, each completed by one of [`LV_MONTH_ENDINGS`].
pub(crate) const LV_MONTH_STEMS: &[(&str, u32)] = &[
    ("janvār", 1),
    ("februār", 2),
    ("mart", 3),
    ("aprīl", 4),
    ("aprīļ", 4),
    ("maij", 5),
    ("jūnij", 6),
    ("jūlij", 7),
    ("august", 8),
    ("septembr", 9),
    ("oktobr", 10),
    ("novembr", 11),
    ("decembr", 12),
];

/// Nominative, genitive, locative, and dative month endings.
pub(crate) const LV_MONTH_ENDINGS: &[&str] = &["is", "im", "am", "s", "ī", "ā", "a"];

const NUMERIC_BODY: &str = r"\d{1,6}(?:[.,\s]\d{3})*(?:[.,]\d+)?";

const SCALE_WORDS: &str =
    "miljardi|miljoni|Milliarden|Milliarde|Millionen|Million|billion|Mio|Mrd";

const ARTICLE_KEYWORDS: &str = "Article|Artikel|Art\\.?|pants|panta|pantā|pantu";

fn date_pattern() -> String {
    let lv_stems: Vec<&str> = LV_MONTH_STEMS.iter().map(|(stem, _)| *stem).collect();
    format!(
        concat!(
            r"(?i)(?:",
            r"\b\d{{4}}\.\s*(?:gada\s*)?\d{{1,2}}\.\s*(?:{lv})(?:{lv_end})\b",
            r"|\b\d{{1,2}}[.\-/]?\s*(?:{en_de})\.?\s*\d{{2,4}}\b",
            r"|\b\d{{1,2}}[.\-/]\d{{1,2}}[.\-/]\d{{2,4}}\b",
            r")"
        ),
        lv = lv_stems.join("|"),
        lv_end = LV_MONTH_ENDINGS.join("|"),
        en_de = EN_DE_MONTHS,
    )
}

fn number_pattern() -> String {
    format!("(?i){NUMERIC_BODY}")
}

fn eur_amount_pattern() -> String {
    format!(
        concat!(
            r"(?i)(?:EUR|€)\s?{num}(?:\s?(?:{scale}))?",
            r"|{num}\s?(?:{scale})(?:\s?(?:EUR|€))?",
            r"|{num}\s?(?:EUR|€)"
        ),
        num = NUMERIC_BODY,
        scale = SCALE_WORDS,
    )
}

fn percent_pattern() -> String {
    r"(?i)\b\d{1,3}(?:[.,]\d+)?\s?%".to_string()
}

fn legal_ref_pattern() -> String {
    format!(
        concat!(
            r"(?i)\b(?:Council\s+)?(?:{kw})\s*\({codes}\)\s*{prefix}{num}\b",
            r"|\({codes}\)\s*{prefix}{num}\b"
        ),
        kw = LEGAL_KEYWORDS,
        codes = CODES,
        prefix = NUMBER_PREFIX,
        num = CITATION_NUMBER,
    )
}

fn article_pattern() -> String {
    format!(
        concat!(
            r"(?i)\b(?:{kw})\s*\d+[a-z]?(?:\(\d+\))?",
            r"|\b\d+[a-z]?\.\s*(?:pants|panta|pantā|pantu)\b"
        ),
        kw = ARTICLE_KEYWORDS,
    )
}

fn range_pattern() -> String {
    r"(?i)\b\d{4}\s?[–\-—]\s?\d{4}\b".to_string()
}

fn compile(name: &'static str, pattern: &str) -> Result<Regex, CoreError> {
    Regex::new(pattern).map_err(|source| CoreError::Pattern { name, source })
}

/// Compiled matching rules, one per [`EntityTag`], in catalog order.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<(EntityTag, Regex)>,
}

impl PatternCatalog {
    /// Compile the built-in rules.
    pub fn new() -> Result<Self, CoreError> {
        let rules = EntityTag::ALL
            .into_iter()
            .map(|tag| {
                let pattern = match tag {
                    EntityTag::Date => date_pattern(),
                    EntityTag::Number => number_pattern(),
                    EntityTag::EurAmount => eur_amount_pattern(),
                    EntityTag::Percent => percent_pattern(),
                    EntityTag::LegalRef => legal_ref_pattern(),
                    EntityTag::Article => article_pattern(),
                    EntityTag::Range => range_pattern(),
                };
                compile(tag.as_str(), &pattern).map(|re| (tag, re))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// Tags with their rules, in catalog order.
    pub fn rules(&self) -> impl Iterator<Item = (EntityTag, &Regex)> {
        self.rules.iter().map(|(tag, re)| (*tag, re))
    }

    pub fn rule(&self, tag: EntityTag) -> Option<&Regex> {
        self.rules.iter().find(|(t, _)| *t == tag).map(|(_, re)| re)
    }

    /// All non-overlapping matches of one tag's rule, left to right.
    pub fn find_all<'t>(&self, tag: EntityTag, text: &'t str) -> Vec<Match<'t>> {
        let Some(re) = self.rule(tag) else {
            return Vec::new();
        };
        re.find_iter(text)
            .filter(|m| tag != EntityTag::Number || !touches_letter(text, m))
            .collect()
    }
}

/// Bare numbers must not be glued to letters on either side ("A4", "5G").
fn touches_letter(text: &str, m: &Match<'_>) -> bool {
    let before = text[..m.start()].chars().next_back();
    let after = text[m.end()..].chars().next();
    before.is_some_and(char::is_alphabetic) || after.is_some_and(char::is_alphabetic)
}
