// Convert wire strings into numbers and lookup-safe country keys.

use ahash::AHashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::case_data::adapters::DecodeError;

/// Asset name used when no flag exists for a country key.
pub const MISSING_FLAG: &str = "FlagMissing";

/// Asset name for the global totals row.
pub const GLOBE_FLAG: &str = "globe";

/// Build the key used to look up per-country assets (flags).
///
/// Display text is never passed through this; records keep the feed's spelling.
/// Steps run in a fixed order:
/// 1. drop every `*` (footnote markers),
/// 2. drop trailing whitespace,
/// 3. fold diacritics to their base letters,
/// 4. turn `’` into `'`.
pub fn normalize_country_key(raw: &str) -> String {
    let unstarred = raw.replace('*', "");
    let trimmed = unstarred.trim_end();
    let folded = fold_diacritics(trimmed);
    // a mark sitting on trailing whitespace strands that whitespace once folded
    folded.trim_end().replace('\u{2019}', "'")
}

fn fold_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).nfc().collect()
}

/// Resolve the flag asset for `country`, falling back to [`MISSING_FLAG`].
pub fn resolve_flag_key<'a>(country: &str, available: &'a AHashSet<String>) -> &'a str {
    let key = normalize_country_key(country);
    available.get(&key).map(String::as_str).unwrap_or(MISSING_FLAG)
}

/// Strip thousands separators: `"1,234"` -> `"1234"`.
pub fn normalize_numeric_string(raw: &str) -> String {
    raw.replace(',', "")
}

/// Parse a comma-grouped count. Empty, garbage and non-finite inputs are errors;
/// callers decide whether to substitute zero.
pub fn parse_count(field: &'static str, raw: &str) -> Result<f64, DecodeError> {
    let cleaned = normalize_numeric_string(raw);
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(DecodeError::FieldParse { field, raw: raw.to_string() }),
    }
}

/// Lenient variant used by the SCMP feed: anything unparsable counts as zero.
pub fn parse_count_or_zero(field: &'static str, raw: &str) -> f64 {
    parse_count(field, raw).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "substituting zero for unparsable count");
        0.0
    })
}
