//! Picks a registered locale from a request's `lang` value and `Accept-Language` header.
//!
//! Matching order for each requested tag, best quality first:
//! 1. same language identifier (case-insensitive, `_` and `-` treated alike)
//! 2. an available bare language covering the request (`zh-CN` → `zh`)
//! 3. same language subtag (`zh-CN` → `zh-TW`)
//!
//! Quality values are kept in thousandths so no floating point is involved.

use unic_langid::LanguageIdentifier;

use crate::types::parse_locale_tag;

/// Highest quality value (`q=1`).
const MAX_QUALITY: u16 = 1000;

/// One entry of an `Accept-Language` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRange {
    /// Requested language identifier.
    pub tag: LanguageIdentifier,
    /// Quality in thousandths, `0..=1000`.
    pub quality: u16,
}

/// Parses an `Accept-Language` value into ranges ordered by descending quality.
///
/// Entries with `q=0`, malformed quality values, unparsable tags and the `*` wildcard are
/// dropped.
/// Ranges with equal quality keep their header order.
///
/// # Examples
/// ```
/// use oneterm_i18n::negotiate::parse_accept_language;
///
/// let ranges = parse_accept_language("en;q=0.8, zh-CN, zh;q=0.9");
/// let tags: Vec<String> = ranges.iter().map(|r| r.tag.to_string()).collect();
/// assert_eq!(tags, ["zh-CN", "zh", "en"]);
/// ```
#[must_use]
pub fn parse_accept_language(header: &str) -> Vec<LanguageRange> {
    let mut ranges: Vec<LanguageRange> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parse_locale_tag(parts.next()?.trim())?;
            let mut quality = MAX_QUALITY;
            for param in parts {
                let Some((name, value)) = param.split_once('=') else {
                    continue;
                };
                if name.trim().eq_ignore_ascii_case("q") {
                    quality = parse_quality(value.trim())?;
                }
            }
            (quality > 0).then_some(LanguageRange { tag, quality })
        })
        .collect();
    ranges.sort_by(|a, b| b.quality.cmp(&a.quality));
    ranges
}

/// Parses a quality value (`1`, `0.8`, `0.125`, `1.000`) into thousandths.
fn parse_quality(value: &str) -> Option<u16> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if fraction.len() > 3 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: u16 = match whole {
        "0" => 0,
        "1" => 1,
        _ => return None,
    };
    let mut thousandths: u16 = 0;
    let mut scale: u16 = 100;
    for digit in fraction.chars().filter_map(|c| c.to_digit(10)) {
        thousandths += u16::try_from(digit).ok()? * scale;
        scale /= 10;
    }
    let quality = whole * MAX_QUALITY + thousandths;
    (quality <= MAX_QUALITY).then_some(quality)
}

/// Chooses the best entry of `available` for the request.
///
/// `lang` is an explicit choice (a form value or query parameter) and is tried before the
/// header; it may itself be a comma separated list. Returns the matching entry of `available`
/// as given, or `None` when nothing matches.
#[must_use]
pub fn negotiate<'a, S: AsRef<str>>(
    lang: Option<&str>,
    accept_language: Option<&str>,
    available: &'a [S],
) -> Option<&'a str> {
    let requested = lang
        .into_iter()
        .chain(accept_language)
        .flat_map(parse_accept_language);

    for range in requested {
        if let Some(found) = match_range(&range.tag, available) {
            tracing::debug!(requested = %range.tag, matched = found, "Negotiated locale");
            return Some(found);
        }
    }
    None
}

/// Finds the entry of `available` matching one requested identifier.
fn match_range<'a, S: AsRef<str>>(
    requested: &LanguageIdentifier,
    available: &'a [S],
) -> Option<&'a str> {
    let parsed: Vec<(LanguageIdentifier, &'a str)> = available
        .iter()
        .filter_map(|a| Some((parse_locale_tag(a.as_ref())?, a.as_ref())))
        .collect();

    parsed
        .iter()
        .find(|(id, _)| id == requested)
        .or_else(|| {
            parsed.iter().find(|(id, _)| {
                id.language == requested.language && id.script.is_none() && id.region.is_none()
            })
        })
        .or_else(|| parsed.iter().find(|(id, _)| id.language == requested.language))
        .map(|(_, original)| *original)
}
