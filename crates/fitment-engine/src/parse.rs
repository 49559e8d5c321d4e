//! Parsing of raw fitment application strings.
//!
//! An application string looks like:
//!
//! ```text
//! 2005-2010 WK Grand Cherokee (Left or Right Front Upper Ball Joint);
//! ```
//!
//! The leading token is a four-digit year or a hyphenated year range.
//! Everything up to the first `(` is the vehicle description; the
//! parenthesized tail, when present, is the position segment. Trailing
//! semicolons are record separators in the source feeds and carry no
//! meaning.

use std::sync::OnceLock;

use regex::Regex;

use fitment_core::ParsedApplication;

use crate::error::ParseError;

/// Year token at the start of an application: `2005` or `2005-2010`,
/// with optional spaces around the hyphen. The trailing `\b` rejects
/// five-digit runs like `20055`.
fn year_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4})(?:\s*-\s*(\d{4}))?\b").expect("valid regex")
    })
}

/// Parses one raw application string into its structured form.
///
/// # Errors
///
/// Returns a [`ParseError`] naming the offending text when the string
/// is empty, does not start with a usable year token, has an inverted
/// year range, or has no vehicle description.
pub fn parse_application(
    raw_text: &str,
    terminology_id: i64,
) -> Result<ParsedApplication, ParseError> {
    let trimmed = raw_text
        .trim()
        .trim_end_matches(|c: char| c == ';' || c.is_whitespace());
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let caps = year_token_re()
        .captures(trimmed)
        .ok_or_else(|| ParseError::NoYearToken {
            token: first_token(trimmed),
        })?;
    let year_start: i32 = parse_year(&caps[1])?;
    let year_end: i32 = match caps.get(2) {
        Some(m) => parse_year(m.as_str())?,
        None => year_start,
    };
    if year_start > year_end {
        return Err(ParseError::InvertedYearRange {
            start: year_start,
            end: year_end,
        });
    }
    let year_token_end = caps.get(0).map_or(0, |m| m.end());

    let (vehicle_segment, position_text) = split_position_segment(trimmed);
    let vehicle_text = vehicle_segment
        .get(year_token_end..)
        .unwrap_or("")
        .trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, ';' | ',' | '.' | ':'))
        .to_string();
    if vehicle_text.is_empty() {
        return Err(ParseError::EmptyVehicleText);
    }

    Ok(ParsedApplication {
        year_start,
        year_end,
        vehicle_text,
        position_text,
        original_text: raw_text.to_string(),
        terminology_id,
    })
}

/// Splits off the parenthesized position segment, if any.
///
/// Returns the text before the first `(` and the inner text of the
/// parentheses. An unclosed `(` takes everything to the end of the
/// string as the position segment; source feeds drop closing parens
/// often enough that rejecting them would lose real data. Text after
/// the closing `)` is ignored.
fn split_position_segment(text: &str) -> (&str, Option<String>) {
    match text.find('(') {
        Some(open) => {
            let after = &text[open + 1..];
            let inner = match after.find(')') {
                Some(close) => &after[..close],
                None => after,
            };
            let inner = inner.trim();
            let position = if inner.is_empty() {
                None
            } else {
                Some(inner.to_string())
            };
            (&text[..open], position)
        }
        None => (text, None),
    }
}

fn parse_year(digits: &str) -> Result<i32, ParseError> {
    digits.parse::<i32>().map_err(|_| ParseError::NoYearToken {
        token: digits.to_string(),
    })
}

fn first_token(text: &str) -> String {
    text.split_whitespace().next().unwrap_or(text).to_string()
}
