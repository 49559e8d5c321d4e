//! Expansion of parsed applications into their enumerable parts.
//!
//! Two expansions happen here: a year range becomes the full list of
//! years it covers, and free-form position text becomes one or more
//! canonical [`PositionGroup`]s.
//!
//! Position text is a tiny grammar over the axis vocabulary. Within
//! one alternative, keywords combine (`"Front Upper"` is one group);
//! `or` splits alternatives into separate groups. Alternatives inherit
//! axes they do not mention from the last alternative, dimension by
//! dimension, so `"Left or Right Front Upper"` reads as
//! `Left Front Upper` / `Right Front Upper`. Words outside the
//! vocabulary (part nouns like `"Ball Joint"`) are ignored unless
//! nothing at all is recognized, in which case the whole segment is
//! [`PositionGroup::Varies`].

use std::collections::BTreeSet;

use fitment_core::{AxisDimension, PositionAxis, PositionGroup};

use crate::error::ParseError;

const DIMENSIONS: [AxisDimension; 4] = [
    AxisDimension::Lateral,
    AxisDimension::Longitudinal,
    AxisDimension::Vertical,
    AxisDimension::Depth,
];

/// Expands an inclusive year range into individual years, ascending.
///
/// # Errors
///
/// Returns [`ParseError::InvertedYearRange`] when `end < start`.
pub fn expand_year_range(start: i32, end: i32) -> Result<Vec<i32>, ParseError> {
    if end < start {
        return Err(ParseError::InvertedYearRange { start, end });
    }
    Ok((start..=end).collect())
}

/// Reduces raw position text to canonical position groups.
///
/// Absent or blank text yields a single [`PositionGroup::NotApplicable`];
/// text with no recognizable axis keyword yields a single
/// [`PositionGroup::Varies`]. Otherwise one group per alternative, in
/// the order the alternatives appeared, with exact duplicates removed.
#[must_use]
pub fn extract_positions(position_text: Option<&str>) -> Vec<PositionGroup> {
    let Some(text) = position_text else {
        return vec![PositionGroup::NotApplicable];
    };
    if text.trim().is_empty() {
        return vec![PositionGroup::NotApplicable];
    }

    let mut alternatives: Vec<BTreeSet<PositionAxis>> = Vec::new();
    for segment in split_alternatives(text) {
        let axes: BTreeSet<PositionAxis> = segment
            .iter()
            .filter_map(|word| PositionAxis::from_keyword(word))
            .collect();
        if !axes.is_empty() {
            alternatives.push(axes);
        }
    }
    let Some(last) = alternatives.last().cloned() else {
        return vec![PositionGroup::Varies];
    };

    // Earlier alternatives inherit the final alternative's axes on any
    // dimension they leave unmentioned.
    for axes in &mut alternatives {
        let missing: Vec<AxisDimension> = DIMENSIONS
            .into_iter()
            .filter(|dim| !axes.iter().any(|axis| axis.dimension() == *dim))
            .collect();
        for axis in &last {
            if missing.contains(&axis.dimension()) {
                axes.insert(*axis);
            }
        }
    }

    let mut groups: Vec<PositionGroup> = alternatives
        .into_iter()
        .map(PositionGroup::from_axes)
        .collect();
    groups.dedup();
    groups
}

/// Splits position text into alternatives on the word `or`.
///
/// Tokens are whitespace-separated with surrounding punctuation
/// stripped. `either` and `and` are pure separators and never start or
/// end an alternative on their own.
fn split_alternatives(text: &str) -> Vec<Vec<&str>> {
    let mut alternatives: Vec<Vec<&str>> = vec![Vec::new()];
    for raw in text.split_whitespace() {
        let word = raw.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        if word.is_empty() || word.eq_ignore_ascii_case("either") {
            continue;
        }
        if word.eq_ignore_ascii_case("or") {
            if alternatives.last().is_some_and(|alt| !alt.is_empty()) {
                alternatives.push(Vec::new());
            }
            continue;
        }
        if word.eq_ignore_ascii_case("and") {
            continue;
        }
        if let Some(current) = alternatives.last_mut() {
            current.push(word);
        }
    }
    alternatives.retain(|alt| !alt.is_empty());
    alternatives
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(text: &str) -> Vec<PositionGroup> {
        extract_positions(Some(text))
    }

    fn axes(list: &[PositionAxis]) -> PositionGroup {
        PositionGroup::from_axes(list.iter().copied())
    }

    #[test]
    fn range_expands_ascending_inclusive() {
        assert_eq!(
            expand_year_range(2005, 2010).expect("valid range"),
            vec![2005, 2006, 2007, 2008, 2009, 2010]
        );
    }

    #[test]
    fn degenerate_range_is_one_year() {
        assert_eq!(expand_year_range(2007, 2007).expect("valid range"), vec![2007]);
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert_eq!(
            expand_year_range(2010, 2005),
            Err(ParseError::InvertedYearRange {
                start: 2010,
                end: 2005
            })
        );
    }

    #[test]
    fn no_text_is_not_applicable() {
        assert_eq!(extract_positions(None), vec![PositionGroup::NotApplicable]);
        assert_eq!(positions("   "), vec![PositionGroup::NotApplicable]);
    }

    #[test]
    fn unrecognized_text_varies() {
        assert_eq!(positions("Ball Joint"), vec![PositionGroup::Varies]);
        assert_eq!(positions("w/ HD suspension"), vec![PositionGroup::Varies]);
    }

    #[test]
    fn single_axis() {
        assert_eq!(positions("Front"), vec![axes(&[PositionAxis::Front])]);
    }

    #[test]
    fn part_nouns_are_ignored_when_axes_exist() {
        assert_eq!(
            positions("Front Upper Ball Joint"),
            vec![axes(&[PositionAxis::Front, PositionAxis::Upper])]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        assert_eq!(
            positions("FRONT lower"),
            vec![axes(&[PositionAxis::Front, PositionAxis::Lower])]
        );
    }

    #[test]
    fn conjunction_keeps_one_group() {
        assert_eq!(
            positions("Front and Rear"),
            vec![axes(&[PositionAxis::Front, PositionAxis::Rear])]
        );
    }

    #[test]
    fn disjunction_splits_groups() {
        assert_eq!(
            positions("Front or Rear"),
            vec![axes(&[PositionAxis::Front]), axes(&[PositionAxis::Rear])]
        );
    }

    #[test]
    fn alternatives_inherit_unmentioned_dimensions() {
        assert_eq!(
            positions("Left or Right Front Upper Ball Joint"),
            vec![
                axes(&[PositionAxis::Left, PositionAxis::Front, PositionAxis::Upper]),
                axes(&[PositionAxis::Right, PositionAxis::Front, PositionAxis::Upper]),
            ]
        );
    }

    #[test]
    fn inheritance_never_overwrites_a_mentioned_dimension() {
        assert_eq!(
            positions("Upper or Lower Rear"),
            vec![
                axes(&[PositionAxis::Rear, PositionAxis::Upper]),
                axes(&[PositionAxis::Rear, PositionAxis::Lower]),
            ]
        );
    }

    #[test]
    fn either_is_a_pure_marker() {
        assert_eq!(
            positions("Either Left or Right"),
            vec![axes(&[PositionAxis::Left]), axes(&[PositionAxis::Right])]
        );
    }

    #[test]
    fn duplicate_keywords_collapse() {
        assert_eq!(
            positions("Front Front Upper"),
            vec![axes(&[PositionAxis::Front, PositionAxis::Upper])]
        );
    }

    #[test]
    fn duplicate_alternatives_collapse() {
        assert_eq!(positions("Front or Front"), vec![axes(&[PositionAxis::Front])]);
    }

    #[test]
    fn attached_punctuation_is_stripped() {
        assert_eq!(
            positions("Left, or Right"),
            vec![axes(&[PositionAxis::Left]), axes(&[PositionAxis::Right])]
        );
    }

    #[test]
    fn labels_come_out_in_canonical_order() {
        let groups = positions("Upper Front Left");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label(), "Left Front Upper");
    }

    #[test]
    fn dangling_or_is_harmless() {
        assert_eq!(positions("Front or"), vec![axes(&[PositionAxis::Front])]);
        assert_eq!(positions("or Front"), vec![axes(&[PositionAxis::Front])]);
    }
}
