//! Position vocabulary for fitment applications.
//!
//! A part position is described along four independent dimensions (side,
//! end, height, depth). Free-form application text is reduced to one or
//! more [`PositionGroup`]s; each group is a canonical, ordered set of
//! [`PositionAxis`] values, or one of the two sentinel groups for text
//! that carries no position (`N/A`) or an unrecognized one (`Varies`).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label used when application text contains no position segment.
pub const NOT_APPLICABLE_LABEL: &str = "N/A";

/// Label used when a position segment exists but no axis keyword was
/// recognized in it.
pub const VARIES_LABEL: &str = "Varies with Application";

/// One recognized position keyword.
///
/// Variant order is the canonical label order: side, then end, then
/// height, then depth. `Ord` on this enum is what keeps rendered labels
/// like `"Left Front Upper"` stable regardless of the order keywords
/// appeared in the source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum PositionAxis {
    Left,
    Right,
    Center,
    Front,
    Rear,
    Upper,
    Lower,
    Inner,
    Outer,
}

/// The dimension a [`PositionAxis`] belongs to.
///
/// Axes on different dimensions combine within one group; axes on the
/// same dimension are alternatives and live in separate groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisDimension {
    Lateral,
    Longitudinal,
    Vertical,
    Depth,
}

impl PositionAxis {
    /// All axes, in canonical label order.
    pub const ALL: [Self; 9] = [
        Self::Left,
        Self::Right,
        Self::Center,
        Self::Front,
        Self::Rear,
        Self::Upper,
        Self::Lower,
        Self::Inner,
        Self::Outer,
    ];

    /// Matches a single word against the position vocabulary,
    /// case-insensitively. Returns `None` for anything that is not an
    /// axis keyword.
    #[must_use]
    pub fn from_keyword(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|axis| axis.as_str().eq_ignore_ascii_case(word))
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Center => "Center",
            Self::Front => "Front",
            Self::Rear => "Rear",
            Self::Upper => "Upper",
            Self::Lower => "Lower",
            Self::Inner => "Inner",
            Self::Outer => "Outer",
        }
    }

    #[must_use]
    pub fn dimension(self) -> AxisDimension {
        match self {
            Self::Left | Self::Right | Self::Center => AxisDimension::Lateral,
            Self::Front | Self::Rear => AxisDimension::Longitudinal,
            Self::Upper | Self::Lower => AxisDimension::Vertical,
            Self::Inner | Self::Outer => AxisDimension::Depth,
        }
    }
}

impl fmt::Display for PositionAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single position a fitment applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionGroup {
    /// Recognized axes, deduplicated and in canonical order.
    Axes(Vec<PositionAxis>),
    /// The application text had no position segment at all.
    NotApplicable,
    /// A position segment was present but none of its words matched the
    /// vocabulary. Kept distinct so validation can flag it for review.
    Varies,
}

impl PositionGroup {
    /// Builds a group from any collection of axes, deduplicating and
    /// sorting into canonical order. An empty collection yields
    /// [`PositionGroup::NotApplicable`].
    #[must_use]
    pub fn from_axes<I>(axes: I) -> Self
    where
        I: IntoIterator<Item = PositionAxis>,
    {
        let set: BTreeSet<PositionAxis> = axes.into_iter().collect();
        if set.is_empty() {
            Self::NotApplicable
        } else {
            Self::Axes(set.into_iter().collect())
        }
    }

    /// Canonical display label, e.g. `"Left Front Upper"`, `"N/A"`, or
    /// `"Varies with Application"`. This is the exact string compared
    /// against the part-position catalog and persisted with fitments.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Axes(axes) => {
                let words: Vec<&str> = axes.iter().map(|axis| axis.as_str()).collect();
                words.join(" ")
            }
            Self::NotApplicable => NOT_APPLICABLE_LABEL.to_string(),
            Self::Varies => VARIES_LABEL.to_string(),
        }
    }

    #[must_use]
    pub fn is_varies(&self) -> bool {
        matches!(self, Self::Varies)
    }

    /// Whether the group carries an axis on the given dimension.
    #[must_use]
    pub fn has_dimension(&self, dimension: AxisDimension) -> bool {
        match self {
            Self::Axes(axes) => axes.iter().any(|axis| axis.dimension() == dimension),
            Self::NotApplicable | Self::Varies => false,
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_lookup_is_case_insensitive() {
        assert_eq!(PositionAxis::from_keyword("front"), Some(PositionAxis::Front));
        assert_eq!(PositionAxis::from_keyword("FRONT"), Some(PositionAxis::Front));
        assert_eq!(PositionAxis::from_keyword("Front"), Some(PositionAxis::Front));
        assert_eq!(PositionAxis::from_keyword("frnt"), None);
        assert_eq!(PositionAxis::from_keyword(""), None);
    }

    #[test]
    fn from_axes_sorts_and_dedups() {
        let group = PositionGroup::from_axes([
            PositionAxis::Upper,
            PositionAxis::Front,
            PositionAxis::Left,
            PositionAxis::Front,
        ]);
        assert_eq!(
            group,
            PositionGroup::Axes(vec![
                PositionAxis::Left,
                PositionAxis::Front,
                PositionAxis::Upper,
            ])
        );
        assert_eq!(group.label(), "Left Front Upper");
    }

    #[test]
    fn from_axes_empty_is_not_applicable() {
        assert_eq!(PositionGroup::from_axes([]), PositionGroup::NotApplicable);
    }

    #[test]
    fn sentinel_labels() {
        assert_eq!(PositionGroup::NotApplicable.label(), "N/A");
        assert_eq!(PositionGroup::Varies.label(), "Varies with Application");
        assert!(PositionGroup::Varies.is_varies());
        assert!(!PositionGroup::NotApplicable.is_varies());
    }

    #[test]
    fn dimensions_partition_the_vocabulary() {
        assert_eq!(PositionAxis::Left.dimension(), AxisDimension::Lateral);
        assert_eq!(PositionAxis::Center.dimension(), AxisDimension::Lateral);
        assert_eq!(PositionAxis::Rear.dimension(), AxisDimension::Longitudinal);
        assert_eq!(PositionAxis::Lower.dimension(), AxisDimension::Vertical);
        assert_eq!(PositionAxis::Outer.dimension(), AxisDimension::Depth);
    }

    #[test]
    fn has_dimension_reports_axis_coverage() {
        let group = PositionGroup::from_axes([PositionAxis::Left, PositionAxis::Upper]);
        assert!(group.has_dimension(AxisDimension::Lateral));
        assert!(group.has_dimension(AxisDimension::Vertical));
        assert!(!group.has_dimension(AxisDimension::Longitudinal));
        assert!(!PositionGroup::Varies.has_dimension(AxisDimension::Lateral));
    }

    #[test]
    fn group_serializes_with_snake_case_tags() {
        let group = PositionGroup::from_axes([PositionAxis::Front]);
        let json = serde_json::to_string(&group).expect("serialize group");
        assert_eq!(json, r#"{"axes":["Front"]}"#);
        let sentinel = serde_json::to_string(&PositionGroup::Varies).expect("serialize sentinel");
        assert_eq!(sentinel, r#""varies""#);
    }
}
