//! Science variable selection.
//!
//! OOI streams mix measured quantities with engineering, QC and provenance
//! fields. A variable counts as a science variable when none of the exclusion
//! fragments occurs anywhere in its name.

use crate::error::{OoiPlotError, Result};
use regex::Regex;

/// Fragments used by the timeseries and depth-profile tools.
pub const STANDARD_FRAGMENTS: &[&str] = &[
    "quality", "string", "timestamp", "deployment", "id", "provenance", "qc", "time", "mission",
    "obs", "volt", "ref", "sig", "amp", "rph", "calphase", "phase", "therm",
];

/// Short list used by the first timeseries tool.
pub const MINIMAL_FRAGMENTS: &[&str] = &[
    "timestamp", "provenance", "qc", "id", "obs", "deployment", "volts", "counts",
];

/// Additional fragments for hourly bulk meteorology (METBK) streams.
pub const METBK_EXTRA_FRAGMENTS: &[&str] =
    &["error_code", "analog", "lat", "lon", "serial_number", "ct_depth"];

/// Named starting points for an exclusion set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExclusionPreset {
    /// [`STANDARD_FRAGMENTS`].
    #[default]
    Standard,
    /// [`MINIMAL_FRAGMENTS`].
    Minimal,
    /// [`STANDARD_FRAGMENTS`] plus [`METBK_EXTRA_FRAGMENTS`].
    Metbk,
}

impl ExclusionPreset {
    /// Fragments making up this preset, in order.
    pub fn fragments(self) -> Vec<&'static str> {
        match self {
            Self::Standard => STANDARD_FRAGMENTS.to_vec(),
            Self::Minimal => MINIMAL_FRAGMENTS.to_vec(),
            Self::Metbk => STANDARD_FRAGMENTS
                .iter()
                .chain(METBK_EXTRA_FRAGMENTS)
                .copied()
                .collect(),
        }
    }
}

/// An ordered set of case-sensitive substrings that mark a variable as
/// non-science.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    fragments: Vec<String>,
    // None when there are no fragments: an empty alternation would match everything.
    matcher: Option<Regex>,
}

impl ExclusionSet {
    /// Build a set from fragments. Empty fragments are rejected.
    pub fn new<I, S>(fragments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fragments: Vec<String> = fragments.into_iter().map(Into::into).collect();
        if fragments.iter().any(|f| f.is_empty()) {
            return Err(OoiPlotError::EmptyFragment);
        }

        let matcher = if fragments.is_empty() {
            None
        } else {
            let alternation = fragments
                .iter()
                .map(|f| regex::escape(f))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&alternation)?)
        };

        Ok(Self { fragments, matcher })
    }

    /// Build a set from a preset plus extra fragments.
    pub fn from_preset<I, S>(preset: ExclusionPreset, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fragments = preset
            .fragments()
            .into_iter()
            .map(String::from)
            .chain(extra.into_iter().map(Into::into));
        Self::new(fragments)
    }

    /// The fragments, in the order given.
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Whether any fragment occurs in `name`.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.matcher.as_ref().is_some_and(|re| re.is_match(name))
    }
}

/// Keep the names no exclusion fragment matches, in input order.
pub fn select_science_variables<I, S>(
    all_variable_names: I,
    exclusions: &ExclusionSet,
) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    all_variable_names
        .into_iter()
        .filter(|name| !exclusions.is_excluded(name.as_ref()))
        .map(|name| name.as_ref().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: &[&str] = &[
        "dissolved_oxygen",
        "dosta_abcdjm_cspp_tc_oxygen",
        "driver_timestamp",
        "dissolved_oxygen_qc_executed",
        "preferred_timestamp",
        "optode_temperature",
        "calibrated_phase",
        "estimated_oxygen_concentration",
        "provenance",
        "deployment",
        "id",
        "time",
        "pressure",
    ];

    fn brute_force(names: &[&str], fragments: &[&str]) -> Vec<String> {
        names
            .iter()
            .filter(|n| !fragments.iter().any(|f| n.contains(f)))
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn test_selection_matches_substring_definition() {
        for preset in [
            ExclusionPreset::Standard,
            ExclusionPreset::Minimal,
            ExclusionPreset::Metbk,
        ] {
            let set = ExclusionSet::from_preset(preset, Vec::<String>::new()).unwrap();
            let selected = select_science_variables(NAMES.iter(), &set);
            assert_eq!(selected, brute_force(NAMES, &preset.fragments()), "{:?}", preset);
        }
    }

    #[test]
    fn test_standard_preset_keeps_science_variables() {
        let set =
            ExclusionSet::from_preset(ExclusionPreset::Standard, Vec::<String>::new()).unwrap();
        let selected = select_science_variables(NAMES.iter(), &set);
        assert_eq!(
            selected,
            vec![
                "dissolved_oxygen",
                "dosta_abcdjm_cspp_tc_oxygen",
                "optode_temperature",
                "estimated_oxygen_concentration",
                "pressure",
            ]
        );
    }

    #[test]
    fn test_selection_is_idempotent() {
        let set = ExclusionSet::new(["qc", "time", "phase"]).unwrap();
        let once = select_science_variables(NAMES.iter(), &set);
        let twice = select_science_variables(once.iter(), &set);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let set = ExclusionSet::new(["qc"]).unwrap();
        assert!(set.is_excluded("temperature_qc_results"));
        assert!(!set.is_excluded("temperature_QC_results"));
    }

    #[test]
    fn test_fragments_are_literal() {
        // A dot must not behave like a regex wildcard.
        let set = ExclusionSet::new(["a.b"]).unwrap();
        assert!(set.is_excluded("xa.by"));
        assert!(!set.is_excluded("axb"));
    }

    #[test]
    fn test_empty_fragment_is_rejected() {
        let err = ExclusionSet::new(["qc", ""]).unwrap_err();
        assert!(matches!(err, OoiPlotError::EmptyFragment));
    }

    #[test]
    fn test_empty_set_excludes_nothing() {
        let set = ExclusionSet::new(Vec::<String>::new()).unwrap();
        assert_eq!(select_science_variables(NAMES.iter(), &set).len(), NAMES.len());
    }

    #[test]
    fn test_extra_fragments_follow_preset() {
        let set = ExclusionSet::from_preset(ExclusionPreset::Minimal, ["oxygen"]).unwrap();
        assert_eq!(set.fragments().last().map(String::as_str), Some("oxygen"));
        assert!(set.is_excluded("dissolved_oxygen"));
    }
}
