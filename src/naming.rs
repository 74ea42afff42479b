//! Plot titles, file names and output directories.
//!
//! Names must stay byte-for-byte compatible with plots produced earlier, so
//! both timestamp layouts are fixed.

use crate::data::DatasetIdentity;
use crate::plot::PlotKind;
use crate::segment::TimeSegment;
use std::path::{Path, PathBuf};

/// Timestamp layout used in titles.
pub const TITLE_TIME_FORMAT: &str = "%Y.%m.%dT%H.%M.00";

/// Timestamp layout used in file names.
pub const SAVE_TIME_FORMAT: &str = "%Y-%m-%dT%H%M00";

/// Suffix of the outliers-removed variant of a plot.
pub const OUTLIERS_REMOVED_SUFFIX: &str = "_outliers_removed";

/// Figure title for `variable` over `segment`.
pub fn build_title(
    identity: &DatasetIdentity,
    variable: &str,
    segment: &TimeSegment,
) -> String {
    format!(
        "{}-{}\nStream: {}\nVariable: {}\n{} - {}",
        identity.subsite,
        identity.node,
        identity.stream,
        variable,
        segment.start.format(TITLE_TIME_FORMAT),
        segment.end.format(TITLE_TIME_FORMAT),
    )
}

/// File name (without extension) for `variable` over `segment`.
pub fn build_save_name(
    identity: &DatasetIdentity,
    variable: &str,
    segment: &TimeSegment,
) -> String {
    format!(
        "{}-{}-{}_{}_{}-{}",
        identity.subsite,
        identity.node,
        identity.sensor,
        variable,
        segment.start.format(SAVE_TIME_FORMAT),
        segment.end.format(SAVE_TIME_FORMAT),
    )
}

/// `<out>/<site>/<deployment>/<node>/<sensor>/<stream>/<plot_kind>`.
pub fn output_dir(out: &Path, identity: &DatasetIdentity, kind: PlotKind) -> PathBuf {
    out.join(&identity.subsite)
        .join(identity.deployment_code())
        .join(&identity.node)
        .join(&identity.sensor)
        .join(&identity.stream)
        .join(kind.dir_name())
}

/// File name up to the first `.`, e.g. `deployment0001_GI01SUMO-...-metbk_hourly`.
pub fn file_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match name.split_once('.') {
        Some((stem, _)) => stem.to_string(),
        None => name,
    }
}

/// Title of figures joining several files: `<subsite>-<node>-<sensor>`.
pub fn build_aggregate_title(identity: &DatasetIdentity) -> String {
    format!("{}-{}-{}", identity.subsite, identity.node, identity.sensor)
}

/// File name (without extension) of a joined figure: `<stem>_<variable>`.
pub fn build_aggregate_save_name(stem: &str, variable: &str) -> String {
    format!("{}_{}", stem, variable)
}

/// `<out>/<plot_kind>/<prefix>`, where the prefix is the stem up to its
/// first `_` (normally `deploymentNNNN`).
pub fn aggregate_output_dir(out: &Path, stem: &str, kind: PlotKind) -> PathBuf {
    let prefix = stem.split('_').next().unwrap_or(stem);
    out.join(kind.dir_name()).join(prefix)
}
