//! Resolving the `files` argument into dataset references.

use crate::error::{OoiPlotError, Result};
use std::path::Path;

/// Whether `reference` names a dataset directly rather than a manifest.
pub fn is_dataset_reference(reference: &str) -> bool {
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    matches!(
        Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("nc" | "ncml")
    )
}

/// Whether `reference` is a remote URL rather than a local path.
pub fn is_remote(reference: &str) -> bool {
    reference.contains("://")
}

/// Dataset references named by `files`: the reference itself, or the entries
/// of the manifest it points to.
pub fn resolve_inputs(files: &str) -> Result<Vec<String>> {
    if is_dataset_reference(files) {
        return Ok(vec![files.to_string()]);
    }
    let text = std::fs::read_to_string(files)
        .map_err(|e| OoiPlotError::file_open(files.into(), e))?;
    Ok(parse_manifest(&text))
}

/// One reference per line. A line containing `#` anywhere is skipped whole.
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.contains('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_lines_are_skipped_entirely() {
        let text = "\
# recovered host
http://example.org/a.ncml
/data/b.nc # trailing note

/data/c.nc\r
";
        assert_eq!(
            parse_manifest(text),
            vec!["http://example.org/a.ncml", "/data/c.nc"]
        );
    }

    #[test]
    fn test_dataset_reference_detection() {
        assert!(is_dataset_reference("deployment0001_CE09OSSM.nc"));
        assert!(is_dataset_reference(
            "http://opendap.oceanobservatories.org/thredds/dodsC/ooi/x/y.NCML"
        ));
        assert!(is_dataset_reference("http://server/y.ncml?subset=1"));
        assert!(!is_dataset_reference("links.txt"));
        assert!(!is_dataset_reference("links"));
    }

    #[test]
    fn test_remote_detection() {
        assert!(is_remote("https://server/file.nc"));
        assert!(!is_remote("/tmp/file.nc"));
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let err = resolve_inputs("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, OoiPlotError::FileOpen { .. }));
    }
}
