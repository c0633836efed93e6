//! URDF source chain resolution.
//!
//! A viewer configuration lists candidate URDF locations in priority order.
//! The first candidate that can be read wins; if every candidate fails, the
//! error carries a per-candidate failure summary so the user can see what
//! was tried.

use std::path::{Path, PathBuf};

use crate::error::UrdfError;

/// Read the first loadable source from `candidates`.
///
/// Returns the winning path together with its contents. Candidates are tried
/// strictly in order and failures are recorded; a candidate failing never
/// aborts the chain.
pub fn resolve_sources(candidates: &[PathBuf]) -> Result<(PathBuf, String), UrdfError> {
    let mut failures: Vec<String> = Vec::new();

    for candidate in candidates {
        match std::fs::read_to_string(candidate) {
            Ok(content) => return Ok((candidate.clone(), content)),
            Err(e) => failures.push(format!("{}: {e}", candidate.display())),
        }
    }

    if failures.is_empty() {
        failures.push("no source candidates listed".to_string());
    }

    Err(UrdfError::AllSourcesFailed {
        count: candidates.len(),
        summary: failures.join("; "),
    })
}

/// Directory containing a URDF source, used to resolve relative mesh paths.
#[must_use]
pub fn source_dir(path: &Path) -> PathBuf {
    path.parent().map_or_else(PathBuf::new, Path::to_path_buf)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("jointdeck_source_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn first_readable_candidate_wins() {
        let dir = temp_dir("first_wins");
        let a = dir.join("a.urdf");
        let b = dir.join("b.urdf");
        std::fs::write(&a, "<robot name=\"a\"/>").unwrap();
        std::fs::write(&b, "<robot name=\"b\"/>").unwrap();

        let (path, content) = resolve_sources(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(path, a);
        assert!(content.contains("name=\"a\""));

        std::fs::remove_file(&a).ok();
        std::fs::remove_file(&b).ok();
    }

    #[test]
    fn falls_through_missing_candidates() {
        let dir = temp_dir("fallthrough");
        let missing = dir.join("missing.urdf");
        let present = dir.join("present.urdf");
        std::fs::write(&present, "<robot name=\"p\"/>").unwrap();

        let (path, _) = resolve_sources(&[missing, present.clone()]).unwrap();
        assert_eq!(path, present);

        std::fs::remove_file(&present).ok();
    }

    #[test]
    fn all_failures_are_summarized() {
        let result = resolve_sources(&[
            PathBuf::from("/nonexistent/x.urdf"),
            PathBuf::from("/nonexistent/y.urdf"),
        ]);
        match result {
            Err(UrdfError::AllSourcesFailed { count, summary }) => {
                assert_eq!(count, 2);
                assert!(summary.contains("x.urdf"));
                assert!(summary.contains("y.urdf"));
                assert!(summary.contains("; "));
            }
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
    }

    #[test]
    fn empty_candidate_list_fails() {
        let result = resolve_sources(&[]);
        match result {
            Err(UrdfError::AllSourcesFailed { count, summary }) => {
                assert_eq!(count, 0);
                assert_eq!(summary, "no source candidates listed");
            }
            other => panic!("expected AllSourcesFailed, got {other:?}"),
        }
    }

    #[test]
    fn source_dir_of_file_path() {
        assert_eq!(
            source_dir(Path::new("/models/arm/robot.urdf")),
            PathBuf::from("/models/arm")
        );
        assert_eq!(source_dir(Path::new("robot.urdf")), PathBuf::from(""));
    }
}
