//! Error types for the viewer's load pipeline.

use std::time::Duration;

use jointdeck_urdf::UrdfError;

/// Errors surfaced on the viewer's status line.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// The viewer scaffold never registered with the app.
    #[error("viewer registration timed out after {0:?}")]
    RegistrationTimeout(Duration),

    /// The robot did not finish loading within the deadline.
    #[error("URDF load timed out after {0:?}")]
    LoadTimeout(Duration),

    /// Locating or parsing the URDF failed.
    #[error(transparent)]
    Urdf(#[from] UrdfError),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeouts_report_their_deadline() {
        let e = ViewerError::RegistrationTimeout(Duration::from_secs(10));
        assert_eq!(e.to_string(), "viewer registration timed out after 10s");

        let e = ViewerError::LoadTimeout(Duration::from_secs(30));
        assert_eq!(e.to_string(), "URDF load timed out after 30s");
    }

    #[test]
    fn urdf_error_passes_through() {
        let inner = UrdfError::AllSourcesFailed {
            count: 2,
            summary: "a: gone; b: gone".into(),
        };
        let e = ViewerError::from(inner);
        assert_eq!(e.to_string(), "all 2 URDF sources failed: a: gone; b: gone");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<ViewerError>();
    }
}
