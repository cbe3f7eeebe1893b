//! External directions collaborator.

use culture_core::Coordinates;

use crate::error::MapError;

/// Opens a directions URL in an external browsing context. Nothing is read back.
pub trait DirectionsOpener: Send + Sync {
    fn open(&self, url: &str) -> Result<(), MapError>;
}

/// Build `{base}/{origin lat},{origin lng}/{dest lat},{dest lng}`.
///
/// Only `http://` and `https://` bases are accepted.
pub fn directions_url(
    base: &str,
    origin: Coordinates,
    destination: Coordinates,
) -> Result<String, MapError> {
    let base = base.trim().trim_end_matches('/');
    if !base.starts_with("http://") && !base.starts_with("https://") {
        return Err(MapError::UnsupportedScheme(base.to_string()));
    }
    Ok(format!(
        "{}/{},{}/{},{}",
        base, origin.lat, origin.lng, destination.lat, destination.lng
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_layout() {
        let url = directions_url(
            "https://www.google.com/maps/dir/",
            Coordinates::new(40.7128, -74.006),
            Coordinates::new(40.7794, -73.9632),
        )
        .unwrap();
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/40.7128,-74.006/40.7794,-73.9632"
        );
    }

    #[test]
    fn test_http_allowed() {
        assert!(directions_url("http://maps.local/dir", Coordinates::DEFAULT, Coordinates::DEFAULT).is_ok());
    }

    #[test]
    fn test_other_schemes_rejected() {
        for base in ["javascript:alert(1)", "file:///tmp", "data:text/html,x", "ftp://maps", ""] {
            let err = directions_url(base, Coordinates::DEFAULT, Coordinates::DEFAULT).unwrap_err();
            assert!(matches!(err, MapError::UnsupportedScheme(_)), "{}", base);
        }
    }
}
