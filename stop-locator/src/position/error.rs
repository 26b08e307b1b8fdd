//! Position acquisition errors.

/// Why a position could not be obtained.
///
/// Codes match the browser Geolocation API (`1`, `2`, `3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// User refused location access
    #[error("location permission denied")]
    PermissionDenied,

    /// No fix available, or the fix was not a usable coordinate
    #[error("position unavailable")]
    Unavailable,

    /// No fix within the requested time
    #[error("position request timed out")]
    Timeout,
}

impl PositionError {
    /// Geolocation API error code.
    pub fn code(&self) -> u8 {
        match self {
            Self::PermissionDenied => 1,
            Self::Unavailable => 2,
            Self::Timeout => 3,
        }
    }

    /// Map a Geolocation API error code. Unknown codes are treated as
    /// an unavailable position.
    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::Unavailable,
        }
    }

    /// Message shown to the user (Italian, like the rest of the UI).
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "Permesso di geolocalizzazione negato",
            Self::Unavailable => "Posizione non disponibile",
            Self::Timeout => "Timeout durante il rilevamento",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for err in [
            PositionError::PermissionDenied,
            PositionError::Unavailable,
            PositionError::Timeout,
        ] {
            assert_eq!(PositionError::from_code(err.code()), err);
        }
        assert_eq!(PositionError::from_code(0), PositionError::Unavailable);
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            PositionError::Timeout.user_message(),
            "Timeout durante il rilevamento"
        );
        assert_eq!(
            PositionError::PermissionDenied.user_message(),
            "Permesso di geolocalizzazione negato"
        );
    }
}
