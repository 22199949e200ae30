//! Refresh-rate derivation from the FPS and HD-standard fields.

use std::fmt;

use crate::error::Error;

/// An exact frame-rate fraction, e.g. 30000/1001 for 29.97 fps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRate {
    /// Numerator of the frame-rate fraction.
    pub numerator: u32,
    /// Denominator of the frame-rate fraction.
    pub denominator: u32,
}

impl fmt::Display for RefreshRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Derive the output refresh rate from the raw FPS and HD-standard codes.
///
/// HD-standard codes 3 (1080p ×2 fps) and 5 (720p ×2 fps) double the nominal
/// frame rate; all other codes, including ones this crate does not know,
/// leave it unchanged.
///
/// # Errors
///
/// Returns [`Error::UnsupportedRate`] if the FPS code has no table entry.
pub(crate) fn refresh_rate(fps_code: u8, hd_standard_code: u8) -> Result<RefreshRate, Error> {
    let doubled = matches!(hd_standard_code, 3 | 5);
    let (numerator, denominator) = match (fps_code, doubled) {
        (1, false) => (24_000, 1001),
        (1, true) => (48_000, 1001),
        (2, false) => (24, 1),
        (2, true) => (48, 1),
        (3, false) => (25, 1),
        (3, true) => (50, 1),
        (4, false) => (30_000, 1001),
        (4, true) => (60_000, 1001),
        (5, false) => (30, 1),
        (5, true) => (60, 1),
        _ => return Err(Error::UnsupportedRate(fps_code)),
    };
    Ok(RefreshRate {
        numerator,
        denominator,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(n: u32, d: u32) -> RefreshRate {
        RefreshRate {
            numerator: n,
            denominator: d,
        }
    }

    #[test]
    fn single_rate_standards_use_the_nominal_rate() {
        // 29.97 fps at 1080p x1 fps.
        assert_eq!(refresh_rate(4, 2).unwrap(), rate(30_000, 1001));
        // 25 fps at 1080i x2 fps (interlaced, not doubled).
        assert_eq!(refresh_rate(3, 1).unwrap(), rate(25, 1));
    }

    #[test]
    fn double_rate_standards_double_the_nominal_rate() {
        // 30 fps at 1080p x2 fps.
        assert_eq!(refresh_rate(5, 3).unwrap(), rate(60, 1));
        // 23.98 fps at 720p x2 fps.
        assert_eq!(refresh_rate(1, 5).unwrap(), rate(48_000, 1001));
        // 29.97 fps at 720p x2 fps.
        assert_eq!(refresh_rate(4, 5).unwrap(), rate(60_000, 1001));
    }

    #[test]
    fn unknown_hd_code_falls_back_to_the_nominal_rate() {
        assert_eq!(refresh_rate(2, 9).unwrap(), rate(24, 1));
    }

    #[test]
    fn unknown_fps_code_is_unsupported() {
        assert!(matches!(refresh_rate(6, 3), Err(Error::UnsupportedRate(6))));
        assert!(matches!(refresh_rate(0, 1), Err(Error::UnsupportedRate(0))));
    }

    #[test]
    fn display_is_the_plain_fraction() {
        assert_eq!(rate(30_000, 1001).to_string(), "30000/1001");
    }
}
