//! Host display preference detection.
//!
//! Detection is a one-shot query made when a manager is built. Changes the
//! host reports later are pushed in as [`SystemChange`](crate::SystemChange)
//! values; nothing here polls.

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use tracing::debug;

use crate::prefs::SystemPreferences;

/// Environment variable consulted for a high-contrast preference.
///
/// `high` or `more` (case-insensitive) means high contrast is preferred.
pub const CONTRAST_ENV: &str = "HEARTH_PREFERS_CONTRAST";

/// Environment variable consulted for a reduced-motion preference.
///
/// `reduce`, `1` or `true` (case-insensitive) means reduced motion is preferred.
pub const REDUCED_MOTION_ENV: &str = "HEARTH_PREFERS_REDUCED_MOTION";

/// Source of host display preferences.
pub trait SystemDetector {
    fn detect(&self) -> SystemPreferences;
}

impl<F> SystemDetector for F
where
    F: Fn() -> SystemPreferences,
{
    fn detect(&self) -> SystemPreferences {
        self()
    }
}

/// Detects preferences from the operating system.
///
/// Dark mode comes from the OS color scheme. Desktop platforms expose no
/// portable contrast or motion query, so those two are read from
/// [`CONTRAST_ENV`] and [`REDUCED_MOTION_ENV`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OsDetector;

impl SystemDetector for OsDetector {
    fn detect(&self) -> SystemPreferences {
        let detected = SystemPreferences {
            dark_mode: matches!(detect_os_theme(), OsThemeMode::Dark),
            ..accessibility_from_env()
        };
        debug!(?detected, "detected system display preferences");
        detected
    }
}

/// Detector that always reports the same preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedDetector(pub SystemPreferences);

impl SystemDetector for FixedDetector {
    fn detect(&self) -> SystemPreferences {
        self.0
    }
}

/// Reads the contrast and motion preferences from the environment.
///
/// Dark mode is left off; only [`OsDetector`] asks the OS for it.
pub fn accessibility_from_env() -> SystemPreferences {
    SystemPreferences {
        dark_mode: false,
        high_contrast: env_matches(CONTRAST_ENV, &["high", "more"]),
        reduced_motion: env_matches(REDUCED_MOTION_ENV, &["reduce", "1", "true"]),
    }
}

fn env_matches(var: &str, accepted: &[&str]) -> bool {
    std::env::var(var)
        .map(|value| {
            let value = value.trim();
            accepted.iter().any(|a| value.eq_ignore_ascii_case(a))
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_fixed_detector() {
        let prefs = SystemPreferences {
            dark_mode: true,
            high_contrast: false,
            reduced_motion: true,
        };
        assert_eq!(FixedDetector(prefs).detect(), prefs);
    }

    #[test]
    fn test_closure_detector() {
        let detector = || SystemPreferences {
            high_contrast: true,
            ..Default::default()
        };
        assert!(detector.detect().high_contrast);
    }

    #[test]
    #[serial]
    fn test_env_contrast_and_motion() {
        std::env::set_var(CONTRAST_ENV, "High");
        std::env::set_var(REDUCED_MOTION_ENV, "reduce");
        let detected = accessibility_from_env();
        assert!(detected.high_contrast);
        assert!(detected.reduced_motion);

        std::env::set_var(CONTRAST_ENV, "no-preference");
        std::env::remove_var(REDUCED_MOTION_ENV);
        let detected = accessibility_from_env();
        assert!(!detected.high_contrast);
        assert!(!detected.reduced_motion);

        std::env::remove_var(CONTRAST_ENV);
    }
}
